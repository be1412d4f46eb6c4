/// The (method, path) pair identifying one series.
///
/// Both parts are taken verbatim: no case folding and no path templating, so
/// every distinct path ever requested gets its own series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    method: String,
    path: String,
}

impl LabelKey {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `method="GET",endpoint="/"` with values escaped.
    pub(crate) fn render(&self) -> String {
        format!(
            "method=\"{}\",endpoint=\"{}\"",
            escape_label(&self.method),
            escape_label(&self.path)
        )
    }
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// HELP text escapes backslash and newline only.
pub(crate) fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_method_then_endpoint() {
        let key = LabelKey::new("GET", "/");
        assert_eq!(key.render(), r#"method="GET",endpoint="/""#);
    }

    #[test]
    fn escapes_label_values() {
        let key = LabelKey::new("GET", "/a\"b\\c\nd");
        assert_eq!(key.render(), r#"method="GET",endpoint="/a\"b\\c\nd""#);
    }

    #[test]
    fn orders_by_method_then_path() {
        let mut keys = vec![
            LabelKey::new("POST", "/"),
            LabelKey::new("GET", "/z"),
            LabelKey::new("GET", "/a"),
        ];
        keys.sort();
        assert_eq!(keys[0], LabelKey::new("GET", "/a"));
        assert_eq!(keys[1], LabelKey::new("GET", "/z"));
        assert_eq!(keys[2], LabelKey::new("POST", "/"));
    }
}
