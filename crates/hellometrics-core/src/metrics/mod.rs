//! In-process metrics registry rendered in the Prometheus text format.
//!
//! Series are keyed by [`LabelKey`] (method, path) and stored as atomics in
//! `DashMap`s, so recording never takes a global lock. Histogram bounds are
//! converted to nanoseconds once, at registry creation, keeping observation
//! on integer math. Families and series render in sorted order.

mod counter;
mod histogram;
mod label;
mod registry;

pub use counter::CounterVec;
pub use histogram::{HistogramSnapshot, HistogramVec, LatencyBuckets, DEFAULT_LATENCY_BUCKETS};
pub use label::LabelKey;
pub use registry::{MetricKind, MetricsRegistry};

/// Content type scrapers expect for the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Format a float the way the Prometheus client does (`1.0`, `0.005`).
pub(crate) fn fmt_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names() {
        assert!(is_valid_metric_name("request_count"));
        assert!(is_valid_metric_name("app:request_count_2"));
        assert!(is_valid_metric_name("_x"));
        assert!(!is_valid_metric_name(""));
        assert!(!is_valid_metric_name("2xx"));
        assert!(!is_valid_metric_name("request-count"));
    }

    #[test]
    fn float_format() {
        assert_eq!(fmt_float(1.0), "1.0");
        assert_eq!(fmt_float(10.0), "10.0");
        assert_eq!(fmt_float(0.005), "0.005");
        assert_eq!(fmt_float(0.0), "0.0");
        assert_eq!(fmt_float(2.5), "2.5");
    }
}
