use std::net::SocketAddr;

use serde::Deserialize;
use hellometrics_core::error::{HelloMetricsError, Result};
use hellometrics_core::metrics::{is_valid_metric_name, LatencyBuckets};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HelloMetricsError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            HelloMetricsError::BadRequest(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Optional prefix, joined to metric names with `_`.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Histogram upper bounds in seconds; client defaults when absent.
    #[serde(default)]
    pub latency_buckets: Option<Vec<f64>>,
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(ns) = self.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            if !is_valid_metric_name(ns) {
                return Err(HelloMetricsError::BadRequest(format!(
                    "metrics.namespace {ns:?} is not a valid metric name prefix"
                )));
            }
        }
        self.buckets()?;
        Ok(())
    }

    pub fn buckets(&self) -> Result<LatencyBuckets> {
        match &self.latency_buckets {
            Some(bounds) => LatencyBuckets::new(bounds.clone()),
            None => Ok(LatencyBuckets::default()),
        }
    }

    /// `name` with the namespace prefix applied, if any.
    pub fn metric_name(&self, name: &str) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}_{name}"),
            _ => name.to_string(),
        }
    }
}
