//! Shared application state: config, the metrics registry, and the metric
//! names the timing middleware records under.

use std::sync::Arc;

use hellometrics_core::error::Result;
use hellometrics_core::metrics::MetricsRegistry;

use crate::config::AppConfig;

pub const REQUEST_COUNT: &str = "request_count";
pub const REQUEST_LATENCY: &str = "request_latency_seconds";

/// Resolved metric names (namespace applied).
#[derive(Debug, Clone)]
pub struct MetricNames {
    pub request_count: String,
    pub request_latency: String,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<MetricsRegistry>,
}

struct AppStateInner {
    cfg: AppConfig,
    names: MetricNames,
}

impl AppState {
    /// Build state with a fresh registry using the configured buckets.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let registry = Arc::new(MetricsRegistry::new(cfg.metrics.buckets()?));
        Self::with_registry(cfg, registry)
    }

    /// Build state around an existing registry and declare the request
    /// families on it.
    pub fn with_registry(cfg: AppConfig, registry: Arc<MetricsRegistry>) -> Result<Self> {
        let names = MetricNames {
            request_count: cfg.metrics.metric_name(REQUEST_COUNT),
            request_latency: cfg.metrics.metric_name(REQUEST_LATENCY),
        };
        registry.register_counter(&names.request_count, "Total number of requests")?;
        registry.register_histogram(&names.request_latency, "Request latency")?;

        tracing::debug!(
            count = %names.request_count,
            latency = %names.request_latency,
            buckets = registry.buckets().len(),
            "request metrics registered"
        );

        Ok(Self::from_parts(cfg, registry, names))
    }

    /// Assemble state without declaring families.
    pub(crate) fn from_parts(cfg: AppConfig, registry: Arc<MetricsRegistry>, names: MetricNames) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, names }),
            registry,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn names(&self) -> &MetricNames {
        &self.inner.names
    }

    pub fn registry(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.registry)
    }
}
