use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use super::label::escape_help;
use super::{is_valid_metric_name, CounterVec, HistogramSnapshot, HistogramVec, LabelKey, LatencyBuckets};
use crate::error::{HelloMetricsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

enum Metric {
    Counter(CounterVec),
    Histogram(HistogramVec),
}

impl Metric {
    fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Histogram(_) => MetricKind::Histogram,
        }
    }
}

struct Family {
    help: Option<String>,
    metric: Metric,
}

impl Family {
    fn new(kind: MetricKind, buckets: &Arc<LatencyBuckets>) -> Self {
        let metric = match kind {
            MetricKind::Counter => Metric::Counter(CounterVec::default()),
            MetricKind::Histogram => Metric::Histogram(HistogramVec::new(Arc::clone(buckets))),
        };
        Self { help: None, metric }
    }
}

fn kind_mismatch(name: &str, expected: MetricKind) -> HelloMetricsError {
    HelloMetricsError::MetricKindMismatch {
        name: name.to_string(),
        expected: expected.as_str(),
    }
}

/// Process-lifetime store of counter and histogram families.
///
/// Construct one per application and share it behind an `Arc`; nothing here
/// is global. Families and series are created on first use and never evicted.
/// Every histogram in a registry uses the bounds given at construction.
pub struct MetricsRegistry {
    buckets: Arc<LatencyBuckets>,
    families: DashMap<String, Family>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new(LatencyBuckets::default())
    }
}

impl MetricsRegistry {
    pub fn new(buckets: LatencyBuckets) -> Self {
        Self {
            buckets: Arc::new(buckets),
            families: DashMap::new(),
        }
    }

    pub fn buckets(&self) -> &LatencyBuckets {
        &self.buckets
    }

    /// Declare a counter family with `# HELP` text.
    pub fn register_counter(&self, name: &str, help: &str) -> Result<()> {
        self.register(name, MetricKind::Counter, help)
    }

    /// Declare a histogram family with `# HELP` text.
    pub fn register_histogram(&self, name: &str, help: &str) -> Result<()> {
        self.register(name, MetricKind::Histogram, help)
    }

    fn register(&self, name: &str, kind: MetricKind, help: &str) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(HelloMetricsError::InvalidMetricName(name.to_string()));
        }
        let mut family = self
            .families
            .entry(name.to_string())
            .or_insert_with(|| Family::new(kind, &self.buckets));
        if family.metric.kind() != kind {
            return Err(kind_mismatch(name, kind));
        }
        family.help = Some(help.to_string());
        Ok(())
    }

    /// Get-or-create a family. The name is validated only on creation.
    fn family(&self, name: &str, kind: MetricKind) -> Result<Ref<'_, String, Family>> {
        if let Some(family) = self.families.get(name) {
            return Ok(family);
        }
        if !is_valid_metric_name(name) {
            return Err(HelloMetricsError::InvalidMetricName(name.to_string()));
        }
        Ok(self
            .families
            .entry(name.to_string())
            .or_insert_with(|| Family::new(kind, &self.buckets))
            .downgrade())
    }

    /// Add 1 to the counter series `name{key}`.
    pub fn inc_counter(&self, name: &str, key: &LabelKey) -> Result<()> {
        let family = self.family(name, MetricKind::Counter)?;
        match &family.metric {
            Metric::Counter(counter) => {
                counter.inc(key);
                Ok(())
            }
            Metric::Histogram(_) => Err(kind_mismatch(name, MetricKind::Counter)),
        }
    }

    /// Record one duration into the histogram series `name{key}`.
    pub fn observe_histogram(&self, name: &str, key: &LabelKey, duration: Duration) -> Result<()> {
        let family = self.family(name, MetricKind::Histogram)?;
        match &family.metric {
            Metric::Histogram(hist) => {
                hist.observe(key, duration);
                Ok(())
            }
            Metric::Counter(_) => Err(kind_mismatch(name, MetricKind::Histogram)),
        }
    }

    pub fn counter_value(&self, name: &str, key: &LabelKey) -> Option<u64> {
        match &self.families.get(name)?.metric {
            Metric::Counter(counter) => counter.get(key),
            Metric::Histogram(_) => None,
        }
    }

    pub fn histogram_snapshot(&self, name: &str, key: &LabelKey) -> Option<HistogramSnapshot> {
        match &self.families.get(name)?.metric {
            Metric::Histogram(hist) => hist.snapshot(key),
            Metric::Counter(_) => None,
        }
    }

    /// Render every family in the text exposition format.
    ///
    /// Families are sorted by name and series by label key, so output order
    /// is stable across scrapes. Series are read with atomic loads; the
    /// snapshot is not atomic across series.
    pub fn render(&self) -> Result<String> {
        let mut names: Vec<String> = self.families.iter().map(|r| r.key().clone()).collect();
        names.sort();

        let mut out = String::new();
        for name in names {
            let Some(family) = self.families.get(&name) else {
                continue;
            };
            if let Some(help) = &family.help {
                writeln!(out, "# HELP {} {}", name, escape_help(help))?;
            }
            writeln!(out, "# TYPE {} {}", name, family.metric.kind().as_str())?;
            match &family.metric {
                Metric::Counter(counter) => counter.render(&name, &mut out)?,
                Metric::Histogram(hist) => hist.render(&name, &mut out)?,
            }
        }
        Ok(out)
    }
}
