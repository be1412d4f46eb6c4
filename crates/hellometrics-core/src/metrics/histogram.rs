use dashmap::DashMap;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{fmt_float, LabelKey};
use crate::error::{HelloMetricsError, Result};

/// Prometheus client default latency bounds, in seconds.
pub const DEFAULT_LATENCY_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Validated histogram upper bounds.
///
/// Kept both as seconds (for `le` labels) and as nanoseconds (for recording).
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyBuckets {
    bounds: Vec<f64>,
    bounds_nanos: Vec<u64>,
}

impl LatencyBuckets {
    /// Bounds must be non-empty, finite, non-negative and strictly increasing.
    pub fn new(bounds: Vec<f64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(HelloMetricsError::BadRequest(
                "latency buckets must not be empty".into(),
            ));
        }
        if let Some(b) = bounds.iter().find(|b| !b.is_finite() || **b < 0.0) {
            return Err(HelloMetricsError::BadRequest(format!(
                "latency bucket {b} must be finite and non-negative"
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(HelloMetricsError::BadRequest(
                "latency buckets must be strictly increasing".into(),
            ));
        }

        let bounds_nanos = bounds.iter().copied().map(secs_to_nanos).collect();
        Ok(Self {
            bounds,
            bounds_nanos,
        })
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl Default for LatencyBuckets {
    fn default() -> Self {
        Self {
            bounds: DEFAULT_LATENCY_BUCKETS.to_vec(),
            bounds_nanos: DEFAULT_LATENCY_BUCKETS
                .iter()
                .copied()
                .map(secs_to_nanos)
                .collect(),
        }
    }
}

// `as` saturates, so absurdly large bounds clamp to u64::MAX.
fn secs_to_nanos(secs: f64) -> u64 {
    (secs * 1e9).round() as u64
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper bound seconds, cumulative count)` per configured bound.
    pub buckets: Vec<(f64, u64)>,
    pub sum_seconds: f64,
    pub count: u64,
}

struct AtomicHistogram {
    count: AtomicU64,
    sum_nanos: AtomicU64,
    buckets: Box<[AtomicU64]>,
}

impl AtomicHistogram {
    fn new(len: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            buckets: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn record(&self, bounds_nanos: &[u64], nanos: u64) {
        // Cumulative: every bucket whose bound is >= the value.
        for (bound, slot) in bounds_nanos.iter().zip(self.buckets.iter()) {
            if nanos <= *bound {
                slot.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.sum_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, bounds: &[f64]) -> HistogramSnapshot {
        let buckets: Vec<(f64, u64)> = bounds
            .iter()
            .zip(self.buckets.iter())
            .map(|(le, slot)| (*le, slot.load(Ordering::Relaxed)))
            .collect();
        let sum_nanos = self.sum_nanos.load(Ordering::Relaxed);
        // A concurrent observation may land between loads; keep +Inf >= every bucket.
        let top = buckets.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let count = self.count.load(Ordering::Relaxed).max(top);

        HistogramSnapshot {
            buckets,
            sum_seconds: sum_nanos as f64 / 1e9,
            count,
        }
    }
}

/// Latency histograms, one per label key, sharing one set of bounds.
pub struct HistogramVec {
    buckets: Arc<LatencyBuckets>,
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(buckets: Arc<LatencyBuckets>) -> Self {
        Self {
            buckets,
            map: DashMap::new(),
        }
    }

    /// Observe a duration into the series for `key`.
    pub fn observe(&self, key: &LabelKey, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let bounds = &self.buckets.bounds_nanos;

        if let Some(hist) = self.map.get(key) {
            hist.record(bounds, nanos);
            return;
        }
        let hist = self
            .map
            .entry(key.clone())
            .or_insert_with(|| AtomicHistogram::new(bounds.len()));
        hist.record(bounds, nanos);
    }

    pub fn snapshot(&self, key: &LabelKey) -> Option<HistogramSnapshot> {
        self.map
            .get(key)
            .map(|h| h.snapshot(self.buckets.bounds()))
    }

    /// Render `_bucket`, `_sum` and `_count` lines (the caller writes `# TYPE`).
    pub(crate) fn render(&self, name: &str, out: &mut String) -> fmt::Result {
        let mut series: Vec<(LabelKey, HistogramSnapshot)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot(self.buckets.bounds())))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, snap) in series {
            let labels = key.render();
            for (le, count) in &snap.buckets {
                writeln!(
                    out,
                    "{}_bucket{{{},le=\"{}\"}} {}",
                    name,
                    labels,
                    fmt_float(*le),
                    count
                )?;
            }
            writeln!(out, "{}_bucket{{{},le=\"+Inf\"}} {}", name, labels, snap.count)?;
            writeln!(out, "{}_sum{{{}}} {}", name, labels, fmt_float(snap.sum_seconds))?;
            writeln!(out, "{}_count{{{}}} {}", name, labels, snap.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn vec_with(bounds: Vec<f64>) -> HistogramVec {
        match LatencyBuckets::new(bounds) {
            Ok(b) => HistogramVec::new(Arc::new(b)),
            Err(e) => panic!("bounds rejected: {e}"),
        }
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(LatencyBuckets::new(vec![]).is_err());
        assert!(LatencyBuckets::new(vec![0.1, 0.1]).is_err());
        assert!(LatencyBuckets::new(vec![0.5, 0.1]).is_err());
        assert!(LatencyBuckets::new(vec![-1.0]).is_err());
        assert!(LatencyBuckets::new(vec![f64::NAN]).is_err());
        assert!(LatencyBuckets::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(LatencyBuckets::new(vec![0.0, 0.5]).is_ok());
    }

    #[test]
    fn buckets_are_cumulative_and_upper_inclusive() {
        let h = vec_with(vec![0.1, 0.5, 1.0]);
        let key = LabelKey::new("GET", "/");
        h.observe(&key, Duration::from_millis(100)); // exactly on 0.1
        h.observe(&key, Duration::from_millis(300));
        h.observe(&key, Duration::from_secs(2)); // above every bound

        let snap = h.snapshot(&key);
        assert_eq!(
            snap.as_ref().map(|s| s.buckets.clone()),
            Some(vec![(0.1, 1), (0.5, 2), (1.0, 2)])
        );
        assert_eq!(snap.as_ref().map(|s| s.count), Some(3));
        let sum = snap.map(|s| s.sum_seconds).unwrap_or_default();
        assert!((sum - 2.4).abs() < 1e-9);
    }

    #[test]
    fn default_bounds_match_client_defaults() {
        let b = LatencyBuckets::default();
        assert_eq!(b.bounds(), &DEFAULT_LATENCY_BUCKETS[..]);
        assert_eq!(b.bounds_nanos[0], 5_000_000);
        assert_eq!(b.bounds_nanos[13], 10_000_000_000);
    }

    #[test]
    fn renders_inf_sum_count() {
        let h = vec_with(vec![1.0]);
        h.observe(&LabelKey::new("GET", "/"), Duration::from_millis(250));
        let mut out = String::new();
        assert!(h.render("lat", &mut out).is_ok());
        assert_eq!(
            out,
            concat!(
                "lat_bucket{method=\"GET\",endpoint=\"/\",le=\"1.0\"} 1\n",
                "lat_bucket{method=\"GET\",endpoint=\"/\",le=\"+Inf\"} 1\n",
                "lat_sum{method=\"GET\",endpoint=\"/\"} 0.25\n",
                "lat_count{method=\"GET\",endpoint=\"/\"} 1\n",
            )
        );
    }
}
