use dashmap::DashMap;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use super::LabelKey;

/// Monotonic counters, one per label key.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, key: &LabelKey) {
        self.add(key, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, key: &LabelKey, v: u64) {
        // Existing series only need a shard read lock.
        if let Some(counter) = self.map.get(key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self
            .map
            .entry(key.clone())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value, if the series exists.
    pub fn get(&self, key: &LabelKey) -> Option<u64> {
        self.map.get(key).map(|c| c.load(Ordering::Relaxed))
    }

    /// Render series lines (the caller writes `# TYPE`).
    pub(crate) fn render(&self, name: &str, out: &mut String) -> fmt::Result {
        let mut series: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, val) in series {
            writeln!(out, "{}{{{}}} {}", name, key.render(), val)?;
        }
        Ok(())
    }
}
