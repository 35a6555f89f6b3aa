//! Grouping by calendar period.
//!
//! Grouping is two explicit steps: a key function picks each record's bucket,
//! then records are folded into an ordered map of accumulators.

use crate::core::PreparedRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fold items into per-key accumulators, keyed in ascending order.
pub fn group_by<'a, K, T, A, F, G>(items: &'a [T], key: F, mut fold: G) -> BTreeMap<K, A>
where
    K: Ord,
    A: Default,
    F: Fn(&'a T) -> K,
    G: FnMut(&mut A, &'a T),
{
    let mut groups = BTreeMap::new();
    for item in items {
        fold(groups.entry(key(item)).or_default(), item);
    }
    groups
}

/// Running count total and record tally for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountAccumulator {
    pub total: u64,
    pub records: usize,
}

impl CountAccumulator {
    /// Add one record. Totals saturate; prepared record sets never reach the
    /// limit.
    pub fn push(&mut self, record: &PreparedRecord) {
        self.total = self.total.saturating_add(record.count);
        self.records += 1;
    }

    /// Mean count per record. Buckets are only created with a record in them.
    pub fn mean(&self) -> f64 {
        self.total as f64 / self.records as f64
    }
}

/// Mean count per record, grouped by `key`.
pub fn mean_count_by<K, F>(records: &[PreparedRecord], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&PreparedRecord) -> K,
{
    group_by(records, key, CountAccumulator::push)
        .into_iter()
        .map(|(k, acc)| (k, acc.mean()))
        .collect()
}

/// Mean count for one calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodMean {
    /// Month (1..=12) or quarter (1..=4).
    pub key: u32,
    pub mean_count: f64,
}

/// Calendar periods ordered by mean count, highest first.
///
/// Equal means are ordered by ascending period number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakRanking(Vec<PeriodMean>);

impl PeakRanking {
    /// Rank per-period means.
    pub fn from_means(means: &BTreeMap<u32, f64>) -> Self {
        let mut entries: Vec<PeriodMean> = means
            .iter()
            .map(|(&key, &mean_count)| PeriodMean { key, mean_count })
            .collect();
        // Stable sort over key-ordered input keeps ascending keys among ties.
        entries.sort_by(|a, b| {
            b.mean_count
                .partial_cmp(&a.mean_count)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodMean> {
        self.0.iter()
    }

    /// Period keys in rank order.
    pub fn keys(&self) -> Vec<u32> {
        self.0.iter().map(|e| e.key).collect()
    }

    /// Mean count for a period key.
    pub fn get(&self, key: u32) -> Option<f64> {
        self.0.iter().find(|e| e.key == key).map(|e| e.mean_count)
    }

    /// The highest-ranked period.
    pub fn top(&self) -> Option<&PeriodMean> {
        self.0.first()
    }

    pub fn as_slice(&self) -> &[PeriodMean] {
        &self.0
    }
}
