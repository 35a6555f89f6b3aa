//! Monthly and yearly count totals.

use super::group::{group_by, CountAccumulator};
use crate::core::{MonthKey, PreparedRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total count for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub period: MonthKey,
    pub total: u64,
    /// Number of records summed; zero for a filled gap.
    pub records: usize,
}

impl MonthlyAggregate {
    /// Mean count per record, 0.0 for a filled gap.
    pub fn mean_per_record(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.total as f64 / self.records as f64
        }
    }
}

/// How months without records are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Only months containing records produce a bucket.
    #[default]
    Skip,
    /// Every month between the first and last record gets a bucket; empty
    /// months total zero.
    ZeroFill,
}

/// Sum counts per calendar month, in chronological order.
pub fn monthly_totals(records: &[PreparedRecord], gaps: GapPolicy) -> Vec<MonthlyAggregate> {
    let sums = group_by(records, PreparedRecord::month_key, CountAccumulator::push);

    let (first, last) = match (sums.keys().next(), sums.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    match gaps {
        GapPolicy::Skip => sums
            .into_iter()
            .map(|(period, acc)| MonthlyAggregate {
                period,
                total: acc.total,
                records: acc.records,
            })
            .collect(),
        GapPolicy::ZeroFill => {
            let span = first.months_through(&last);
            let mut out = Vec::with_capacity(span);
            let mut period = first;
            for _ in 0..span {
                let acc = sums.get(&period).copied().unwrap_or_default();
                out.push(MonthlyAggregate {
                    period,
                    total: acc.total,
                    records: acc.records,
                });
                period = period.succ();
            }
            out
        }
    }
}

/// Monthly totals as floating-point values, in chronological order.
pub fn totals_as_f64(months: &[MonthlyAggregate]) -> Vec<f64> {
    months.iter().map(|m| m.total as f64).collect()
}

/// Sum counts per calendar year.
pub fn yearly_totals(records: &[PreparedRecord]) -> BTreeMap<i32, u64> {
    group_by(records, PreparedRecord::year, |total: &mut u64, r| {
        *total = total.saturating_add(r.count)
    })
}

/// Sum of all counts, saturating at `u64::MAX`.
pub fn total_count(records: &[PreparedRecord]) -> u64 {
    records.iter().fold(0u64, |total, r| total.saturating_add(r.count))
}
