//! Aggregation of prepared records by calendar period.
//!
//! - Grouping primitives and per-period mean rankings
//! - Monthly and yearly totals
//! - Peak months/quarters and the seasonality strength score

mod group;
mod monthly;
mod peaks;

pub use group::{group_by, mean_count_by, CountAccumulator, PeakRanking, PeriodMean};
pub use monthly::{
    monthly_totals, total_count, totals_as_f64, yearly_totals, GapPolicy, MonthlyAggregate,
};
pub use peaks::{peak_months, peak_quarters, seasonality_strength};
