//! # seasonal-trends
//!
//! Seasonal-trend diagnostics for daily count series.
//!
//! Decomposes monthly totals into trend, seasonal and residual components,
//! ranks months and quarters by average volume, scores the strength of
//! seasonality and flags anomalous months by z-score.
//!
//! ```
//! use seasonal_trends::prelude::*;
//!
//! let rows: Vec<InputRow> = (1..=28)
//!     .map(|day| InputRow::new(format!("2024-02-{:02}", day), 10))
//!     .collect();
//! let detector = SeasonalTrendDetector::new(&rows).unwrap();
//! let summary = detector.summary().unwrap();
//! assert_eq!(summary.total_count, 280);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod aggregation;
pub mod core;
pub mod detection;
pub mod detector;
pub mod error;
pub mod seasonality;
pub mod summary;
pub mod utils;

pub use detector::{DetectorConfig, SeasonalTrendDetector};
pub use error::{Result, SeasonalError};

pub mod prelude {
    pub use crate::aggregation::{GapPolicy, PeakRanking};
    pub use crate::core::{ColumnNames, InputRow, MonthKey, PreparedRecord};
    pub use crate::detection::{AnomalyConfig, AnomalyKind, AnomalyMeasure, AnomalyRecord};
    pub use crate::detector::{DetectorConfig, SeasonalTrendDetector};
    pub use crate::error::{Result, SeasonalError};
    pub use crate::seasonality::{ClassicalDecomposition, Decomposer, DecompositionResult, Stl};
    pub use crate::summary::SeasonalSummary;
}
