//! Detection of anomalous months.

mod anomaly;

pub use anomaly::{
    detect_anomalies, monthly_z_scores, AnomalyConfig, AnomalyKind, AnomalyMeasure, AnomalyRecord,
    MonthlyZScore, DEFAULT_THRESHOLD,
};
