//! Anomaly detection for prepared weekly series.

mod anomaly;

pub use anomaly::{detect_and_cap, AnomalyConfig, AnomalyMethod};
