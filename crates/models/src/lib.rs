//! Predictive pipelines over the synthetic datasets.
//!
//! Each pipeline is a thin fit/predict capability: a revenue trend
//! forecaster, a logistic churn classifier, and a cost anomaly detector.
//! They exist to feed the dashboard surfaces; the heavy numerical work in
//! this workspace lives in the optimization crate.

pub mod anomaly;
pub mod churn;
pub mod error;
pub mod forecast;

pub use anomaly::{AnomalyScore, ZScoreDetector};
pub use churn::{ChurnMetrics, LogisticChurnModel};
pub use error::ModelError;
pub use forecast::{ForecastMetrics, ForecastPoint, LinearTrendModel, RevenueForecaster};
