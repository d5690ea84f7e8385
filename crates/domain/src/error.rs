use rust_decimal::Decimal;

/// Input validation errors.
///
/// Invalid inputs are rejected at the entry points before any computation
/// runs; they are never clamped into range silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Base revenue must be strictly positive.
    #[error("base revenue must be strictly positive, got {0}")]
    NonPositiveRevenue(Decimal),
    /// Base cost must be strictly positive.
    #[error("base cost must be strictly positive, got {0}")]
    NonPositiveCost(Decimal),
    /// Churn rate is a fraction of the customer base.
    #[error("churn rate must be within [0, 1], got {0}")]
    ChurnRateOutOfRange(Decimal),
    /// Budget limit is an amount of additional spend.
    #[error("budget limit must be non-negative, got {0}")]
    NegativeBudgetLimit(Decimal),
    /// Risk threshold lives on the 0-100 risk score scale.
    #[error("risk threshold must be within [0, 100], got {0}")]
    RiskThresholdOutOfRange(Decimal),
}
