use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Feasibility limits for the profit optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConstraints {
    /// Maximum additional spend allowed (USD).
    pub budget_limit: Decimal,
    /// Maximum acceptable risk score (0-100).
    pub risk_threshold: Decimal,
}

impl OptimizationConstraints {
    #[must_use]
    pub fn new(budget_limit: Decimal, risk_threshold: Decimal) -> Self {
        Self {
            budget_limit,
            risk_threshold,
        }
    }

    /// Rejects a negative budget or a risk threshold off the score scale.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.budget_limit < Decimal::ZERO {
            return Err(DomainError::NegativeBudgetLimit(self.budget_limit));
        }
        if self.risk_threshold < Decimal::ZERO || self.risk_threshold > Decimal::ONE_HUNDRED {
            return Err(DomainError::RiskThresholdOutOfRange(self.risk_threshold));
        }
        Ok(())
    }
}
