use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A set of proposed business levers under evaluation.
///
/// The default is the all-zero decision (no change against the baseline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyDecision {
    /// Percentage increase in marketing spend.
    pub marketing_increase_pct: Decimal,
    /// Percentage change in product pricing.
    pub price_change_pct: Decimal,
    /// Number of new employees to hire.
    pub employee_hiring_count: u32,
    /// Additional customer retention investment in USD.
    pub retention_investment: Decimal,
}

impl StrategyDecision {
    /// Sets the marketing spend increase.
    #[must_use]
    pub fn with_marketing_increase(mut self, pct: Decimal) -> Self {
        self.marketing_increase_pct = pct;
        self
    }

    /// Sets the price change.
    #[must_use]
    pub fn with_price_change(mut self, pct: Decimal) -> Self {
        self.price_change_pct = pct;
        self
    }

    /// Sets the hiring count.
    #[must_use]
    pub fn with_hiring(mut self, count: u32) -> Self {
        self.employee_hiring_count = count;
        self
    }

    /// Sets the retention investment.
    #[must_use]
    pub fn with_retention_investment(mut self, amount: Decimal) -> Self {
        self.retention_investment = amount;
        self
    }
}
