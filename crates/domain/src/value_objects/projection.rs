use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Projected financial impact of a strategy decision.
///
/// All fields derive deterministically from a baseline and a decision.
/// Currency figures and percentages are rounded to 2 decimal places, the
/// risk score to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyProjection {
    pub base_revenue: Decimal,
    pub base_cost: Decimal,
    pub base_profit: Decimal,
    pub projected_revenue: Decimal,
    pub projected_cost: Decimal,
    pub projected_profit: Decimal,
    pub revenue_delta: Decimal,
    pub cost_delta: Decimal,
    pub profit_delta: Decimal,
    /// Return on incremental investment, in percent. Exactly zero when the
    /// decision does not increase spend.
    pub roi_pct: Decimal,
    /// Synthetic 0-100 risk score of the decision.
    pub risk_score: Decimal,
}
