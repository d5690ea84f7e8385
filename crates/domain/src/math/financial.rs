//! Closed-form revenue, cost and ROI formulas.
//!
//! These are the shared formulas both the strategy simulator and the profit
//! optimizer evaluate; the simulator calls them once, the optimizer searches
//! over them.

use crate::params::ModelParams;
use crate::value_objects::{FinancialBaseline, StrategyDecision};
use rust_decimal::Decimal;

/// Revenue lift from additional marketing spend.
/// lift = base_revenue * (marketing_pct / 100) * elasticity
#[must_use]
pub fn marketing_revenue_lift(
    base_revenue: Decimal,
    marketing_pct: Decimal,
    elasticity: Decimal,
) -> Decimal {
    base_revenue * (marketing_pct / Decimal::ONE_HUNDRED) * elasticity
}

/// Direct revenue impact of a price change.
/// impact = base_revenue * (price_pct / 100)
#[must_use]
pub fn pricing_revenue_impact(base_revenue: Decimal, price_pct: Decimal) -> Decimal {
    base_revenue * (price_pct / Decimal::ONE_HUNDRED)
}

/// Revenue recovered by retention spend, scaled by churn exposure.
/// lift = retention_investment * multiplier * churn_rate
///
/// Higher churn means more revenue at stake per retention dollar.
#[must_use]
pub fn retention_revenue_lift(
    retention_investment: Decimal,
    multiplier: Decimal,
    churn_rate: Decimal,
) -> Decimal {
    retention_investment * multiplier * churn_rate
}

/// Projected annual revenue under a decision.
#[must_use]
pub fn projected_revenue(
    baseline: &FinancialBaseline,
    decision: &StrategyDecision,
    churn_rate: Decimal,
    params: &ModelParams,
) -> Decimal {
    baseline.revenue
        + marketing_revenue_lift(
            baseline.revenue,
            decision.marketing_increase_pct,
            params.marketing_elasticity,
        )
        + pricing_revenue_impact(baseline.revenue, decision.price_change_pct)
        + retention_revenue_lift(
            decision.retention_investment,
            params.retention_revenue_multiplier,
            churn_rate,
        )
}

/// Projected annual cost under a decision.
/// cost = base_cost * (1 + marketing_pct / 100) + hires * avg_cost + retention
#[must_use]
pub fn projected_cost(
    baseline: &FinancialBaseline,
    decision: &StrategyDecision,
    params: &ModelParams,
) -> Decimal {
    baseline.cost
        + baseline.cost * (decision.marketing_increase_pct / Decimal::ONE_HUNDRED)
        + Decimal::from(decision.employee_hiring_count) * params.avg_employee_cost
        + decision.retention_investment
}

/// Additional spend a decision commits against the budget constraint:
/// the marketing cost increase plus hiring cost. Pricing changes and
/// retention spend sit outside the budget in this model.
#[must_use]
pub fn additional_spend(
    base_cost: Decimal,
    marketing_pct: Decimal,
    hires: u32,
    avg_employee_cost: Decimal,
) -> Decimal {
    base_cost * (marketing_pct / Decimal::ONE_HUNDRED) + Decimal::from(hires) * avg_employee_cost
}

/// Return on incremental investment, in percent.
///
/// Defined as exactly zero when the decision does not increase spend: a
/// strategy with no incremental investment has no meaningful ROI, and the
/// guard keeps the division well-defined.
#[must_use]
pub fn roi_pct(profit_delta: Decimal, incremental_investment: Decimal) -> Decimal {
    if incremental_investment <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    profit_delta / incremental_investment * Decimal::ONE_HUNDRED
}
