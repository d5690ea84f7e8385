//! Pure strategy-to-projection evaluation.

use rust_decimal::Decimal;
use stratlab_domain::error::DomainError;
use stratlab_domain::math::{financial, risk};
use stratlab_domain::params::ModelParams;
use stratlab_domain::value_objects::{FinancialBaseline, StrategyDecision, StrategyProjection};

/// Simulates the financial and risk impact of a strategy decision.
///
/// Validates the baseline and churn rate, then evaluates the closed-form
/// model exactly once. Never fails for a valid positive baseline.
///
/// # Arguments
/// * `baseline` - Current annual revenue and cost
/// * `decision` - Proposed business levers
/// * `churn_rate` - Current customer churn rate (0-1), scales the retention lift
/// * `params` - Model coefficients
///
/// # Returns
/// Projected revenue, cost, profit, deltas, ROI and risk score, rounded for
/// display (currency and percentages to 2 dp, risk score to 1 dp).
pub fn simulate_strategy(
    baseline: &FinancialBaseline,
    decision: &StrategyDecision,
    churn_rate: Decimal,
    params: &ModelParams,
) -> Result<StrategyProjection, DomainError> {
    baseline.validate()?;
    if churn_rate < Decimal::ZERO || churn_rate > Decimal::ONE {
        return Err(DomainError::ChurnRateOutOfRange(churn_rate));
    }

    let projected_revenue = financial::projected_revenue(baseline, decision, churn_rate, params);
    let projected_cost = financial::projected_cost(baseline, decision, params);

    let base_profit = baseline.profit();
    let projected_profit = projected_revenue - projected_cost;
    let incremental_investment = projected_cost - baseline.cost;
    let roi = financial::roi_pct(projected_profit - base_profit, incremental_investment);

    let risk_score = risk::strategy_risk_score(
        decision.marketing_increase_pct,
        decision.price_change_pct,
        decision.employee_hiring_count,
        decision.retention_investment,
        params,
    );

    Ok(StrategyProjection {
        base_revenue: baseline.revenue.round_dp(2),
        base_cost: baseline.cost.round_dp(2),
        base_profit: base_profit.round_dp(2),
        projected_revenue: projected_revenue.round_dp(2),
        projected_cost: projected_cost.round_dp(2),
        projected_profit: projected_profit.round_dp(2),
        revenue_delta: (projected_revenue - baseline.revenue).round_dp(2),
        cost_delta: incremental_investment.round_dp(2),
        profit_delta: (projected_profit - base_profit).round_dp(2),
        roi_pct: roi.round_dp(2),
        risk_score: risk_score.round_dp(1),
    })
}
