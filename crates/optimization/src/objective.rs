//! The penalized search problem.
//!
//! The decision vector is `[marketing_pct, price_pct, hires]` with hires
//! treated as a continuous value during the search and rounded afterwards.
//! Box bounds and the two inequality constraints (risk ceiling, budget
//! ceiling) enter the cost as quadratic penalties; the optimizer projects
//! the converged point back onto the exact feasible set.

use argmin::core::{CostFunction, Error, Gradient};
use rust_decimal::prelude::ToPrimitive;
use stratlab_domain::params::ModelParams;
use stratlab_domain::value_objects::{FinancialBaseline, OptimizationConstraints};

/// Search bounds: marketing increase %, price change %, new hires.
pub(crate) const MARKETING_BOUNDS: (f64, f64) = (0.0, 50.0);
pub(crate) const PRICE_BOUNDS: (f64, f64) = (-10.0, 15.0);
pub(crate) const HIRING_BOUNDS: (f64, f64) = (0.0, 50.0);

/// Budget violations are expressed in thousands so the risk and budget
/// penalties live on comparable scales (risk is O(10), spend is O(10^5)).
const BUDGET_PENALTY_SCALE: f64 = 1_000.0;

/// Profit maximization problem in f64 space.
#[derive(Clone)]
pub(crate) struct ProfitProblem {
    base_revenue: f64,
    base_cost: f64,
    avg_employee_cost: f64,
    marketing_elasticity: f64,
    marketing_risk_weight: f64,
    pricing_risk_weight: f64,
    hiring_risk_weight: f64,
    pub(crate) risk_threshold: f64,
    pub(crate) budget_limit: f64,
    penalty_weight: f64,
}

impl ProfitProblem {
    pub(crate) fn new(
        baseline: &FinancialBaseline,
        constraints: &OptimizationConstraints,
        params: &ModelParams,
        penalty_weight: f64,
    ) -> Self {
        Self {
            base_revenue: baseline.revenue.to_f64().unwrap_or(0.0),
            base_cost: baseline.cost.to_f64().unwrap_or(0.0),
            avg_employee_cost: params.avg_employee_cost.to_f64().unwrap_or(0.0),
            marketing_elasticity: params.marketing_elasticity.to_f64().unwrap_or(0.0),
            marketing_risk_weight: params.marketing_risk_weight.to_f64().unwrap_or(0.0),
            pricing_risk_weight: params.pricing_risk_weight.to_f64().unwrap_or(0.0),
            hiring_risk_weight: params.hiring_risk_weight.to_f64().unwrap_or(0.0),
            risk_threshold: constraints.risk_threshold.to_f64().unwrap_or(0.0),
            budget_limit: constraints.budget_limit.to_f64().unwrap_or(0.0),
            penalty_weight,
        }
    }

    /// Projected profit of a decision point.
    pub(crate) fn projected_profit(&self, marketing_pct: f64, price_pct: f64, hires: f64) -> f64 {
        let revenue = self.base_revenue
            * (1.0 + self.marketing_elasticity * marketing_pct / 100.0 + price_pct / 100.0);
        let cost =
            self.base_cost * (1.0 + marketing_pct / 100.0) + hires * self.avg_employee_cost;
        revenue - cost
    }

    /// Risk score of a search point.
    ///
    /// Unlike the strategy simulator's risk formula this one has NO
    /// retention term: the optimizer does not model retention spend. The two
    /// formulas are kept separate on purpose (see DESIGN.md).
    pub(crate) fn search_risk_score(&self, marketing_pct: f64, price_pct: f64, hires: f64) -> f64 {
        self.marketing_risk_weight * marketing_pct.abs()
            + self.pricing_risk_weight * price_pct.abs()
            + self.hiring_risk_weight * hires
    }

    /// Additional spend a search point commits against the budget.
    pub(crate) fn additional_spend(&self, marketing_pct: f64, hires: f64) -> f64 {
        self.base_cost * marketing_pct / 100.0 + hires * self.avg_employee_cost
    }

    /// Signed distance outside the box, zero inside.
    fn box_excess(value: f64, bounds: (f64, f64)) -> f64 {
        if value < bounds.0 {
            value - bounds.0
        } else if value > bounds.1 {
            value - bounds.1
        } else {
            0.0
        }
    }

    /// Constraint violations at a point: box excesses, risk excess, scaled
    /// budget excess.
    fn violations(&self, x: &[f64]) -> [f64; 5] {
        let risk_excess = (self.search_risk_score(x[0], x[1], x[2]) - self.risk_threshold).max(0.0);
        let budget_excess =
            (self.additional_spend(x[0], x[2]) - self.budget_limit).max(0.0) / BUDGET_PENALTY_SCALE;
        [
            Self::box_excess(x[0], MARKETING_BOUNDS),
            Self::box_excess(x[1], PRICE_BOUNDS),
            Self::box_excess(x[2], HIRING_BOUNDS),
            risk_excess,
            budget_excess,
        ]
    }

    fn penalty(&self, x: &[f64]) -> f64 {
        self.violations(x).iter().map(|v| v * v).sum::<f64>() * self.penalty_weight
    }

    fn penalty_gradient(&self, x: &[f64]) -> [f64; 3] {
        let [box_m, box_p, box_h, risk, budget] = self.violations(x);
        let sign = |v: f64| if v == 0.0 { 0.0 } else { v.signum() };

        let mut grad = [
            2.0 * box_m,
            2.0 * box_p,
            2.0 * box_h,
        ];
        if risk > 0.0 {
            grad[0] += 2.0 * risk * self.marketing_risk_weight * sign(x[0]);
            grad[1] += 2.0 * risk * self.pricing_risk_weight * sign(x[1]);
            grad[2] += 2.0 * risk * self.hiring_risk_weight;
        }
        if budget > 0.0 {
            grad[0] += 2.0 * budget * (self.base_cost / 100.0) / BUDGET_PENALTY_SCALE;
            grad[2] += 2.0 * budget * self.avg_employee_cost / BUDGET_PENALTY_SCALE;
        }
        for g in &mut grad {
            *g *= self.penalty_weight;
        }
        grad
    }
}

impl CostFunction for ProfitProblem {
    type Param = Vec<f64>;
    type Output = f64;

    /// Negative projected profit plus constraint penalties (minimized).
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(-self.projected_profit(x[0], x[1], x[2]) + self.penalty(x))
    }
}

impl Gradient for ProfitProblem {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        // The profit model is linear in the decision, so its gradient is
        // constant; only the penalties vary with x.
        let profit_grad = [
            (self.base_cost - self.base_revenue * self.marketing_elasticity) / 100.0,
            -self.base_revenue / 100.0,
            self.avg_employee_cost,
        ];
        let penalty_grad = self.penalty_gradient(x);
        Ok(profit_grad
            .iter()
            .zip(penalty_grad.iter())
            .map(|(o, p)| o + p)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn problem() -> ProfitProblem {
        ProfitProblem::new(
            &FinancialBaseline::new(dec!(10000000), dec!(7000000)),
            &OptimizationConstraints::new(dec!(1000000), dec!(50)),
            &ModelParams::default(),
            1e6,
        )
    }

    #[test]
    fn test_cost_is_negative_profit_inside_feasible_region() {
        let problem = problem();
        let x = vec![5.0, 2.0, 2.0];
        // revenue 10.45M, cost 7.47M
        assert!((problem.projected_profit(5.0, 2.0, 2.0) - 2_980_000.0).abs() < 1e-6);
        let cost = problem.cost(&x).unwrap();
        assert!((cost + 2_980_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_risk_has_no_retention_term() {
        let problem = problem();
        // 0.4*10 + 1.2*5 + 0.3*5
        assert!((problem.search_risk_score(10.0, 5.0, 5.0) - 11.5).abs() < 1e-12);
        assert!((problem.search_risk_score(0.0, -5.0, 0.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_additional_spend() {
        let problem = problem();
        assert!((problem.additional_spend(10.0, 5.0) - 1_000_000.0).abs() < 1e-9);
        assert_eq!(problem.additional_spend(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_violations_penalize_cost() {
        let problem = problem();
        // Price 40 is far past the box bound.
        let feasible = problem.cost(&vec![0.0, 10.0, 0.0]).unwrap();
        let infeasible = problem.cost(&vec![0.0, 40.0, 0.0]).unwrap();
        assert!(infeasible > feasible);
        // A point past the budget is penalized too.
        let overspend = problem.cost(&vec![30.0, 0.0, 0.0]).unwrap();
        assert!(overspend > -problem.projected_profit(30.0, 0.0, 0.0));
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let problem = problem();
        // Points on both sides of the constraint surfaces, away from the
        // |x| kinks.
        for x in [
            vec![5.0, 2.0, 2.0],
            vec![20.0, 10.0, 8.0],
            vec![49.0, 14.5, 45.0],
            vec![3.0, -8.0, 1.0],
        ] {
            let grad = problem.gradient(&x).unwrap();
            let eps = 1e-4;
            for i in 0..3 {
                let mut hi = x.clone();
                let mut lo = x.clone();
                hi[i] += eps;
                lo[i] -= eps;
                let numeric =
                    (problem.cost(&hi).unwrap() - problem.cost(&lo).unwrap()) / (2.0 * eps);
                let denom = numeric.abs().max(1.0);
                assert!(
                    ((grad[i] - numeric) / denom).abs() < 1e-4,
                    "gradient mismatch at x={x:?} i={i}: analytic {} vs numeric {}",
                    grad[i],
                    numeric
                );
            }
        }
    }
}
