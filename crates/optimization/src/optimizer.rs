//! L-BFGS search, projection and fallback handling.

use crate::objective::{HIRING_BOUNDS, MARKETING_BOUNDS, PRICE_BOUNDS, ProfitProblem};
use argmin::core::{Executor, TerminationReason, TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use stratlab_domain::error::DomainError;
use stratlab_domain::params::ModelParams;
use stratlab_domain::value_objects::{
    FinancialBaseline, OptimizationConstraints, OptimizationResult, StrategyDecision,
};
use stratlab_simulation::simulate_strategy;
use tracing::{debug, info, warn};

/// Fixed starting point: modest values inside all bounds and typically
/// feasible. The search is local, so this choice matters; keep it stable.
const INITIAL_GUESS: [f64; 3] = [5.0, 2.0, 2.0];

const DEFAULT_MAX_ITERATIONS: u64 = 500;
const DEFAULT_COST_TOLERANCE: f64 = 1e-6;
const DEFAULT_PENALTY_WEIGHT: f64 = 1e6;

/// L-BFGS history size, typical choice.
const LBFGS_MEMORY: usize = 7;

/// Outcome of one solver run before post-processing.
struct SolverRun {
    point: Vec<f64>,
    converged: bool,
    message: String,
}

/// Searches marketing / pricing / hiring decisions for maximum projected
/// profit under a risk ceiling and a budget ceiling.
///
/// `optimize` never fails for valid inputs: if the solver errors or stops
/// without converging, the result carries the initial guess with
/// `optimizer_success = false` and the solver's diagnostic message. Callers
/// must branch on the flag, not catch errors.
pub struct ProfitOptimizer {
    params: ModelParams,
    max_iterations: u64,
    tolerance: f64,
    penalty_weight: f64,
}

impl Default for ProfitOptimizer {
    fn default() -> Self {
        Self::new(ModelParams::default())
    }
}

impl ProfitOptimizer {
    /// Creates an optimizer over the given model coefficients.
    #[must_use]
    pub fn new(params: ModelParams) -> Self {
        Self {
            params,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_COST_TOLERANCE,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the constraint penalty weight.
    #[must_use]
    pub fn with_penalty_weight(mut self, weight: f64) -> Self {
        self.penalty_weight = weight;
        self
    }

    /// Finds the decision maximizing projected profit within the
    /// constraints.
    ///
    /// The hiring count in the result is rounded to a whole number of
    /// employees and the reported projection is recomputed from the rounded
    /// decision, so the displayed profit is achievable as stated.
    pub fn optimize(
        &self,
        baseline: &FinancialBaseline,
        constraints: &OptimizationConstraints,
    ) -> Result<OptimizationResult, DomainError> {
        baseline.validate()?;
        constraints.validate()?;

        info!(
            budget_limit = %constraints.budget_limit,
            risk_threshold = %constraints.risk_threshold,
            "starting profit optimization"
        );

        let problem = ProfitProblem::new(baseline, constraints, &self.params, self.penalty_weight);
        let initial = INITIAL_GUESS.to_vec();

        let (point, success, message) = match self.run_lbfgs(problem.clone(), initial.clone()) {
            Ok(run) if run.converged => {
                let projected = Self::project_onto_constraints(&run.point, &problem);
                (projected, true, run.message)
            }
            Ok(run) => {
                warn!(message = %run.message, "solver did not converge, returning initial guess");
                (initial, false, run.message)
            }
            Err(message) => {
                warn!(message = %message, "solver failed, returning initial guess");
                (initial, false, message)
            }
        };

        let marketing = Decimal::from_f64(point[0]).unwrap_or_default().round_dp(2);
        let price = Decimal::from_f64(point[1]).unwrap_or_default().round_dp(2);
        let hires = point[2].round().max(0.0) as u32;

        // Recompute the projection from the rounded decision. Retention is
        // pinned to zero: the optimizer does not model retention spend, and
        // at zero the strategy model degenerates to the search objective.
        let decision = StrategyDecision::default()
            .with_marketing_increase(marketing)
            .with_price_change(price)
            .with_hiring(hires);
        let projection = simulate_strategy(baseline, &decision, Decimal::ZERO, &self.params)?;

        debug!(
            marketing = %marketing,
            price = %price,
            hires,
            projected_profit = %projection.projected_profit,
            success,
            "optimization finished"
        );

        Ok(OptimizationResult {
            marketing_increase_pct: marketing,
            price_change_pct: price,
            hiring_count: hires,
            projection,
            optimizer_success: success,
            optimizer_message: message,
        })
    }

    /// Runs L-BFGS with More-Thuente line search on the penalized problem.
    fn run_lbfgs(&self, problem: ProfitProblem, init: Vec<f64>) -> Result<SolverRun, String> {
        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, LBFGS_MEMORY)
            .with_tolerance_cost(self.tolerance)
            .map_err(|e| e.to_string())?;

        let max_iters = self.max_iterations;
        let result = Executor::new(problem, solver)
            .configure(|state| state.param(init).max_iters(max_iters))
            .run()
            .map_err(|e| e.to_string())?;

        let state = result.state();
        debug!(
            iterations = state.iter,
            cost = state.cost,
            "L-BFGS terminated"
        );

        let (converged, message) = match &state.termination_status {
            TerminationStatus::Terminated(reason) => (
                matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                ),
                reason.to_string(),
            ),
            TerminationStatus::NotTerminated => {
                (false, "solver stopped before termination".to_string())
            }
        };

        match state.best_param.clone() {
            Some(point) => Ok(SolverRun {
                point,
                converged,
                message,
            }),
            None => Err("solver produced no parameters".to_string()),
        }
    }

    /// Clamps a converged point to the box and scales it onto the exact
    /// feasible set. The risk and budget surfaces are positively homogeneous
    /// in the decision, so proportional shrinking toward the origin restores
    /// feasibility without leaving the box.
    fn project_onto_constraints(point: &[f64], problem: &ProfitProblem) -> Vec<f64> {
        let mut marketing = point[0].clamp(MARKETING_BOUNDS.0, MARKETING_BOUNDS.1);
        let mut price = point[1].clamp(PRICE_BOUNDS.0, PRICE_BOUNDS.1);
        let mut hires = point[2].clamp(HIRING_BOUNDS.0, HIRING_BOUNDS.1);

        let risk = problem.search_risk_score(marketing, price, hires);
        if risk > problem.risk_threshold && risk > 0.0 {
            let scale = problem.risk_threshold / risk;
            marketing *= scale;
            price *= scale;
            hires *= scale;
        }

        let spend = problem.additional_spend(marketing, hires);
        if spend > problem.budget_limit && spend > 0.0 {
            let scale = problem.budget_limit / spend;
            marketing *= scale;
            hires *= scale;
        }

        vec![marketing, price, hires]
    }
}
