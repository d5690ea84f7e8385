use crate::value_objects::projection::StrategyProjection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a profit optimization run.
///
/// Constructed fresh per call and never mutated. `hiring_count` is the
/// decision rounded to a whole number of employees, and `projection` is
/// recomputed from that rounded decision rather than the solver's raw
/// fractional point. When the solver does not converge the fields hold the
/// initial-guess decision and its projection, `optimizer_success` is false,
/// and `optimizer_message` carries the solver diagnostic; callers must
/// branch on the flag rather than expect an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimized marketing spend increase, percent.
    pub marketing_increase_pct: Decimal,
    /// Optimized price change, percent.
    pub price_change_pct: Decimal,
    /// Optimized hiring count, whole employees.
    pub hiring_count: u32,
    /// Financial projection of the (rounded) optimized decision.
    pub projection: StrategyProjection,
    /// Whether the solver converged to a solution.
    pub optimizer_success: bool,
    /// Solver termination diagnostic.
    pub optimizer_message: String,
}
