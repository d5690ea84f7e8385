//! Constrained profit optimization.
//!
//! Searches the space of marketing / pricing / hiring decisions for the
//! point maximizing projected profit under a risk ceiling and a budget
//! ceiling. The search wraps the same financial model the strategy
//! simulator evaluates, so the optimizer's result is always reproducible
//! through a plain simulation of the returned decision.

mod objective;
pub mod optimizer;

pub use optimizer::ProfitOptimizer;
