//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use stratlab_simulation::prelude::*;
//! ```

pub use crate::strategy_simulator::simulate_strategy;

pub use stratlab_domain::params::ModelParams;
pub use stratlab_domain::value_objects::{
    FinancialBaseline, StrategyDecision, StrategyProjection,
};
