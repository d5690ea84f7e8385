pub mod baseline;
pub mod constraints;
pub mod decision;
pub mod optimization_result;
pub mod projection;

pub use baseline::FinancialBaseline;
pub use constraints::OptimizationConstraints;
pub use decision::StrategyDecision;
pub use optimization_result::OptimizationResult;
pub use projection::StrategyProjection;
