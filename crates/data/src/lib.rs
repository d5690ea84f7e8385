//! Synthetic business datasets.
//!
//! Every generator takes an explicit random generator so callers control
//! reproducibility per invocation; there is no ambient RNG state anywhere
//! in this crate. The same seed always yields the same dataset.

pub mod churn;
pub mod costs;
pub mod revenue;

pub use churn::{
    ContractType, CustomerRecord, PaymentMethod, generate_customer_records, observed_churn_rate,
};
pub use costs::{CostRecord, generate_cost_records};
pub use revenue::{RevenuePoint, generate_revenue_series};
