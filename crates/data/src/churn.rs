//! Customer records with churn labels.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Contract commitment of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl ContractType {
    /// Ordinal encoding for model features.
    #[must_use]
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::MonthToMonth => 0,
            Self::OneYear => 1,
            Self::TwoYear => 2,
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    ElectronicCheck,
    MailedCheck,
    BankTransfer,
    CreditCard,
}

impl PaymentMethod {
    /// Ordinal encoding for model features.
    #[must_use]
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::ElectronicCheck => 0,
            Self::MailedCheck => 1,
            Self::BankTransfer => 2,
            Self::CreditCard => 3,
        }
    }
}

/// One customer with a churn outcome label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Months since signup, 1-71.
    pub tenure_months: u32,
    pub monthly_charges: Decimal,
    pub total_charges: Decimal,
    /// Products held, 1-5.
    pub num_products: u32,
    /// Support calls in the last year, 0-9.
    pub support_calls: u32,
    pub contract: ContractType,
    pub payment_method: PaymentMethod,
    pub churned: bool,
}

/// Churn probability of a customer profile: short tenure, high charges and
/// frequent support calls raise it, a broader product footprint lowers it.
/// Clipped to [0.05, 0.95] so neither label is ever certain.
fn churn_probability(tenure: u32, monthly_charges: f64, support_calls: u32, products: u32) -> f64 {
    let p = 0.4 * (1.0 / (tenure as f64 + 1.0))
        + 0.3 * (monthly_charges / 120.0)
        + 0.2 * (support_calls as f64 / 10.0)
        - 0.1 * (products as f64 / 5.0);
    p.clamp(0.05, 0.95)
}

/// Generates `n` synthetic customer records with churn labels drawn from
/// the profile-dependent probability above.
pub fn generate_customer_records<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<CustomerRecord> {
    let charge_noise = Normal::new(0.0, 50.0).unwrap();

    (0..n)
        .map(|_| {
            let tenure_months = rng.random_range(1..72);
            let monthly_charges = rng.random_range(20.0..120.0);
            let total_charges =
                tenure_months as f64 * monthly_charges + charge_noise.sample(rng);
            let num_products = rng.random_range(1..6);
            let support_calls = rng.random_range(0..10);

            let contract = match rng.random_range(0.0..1.0) {
                r if r < 0.5 => ContractType::MonthToMonth,
                r if r < 0.8 => ContractType::OneYear,
                _ => ContractType::TwoYear,
            };
            let payment_method = match rng.random_range(0..4) {
                0 => PaymentMethod::ElectronicCheck,
                1 => PaymentMethod::MailedCheck,
                2 => PaymentMethod::BankTransfer,
                _ => PaymentMethod::CreditCard,
            };

            let churned = rng.random_bool(churn_probability(
                tenure_months,
                monthly_charges,
                support_calls,
                num_products,
            ));

            CustomerRecord {
                tenure_months,
                monthly_charges: Decimal::from_f64(monthly_charges)
                    .unwrap_or_default()
                    .round_dp(2),
                total_charges: Decimal::from_f64(total_charges)
                    .unwrap_or_default()
                    .round_dp(2),
                num_products,
                support_calls,
                contract,
                payment_method,
                churned,
            }
        })
        .collect()
}

/// Fraction of records with a churn label.
#[must_use]
pub fn observed_churn_rate(records: &[CustomerRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|r| r.churned).count() as f64 / records.len() as f64
}
