//! Daily cost records with injected anomalies.

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand::seq::index;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Number of spiked records injected into a series.
const ANOMALY_COUNT: usize = 15;

/// One day of cost figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub operational_cost: Decimal,
    pub marketing_cost: Decimal,
    pub hr_cost: Decimal,
    pub total_cost: Decimal,
}

/// Generates daily cost records around stable means, then spikes the
/// operational and marketing costs of 15 random distinct days. Those spikes
/// are what an anomaly detector should recover.
pub fn generate_cost_records<R: Rng + ?Sized>(
    start: NaiveDate,
    periods: usize,
    rng: &mut R,
) -> Vec<CostRecord> {
    let operational = Normal::new(10_000.0, 800.0).unwrap();
    let marketing = Normal::new(5_000.0, 400.0).unwrap();
    let hr = Normal::new(20_000.0, 1_000.0).unwrap();

    let mut operational_costs: Vec<f64> = (0..periods).map(|_| operational.sample(rng)).collect();
    let mut marketing_costs: Vec<f64> = (0..periods).map(|_| marketing.sample(rng)).collect();
    let hr_costs: Vec<f64> = (0..periods).map(|_| hr.sample(rng)).collect();

    for i in index::sample(rng, periods, ANOMALY_COUNT.min(periods)) {
        operational_costs[i] += rng.random_range(8_000.0..20_000.0);
        marketing_costs[i] += rng.random_range(3_000.0..10_000.0);
    }

    (0..periods)
        .map(|i| {
            let operational_cost = to_money(operational_costs[i]);
            let marketing_cost = to_money(marketing_costs[i]);
            let hr_cost = to_money(hr_costs[i]);
            CostRecord {
                date: start + Days::new(i as u64),
                operational_cost,
                marketing_cost,
                hr_cost,
                total_cost: operational_cost + marketing_cost + hr_cost,
            }
        })
        .collect()
}

fn to_money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn test_same_seed_reproduces_records() {
        let a = generate_cost_records(start(), 180, &mut StdRng::seed_from_u64(42));
        let b = generate_cost_records(start(), 180, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_totals_add_up() {
        let records = generate_cost_records(start(), 180, &mut StdRng::seed_from_u64(42));
        assert_eq!(records.len(), 180);
        for r in &records {
            assert_eq!(
                r.total_cost,
                r.operational_cost + r.marketing_cost + r.hr_cost
            );
        }
    }

    #[test]
    fn test_spikes_are_present() {
        let records = generate_cost_records(start(), 180, &mut StdRng::seed_from_u64(42));
        // Baseline operational cost is N(10k, 800); only spiked days land
        // far above it.
        let spiked = records
            .iter()
            .filter(|r| r.operational_cost > dec!(14000))
            .count();
        assert!((10..=15).contains(&spiked), "spiked {spiked}");
    }

    #[test]
    fn test_short_series_caps_anomalies() {
        let records = generate_cost_records(start(), 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(records.len(), 5);
    }
}
