//! Monthly revenue time series.

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Trend endpoints of the generated series, USD per month.
const TREND_START: f64 = 500_000.0;
const TREND_END: f64 = 900_000.0;
/// Seasonal swing amplitude.
const SEASONALITY_AMPLITUDE: f64 = 50_000.0;
/// Observation noise standard deviation.
const NOISE_STD_DEV: f64 = 20_000.0;

/// One month of revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Generates a synthetic monthly revenue series: linear growth trend, two
/// full seasonal cycles across the series, and Gaussian noise.
///
/// Points are spaced 30 days apart starting at `start`. The caller owns the
/// random generator, so the same seeded generator reproduces the series
/// exactly.
pub fn generate_revenue_series<R: Rng + ?Sized>(
    start: NaiveDate,
    periods: usize,
    rng: &mut R,
) -> Vec<RevenuePoint> {
    let noise = Normal::new(0.0, NOISE_STD_DEV).unwrap();
    let span = periods.saturating_sub(1).max(1) as f64;

    (0..periods)
        .map(|i| {
            let t = i as f64 / span;
            let trend = TREND_START + (TREND_END - TREND_START) * t;
            let seasonality =
                SEASONALITY_AMPLITUDE * (4.0 * std::f64::consts::PI * t).sin();
            let revenue = trend + seasonality + noise.sample(rng);

            RevenuePoint {
                date: start + Days::new(30 * i as u64),
                revenue: Decimal::from_f64(revenue).unwrap_or_default().round_dp(2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
    }

    #[test]
    fn test_same_seed_reproduces_series() {
        let a = generate_revenue_series(start(), 36, &mut StdRng::seed_from_u64(42));
        let b = generate_revenue_series(start(), 36, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let c = generate_revenue_series(start(), 36, &mut StdRng::seed_from_u64(7));
        assert_ne!(a, c);
    }

    #[test]
    fn test_series_shape() {
        let series = generate_revenue_series(start(), 36, &mut StdRng::seed_from_u64(42));
        assert_eq!(series.len(), 36);
        assert_eq!(series[0].date, start());
        assert_eq!(series[1].date, start() + Days::new(30));

        // Trend dominates noise across the full series.
        assert!(series[0].revenue < dec!(650000));
        assert!(series[35].revenue > dec!(750000));
    }

    #[test]
    fn test_empty_and_single_period() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(generate_revenue_series(start(), 0, &mut rng).is_empty());
        let single = generate_revenue_series(start(), 1, &mut rng);
        assert_eq!(single.len(), 1);
    }
}
