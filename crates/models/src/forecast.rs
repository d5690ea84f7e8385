//! Revenue trend forecasting.

use crate::error::ModelError;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use stratlab_data::RevenuePoint;
use tracing::debug;

/// Number of seasonal buckets (one per month of the year).
const SEASONAL_BUCKETS: usize = 12;

/// One forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Fit quality and headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// In-sample mean absolute percentage error, 0-100 scale.
    pub mape: f64,
    pub last_actual_revenue: Decimal,
    pub next_period_forecast: Decimal,
}

/// A fitted revenue forecaster.
pub trait RevenueForecaster {
    /// Projects `horizon` future periods past the end of the training data.
    fn predict(&self, horizon: usize) -> Vec<ForecastPoint>;

    /// Fit quality and headline figures.
    fn metrics(&self) -> ForecastMetrics;
}

/// Ordinary-least-squares trend plus monthly seasonal offsets.
///
/// The trend is fit on the period index; residuals are averaged into 12
/// seasonal buckets and added back at prediction time.
#[derive(Debug, Clone)]
pub struct LinearTrendModel {
    intercept: f64,
    slope: f64,
    seasonal: [f64; SEASONAL_BUCKETS],
    actuals: Vec<f64>,
    last_date: NaiveDate,
}

impl LinearTrendModel {
    /// Fits trend and seasonality on a revenue series.
    pub fn fit(series: &[RevenuePoint]) -> Result<Self, ModelError> {
        if series.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if series.len() < 2 {
            return Err(ModelError::TooFewObservations(series.len()));
        }

        let n = series.len();
        let actuals: Vec<f64> = series
            .iter()
            .map(|p| p.revenue.to_f64().unwrap_or(0.0))
            .collect();

        let mean_x = (n as f64 - 1.0) / 2.0;
        let mean_y = actuals.iter().sum::<f64>() / n as f64;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (i, y) in actuals.iter().enumerate() {
            let dx = i as f64 - mean_x;
            covariance += dx * (y - mean_y);
            variance += dx * dx;
        }
        let slope = covariance / variance;
        let intercept = mean_y - slope * mean_x;

        let mut seasonal = [0.0; SEASONAL_BUCKETS];
        let mut counts = [0usize; SEASONAL_BUCKETS];
        for (i, y) in actuals.iter().enumerate() {
            let residual = y - (intercept + slope * i as f64);
            seasonal[i % SEASONAL_BUCKETS] += residual;
            counts[i % SEASONAL_BUCKETS] += 1;
        }
        for (total, count) in seasonal.iter_mut().zip(counts.iter()) {
            if *count > 0 {
                *total /= *count as f64;
            }
        }

        debug!(slope, intercept, "fitted revenue trend");

        Ok(Self {
            intercept,
            slope,
            seasonal,
            actuals,
            last_date: series[n - 1].date,
        })
    }

    fn fitted(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64 + self.seasonal[index % SEASONAL_BUCKETS]
    }

    /// In-sample mean absolute percentage error (0-100), skipping zero
    /// actuals.
    #[must_use]
    pub fn mape(&self) -> f64 {
        let mut total = 0.0;
        let mut counted = 0usize;
        for (i, actual) in self.actuals.iter().enumerate() {
            if *actual != 0.0 {
                total += ((actual - self.fitted(i)) / actual).abs();
                counted += 1;
            }
        }
        if counted == 0 {
            return 0.0;
        }
        total / counted as f64 * 100.0
    }
}

impl RevenueForecaster for LinearTrendModel {
    fn predict(&self, horizon: usize) -> Vec<ForecastPoint> {
        let n = self.actuals.len();
        (1..=horizon)
            .map(|ahead| ForecastPoint {
                date: self.last_date + Days::new(30 * ahead as u64),
                revenue: Decimal::from_f64(self.fitted(n - 1 + ahead))
                    .unwrap_or_default()
                    .round_dp(2),
            })
            .collect()
    }

    fn metrics(&self) -> ForecastMetrics {
        let next = self
            .predict(1)
            .first()
            .map(|p| p.revenue)
            .unwrap_or_default();
        ForecastMetrics {
            mape: self.mape(),
            last_actual_revenue: Decimal::from_f64(*self.actuals.last().unwrap_or(&0.0))
                .unwrap_or_default()
                .round_dp(2),
            next_period_forecast: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;
    use stratlab_data::generate_revenue_series;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
    }

    fn linear_series(n: usize, intercept: f64, slope: f64) -> Vec<RevenuePoint> {
        (0..n)
            .map(|i| RevenuePoint {
                date: start() + Days::new(30 * i as u64),
                revenue: Decimal::from_f64(intercept + slope * i as f64).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_recovers_clean_linear_trend() {
        let model = LinearTrendModel::fit(&linear_series(24, 1000.0, 50.0)).unwrap();
        assert!((model.slope - 50.0).abs() < 1e-9);
        assert!((model.intercept - 1000.0).abs() < 1e-6);
        assert!(model.mape() < 1e-9);

        let forecast = model.predict(3);
        assert_eq!(forecast.len(), 3);
        // Next period continues the trend: 1000 + 50 * 24.
        assert_eq!(forecast[0].revenue, dec!(2200));
        assert_eq!(forecast[0].date, start() + Days::new(30 * 24));
        assert_eq!(forecast[2].revenue, dec!(2300));
    }

    #[test]
    fn test_metrics_report_last_actual_and_next() {
        let model = LinearTrendModel::fit(&linear_series(12, 500.0, 10.0)).unwrap();
        let metrics = model.metrics();
        assert_eq!(metrics.last_actual_revenue, dec!(610));
        assert_eq!(metrics.next_period_forecast, dec!(620));
        assert!(metrics.mape < 1e-9);
    }

    #[test]
    fn test_fits_generated_series_reasonably() {
        let series = generate_revenue_series(start(), 36, &mut StdRng::seed_from_u64(42));
        let model = LinearTrendModel::fit(&series).unwrap();

        // Trend of the generator runs 500k -> 900k over 35 steps.
        assert!(model.slope > 5_000.0 && model.slope < 20_000.0, "slope {}", model.slope);
        // Noise is ~3% of the level; seasonal buckets soak up part of it.
        assert!(model.mape() < 10.0, "mape {}", model.mape());

        let forecast = model.predict(6);
        assert_eq!(forecast.len(), 6);
        assert!(forecast[0].revenue > dec!(700000));
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert_eq!(
            LinearTrendModel::fit(&[]).unwrap_err(),
            ModelError::EmptyDataset
        );
        assert_eq!(
            LinearTrendModel::fit(&linear_series(1, 100.0, 0.0)).unwrap_err(),
            ModelError::TooFewObservations(1)
        );
    }
}
