//! Cost anomaly detection.

use crate::error::ModelError;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use stratlab_data::CostRecord;

/// Cost features scored per record.
const FEATURE_COUNT: usize = 4;

/// A scored cost record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub date: NaiveDate,
    /// Largest absolute z-score across the cost features.
    pub score: f64,
    pub is_anomaly: bool,
}

/// Z-score based outlier detector.
///
/// Standardizes each cost column, scores every record by its most extreme
/// feature, and flags the top `contamination` fraction. The contamination
/// parameter plays the same role as in density-based detectors: the
/// expected share of anomalous rows.
#[derive(Debug, Clone, Copy)]
pub struct ZScoreDetector {
    contamination: f64,
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self { contamination: 0.08 }
    }
}

impl ZScoreDetector {
    /// Creates a detector expecting the given fraction of anomalies.
    pub fn new(contamination: f64) -> Result<Self, ModelError> {
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(ModelError::InvalidContamination(contamination));
        }
        Ok(Self { contamination })
    }

    /// Scores all records and flags the most extreme ones.
    pub fn detect(&self, records: &[CostRecord]) -> Result<Vec<AnomalyScore>, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let rows: Vec<[f64; FEATURE_COUNT]> = records.iter().map(feature_row).collect();
        let n = rows.len() as f64;

        let mut means = [0.0; FEATURE_COUNT];
        for row in &rows {
            for (m, x) in means.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut stds = [0.0; FEATURE_COUNT];
        for row in &rows {
            for ((s, x), m) in stds.iter_mut().zip(row.iter()).zip(means.iter()) {
                *s += (x - m) * (x - m);
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
            if *s < 1e-12 {
                *s = 1.0;
            }
        }

        let scores: Vec<f64> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(means.iter())
                    .zip(stds.iter())
                    .map(|((x, m), s)| ((x - m) / s).abs())
                    .fold(0.0, f64::max)
            })
            .collect();

        let flagged = (self.contamination * n).ceil() as usize;
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
        });
        let mut is_anomaly = vec![false; scores.len()];
        for &i in order.iter().take(flagged) {
            is_anomaly[i] = true;
        }

        Ok(records
            .iter()
            .zip(scores.iter())
            .zip(is_anomaly.iter())
            .map(|((record, score), flagged)| AnomalyScore {
                date: record.date,
                score: *score,
                is_anomaly: *flagged,
            })
            .collect())
    }
}

fn feature_row(record: &CostRecord) -> [f64; FEATURE_COUNT] {
    [
        record.operational_cost.to_f64().unwrap_or(0.0),
        record.marketing_cost.to_f64().unwrap_or(0.0),
        record.hr_cost.to_f64().unwrap_or(0.0),
        record.total_cost.to_f64().unwrap_or(0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;
    use stratlab_data::generate_cost_records;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn record(day: u64, operational: i64) -> CostRecord {
        let operational = Decimal::from(operational);
        let marketing = Decimal::from(5_000);
        let hr = Decimal::from(20_000);
        CostRecord {
            date: start() + Days::new(day),
            operational_cost: operational,
            marketing_cost: marketing,
            hr_cost: hr,
            total_cost: operational + marketing + hr,
        }
    }

    #[test]
    fn test_flags_planted_spikes() {
        let mut records: Vec<CostRecord> = (0..97)
            .map(|i| record(i, 10_000 + (i as i64 % 7) * 100))
            .collect();
        records.push(record(97, 30_000));
        records.push(record(98, 28_000));
        records.push(record(99, 32_000));

        let detector = ZScoreDetector::new(0.03).unwrap();
        let scored = detector.detect(&records).unwrap();

        let flagged: Vec<&AnomalyScore> = scored.iter().filter(|s| s.is_anomaly).collect();
        assert_eq!(flagged.len(), 3);
        for anomaly in flagged {
            assert!(anomaly.date >= start() + Days::new(97));
        }
    }

    #[test]
    fn test_contamination_controls_flag_count() {
        let records = generate_cost_records(start(), 180, &mut StdRng::seed_from_u64(42));
        let scored = ZScoreDetector::default().detect(&records).unwrap();
        let flagged = scored.iter().filter(|s| s.is_anomaly).count();
        // ceil(0.08 * 180)
        assert_eq!(flagged, 15);
        assert_eq!(scored.len(), 180);
    }

    #[test]
    fn test_scores_order_matches_extremity() {
        let records = vec![record(0, 10_000), record(1, 10_100), record(2, 25_000)];
        let scored = ZScoreDetector::new(0.34).unwrap().detect(&records).unwrap();
        assert!(scored[2].score > scored[0].score);
        assert!(scored[2].is_anomaly);
    }

    #[test]
    fn test_input_validation() {
        assert_eq!(
            ZScoreDetector::new(0.0).unwrap_err(),
            ModelError::InvalidContamination(0.0)
        );
        assert_eq!(
            ZScoreDetector::new(0.6).unwrap_err(),
            ModelError::InvalidContamination(0.6)
        );
        assert_eq!(
            ZScoreDetector::default().detect(&[]).unwrap_err(),
            ModelError::EmptyDataset
        );
    }
}
