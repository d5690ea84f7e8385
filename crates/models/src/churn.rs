//! Churn classification.
//!
//! Logistic regression over standardized customer features, trained with
//! the same L-BFGS harness the profit optimizer uses. The seeded train/test
//! split keeps every fit reproducible.

use crate::error::ModelError;
use argmin::core::{CostFunction, Error, Executor, Gradient};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use stratlab_data::CustomerRecord;
use tracing::debug;

const FEATURE_COUNT: usize = 7;
const TEST_FRACTION: f64 = 0.2;
const L2_REGULARIZATION: f64 = 1e-3;
const MAX_FIT_ITERATIONS: u64 = 200;
const LBFGS_MEMORY: usize = 7;

/// Test-set evaluation of a fitted churn model.
///
/// `confusion` is indexed `[actual][predicted]` with 0 = retained,
/// 1 = churned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnMetrics {
    pub roc_auc: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: [[u32; 2]; 2],
}

/// Logistic churn classifier.
#[derive(Debug)]
pub struct LogisticChurnModel {
    /// Bias followed by one weight per standardized feature.
    weights: Vec<f64>,
    means: Vec<f64>,
    stds: Vec<f64>,
    metrics: ChurnMetrics,
}

impl LogisticChurnModel {
    /// Fits the classifier on customer records.
    ///
    /// The records are shuffled with the caller's generator and split 80/20;
    /// evaluation metrics come from the held-out 20%.
    pub fn fit<R: Rng + ?Sized>(
        records: &[CustomerRecord],
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if records.len() < 20 {
            return Err(ModelError::TooFewObservations(records.len()));
        }

        let mut indices: Vec<usize> = (0..records.len()).collect();
        indices.shuffle(rng);
        let test_len = ((records.len() as f64 * TEST_FRACTION) as usize).max(1);
        let (test_idx, train_idx) = indices.split_at(test_len);

        let train_features: Vec<[f64; FEATURE_COUNT]> =
            train_idx.iter().map(|&i| features(&records[i])).collect();
        let (means, stds) = feature_moments(&train_features);

        let rows: Vec<Vec<f64>> = train_features
            .iter()
            .map(|f| design_row(f, &means, &stds))
            .collect();
        let labels: Vec<f64> = train_idx
            .iter()
            .map(|&i| if records[i].churned { 1.0 } else { 0.0 })
            .collect();

        let problem = LogisticNll {
            rows,
            labels,
            l2: L2_REGULARIZATION,
        };
        let weights = run_fit(problem)?;

        let mut model = Self {
            weights,
            means,
            stds,
            metrics: ChurnMetrics {
                roc_auc: 0.5,
                precision: 0.0,
                recall: 0.0,
                f1: 0.0,
                confusion: [[0; 2]; 2],
            },
        };

        let scores: Vec<f64> = test_idx
            .iter()
            .map(|&i| model.predict_proba(&records[i]))
            .collect();
        let actuals: Vec<bool> = test_idx.iter().map(|&i| records[i].churned).collect();
        model.metrics = evaluate(&scores, &actuals);

        debug!(
            train = train_idx.len(),
            test = test_idx.len(),
            roc_auc = model.metrics.roc_auc,
            "fitted churn model"
        );

        Ok(model)
    }

    /// Churn probability of a customer, in [0, 1].
    #[must_use]
    pub fn predict_proba(&self, record: &CustomerRecord) -> f64 {
        let row = design_row(&features(record), &self.means, &self.stds);
        let z: f64 = row.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum();
        sigmoid(z)
    }

    /// Held-out evaluation metrics from the fit.
    #[must_use]
    pub fn metrics(&self) -> &ChurnMetrics {
        &self.metrics
    }
}

fn features(record: &CustomerRecord) -> [f64; FEATURE_COUNT] {
    [
        record.tenure_months as f64,
        record.monthly_charges.to_f64().unwrap_or(0.0),
        record.total_charges.to_f64().unwrap_or(0.0),
        record.num_products as f64,
        record.support_calls as f64,
        record.contract.ordinal() as f64,
        record.payment_method.ordinal() as f64,
    ]
}

fn feature_moments(rows: &[[f64; FEATURE_COUNT]]) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let mut means = vec![0.0; FEATURE_COUNT];
    for row in rows {
        for (m, x) in means.iter_mut().zip(row.iter()) {
            *m += x;
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut stds = vec![0.0; FEATURE_COUNT];
    for row in rows {
        for ((s, x), m) in stds.iter_mut().zip(row.iter()).zip(means.iter()) {
            *s += (x - m) * (x - m);
        }
    }
    for s in &mut stds {
        *s = (*s / n).sqrt();
        // Constant columns carry no signal; leave them centered at zero.
        if *s < 1e-12 {
            *s = 1.0;
        }
    }
    (means, stds)
}

/// Intercept column plus standardized features.
fn design_row(features: &[f64; FEATURE_COUNT], means: &[f64], stds: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(FEATURE_COUNT + 1);
    row.push(1.0);
    for ((x, m), s) in features.iter().zip(means.iter()).zip(stds.iter()) {
        row.push((x - m) / s);
    }
    row
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Numerically stable ln(1 + e^z).
fn log1p_exp(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Regularized negative log-likelihood of the training rows.
struct LogisticNll {
    rows: Vec<Vec<f64>>,
    labels: Vec<f64>,
    l2: f64,
}

impl CostFunction for LogisticNll {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, weights: &Self::Param) -> Result<Self::Output, Error> {
        let n = self.rows.len() as f64;
        let nll: f64 = self
            .rows
            .iter()
            .zip(self.labels.iter())
            .map(|(row, y)| {
                let z: f64 = row.iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
                log1p_exp(z) - y * z
            })
            .sum();
        // The intercept is not penalized.
        let ridge: f64 = weights.iter().skip(1).map(|w| w * w).sum();
        Ok(nll / n + self.l2 * ridge)
    }
}

impl Gradient for LogisticNll {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, weights: &Self::Param) -> Result<Self::Gradient, Error> {
        let n = self.rows.len() as f64;
        let mut grad = vec![0.0; weights.len()];
        for (row, y) in self.rows.iter().zip(self.labels.iter()) {
            let z: f64 = row.iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
            let error = sigmoid(z) - y;
            for (g, x) in grad.iter_mut().zip(row.iter()) {
                *g += error * x;
            }
        }
        for g in &mut grad {
            *g /= n;
        }
        for (g, w) in grad.iter_mut().zip(weights.iter()).skip(1) {
            *g += 2.0 * self.l2 * w;
        }
        Ok(grad)
    }
}

fn run_fit(problem: LogisticNll) -> Result<Vec<f64>, ModelError> {
    let init = vec![0.0; FEATURE_COUNT + 1];
    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, LBFGS_MEMORY);

    let result = Executor::new(problem, solver)
        .configure(|state| state.param(init).max_iters(MAX_FIT_ITERATIONS))
        .run()
        .map_err(|e| ModelError::SolverFailed(e.to_string()))?;

    result
        .state()
        .best_param
        .clone()
        .ok_or_else(|| ModelError::SolverFailed("no parameters produced".to_string()))
}

fn evaluate(scores: &[f64], actuals: &[bool]) -> ChurnMetrics {
    let mut confusion = [[0u32; 2]; 2];
    for (score, actual) in scores.iter().zip(actuals.iter()) {
        let predicted = usize::from(*score >= 0.5);
        confusion[usize::from(*actual)][predicted] += 1;
    }

    let tp = confusion[1][1] as f64;
    let fp = confusion[0][1] as f64;
    let fn_ = confusion[1][0] as f64;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ChurnMetrics {
        roc_auc: roc_auc(scores, actuals),
        precision,
        recall,
        f1,
        confusion,
    }
}

/// Rank-based AUC with midranks for tied scores. Degenerate single-class
/// sets score 0.5 (no ranking information).
fn roc_auc(scores: &[f64], actuals: &[bool]) -> f64 {
    let n_pos = actuals.iter().filter(|a| **a).count();
    let n_neg = actuals.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = midrank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = ranks
        .iter()
        .zip(actuals.iter())
        .filter(|(_, a)| **a)
        .map(|(r, _)| r)
        .sum();
    let n_pos = n_pos as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;
    use stratlab_data::{ContractType, PaymentMethod, generate_customer_records};

    fn record(tenure: u32, monthly: i64, calls: u32, products: u32, churned: bool) -> CustomerRecord {
        CustomerRecord {
            tenure_months: tenure,
            monthly_charges: Decimal::from(monthly),
            total_charges: Decimal::from(monthly * tenure as i64),
            num_products: products,
            support_calls: calls,
            contract: match tenure % 3 {
                0 => ContractType::MonthToMonth,
                1 => ContractType::OneYear,
                _ => ContractType::TwoYear,
            },
            payment_method: match tenure % 4 {
                0 => PaymentMethod::ElectronicCheck,
                1 => PaymentMethod::MailedCheck,
                2 => PaymentMethod::BankTransfer,
                _ => PaymentMethod::CreditCard,
            },
            churned,
        }
    }

    /// Churn decided entirely by support call volume.
    fn separable_records(n: usize) -> Vec<CustomerRecord> {
        (0..n)
            .map(|i| {
                let calls = (i % 10) as u32;
                record(
                    1 + (i % 70) as u32,
                    20 + (i % 100) as i64,
                    calls,
                    1 + (i % 5) as u32,
                    calls >= 5,
                )
            })
            .collect()
    }

    #[test]
    fn test_learns_separable_signal() {
        let records = separable_records(400);
        let model = LogisticChurnModel::fit(&records, &mut StdRng::seed_from_u64(42)).unwrap();
        let metrics = model.metrics();

        assert!(metrics.roc_auc > 0.95, "auc {}", metrics.roc_auc);
        assert!(metrics.precision > 0.8, "precision {}", metrics.precision);
        assert!(metrics.recall > 0.8, "recall {}", metrics.recall);

        // More support calls, more churn risk.
        let quiet = model.predict_proba(&record(36, 60, 0, 3, false));
        let noisy = model.predict_proba(&record(36, 60, 9, 3, false));
        assert!(noisy > quiet);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let records = separable_records(200);
        let model = LogisticChurnModel::fit(&records, &mut StdRng::seed_from_u64(42)).unwrap();
        for r in &records {
            let p = model.predict_proba(r);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_fits_generated_dataset() {
        let records = generate_customer_records(2000, &mut StdRng::seed_from_u64(42));
        let model = LogisticChurnModel::fit(&records, &mut StdRng::seed_from_u64(7)).unwrap();
        // Labels are drawn from a noisy probability, so the ceiling is well
        // below 1; anything clearly better than chance is a working fit.
        assert!(model.metrics().roc_auc > 0.6, "auc {}", model.metrics().roc_auc);
    }

    #[test]
    fn test_rejects_small_datasets() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            LogisticChurnModel::fit(&[], &mut rng).unwrap_err(),
            ModelError::EmptyDataset
        );
        let few = separable_records(10);
        assert_eq!(
            LogisticChurnModel::fit(&few, &mut rng).unwrap_err(),
            ModelError::TooFewObservations(10)
        );
    }

    #[test]
    fn test_roc_auc_ranking() {
        // Perfect ranking.
        let auc = roc_auc(&[0.9, 0.8, 0.2, 0.1], &[true, true, false, false]);
        assert!((auc - 1.0).abs() < 1e-12);
        // Inverted ranking.
        let auc = roc_auc(&[0.1, 0.2, 0.8, 0.9], &[true, true, false, false]);
        assert!(auc.abs() < 1e-12);
        // All scores tied: no information.
        let auc = roc_auc(&[0.5, 0.5, 0.5, 0.5], &[true, true, false, false]);
        assert!((auc - 0.5).abs() < 1e-12);
        // Single class.
        assert!((roc_auc(&[0.4, 0.6], &[true, true]) - 0.5).abs() < 1e-12);
    }
}
