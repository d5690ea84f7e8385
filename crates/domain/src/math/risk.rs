//! Decision risk scoring.
//!
//! The strategy simulator scores retention spend as a risk input; the
//! optimizer's search constraint (`search_risk_score` in the optimization
//! crate) does not. The two formulas are intentionally kept separate and
//! named for what they score; see DESIGN.md before changing either.

use crate::params::ModelParams;
use rust_decimal::Decimal;

/// Risk score of a full strategy decision, clamped to [0, 100].
///
/// Aggressive marketing, pricing moves, hiring, and large retention bets
/// all raise the score.
#[must_use]
pub fn strategy_risk_score(
    marketing_pct: Decimal,
    price_pct: Decimal,
    hires: u32,
    retention_investment: Decimal,
    params: &ModelParams,
) -> Decimal {
    let raw = params.marketing_risk_weight * marketing_pct.abs()
        + params.pricing_risk_weight * price_pct.abs()
        + params.hiring_risk_weight * Decimal::from(hires)
        + params.retention_risk_weight_per_10k * (retention_investment / Decimal::from(10_000));
    raw.min(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_decision_scores_zero() {
        let score = strategy_risk_score(
            Decimal::ZERO,
            Decimal::ZERO,
            0,
            Decimal::ZERO,
            &ModelParams::default(),
        );
        assert_eq!(score, Decimal::ZERO);
    }

    #[test]
    fn test_reference_score() {
        // 0.4*10 + 1.2*5 + 0.3*5 + 0.5*10 = 16.5
        let score = strategy_risk_score(
            dec!(10),
            dec!(5),
            5,
            dec!(100000),
            &ModelParams::default(),
        );
        assert_eq!(score, dec!(16.5));
    }

    #[test]
    fn test_price_cuts_score_like_raises() {
        let params = ModelParams::default();
        let up = strategy_risk_score(dec!(0), dec!(8), 0, dec!(0), &params);
        let down = strategy_risk_score(dec!(0), dec!(-8), 0, dec!(0), &params);
        assert_eq!(up, down);
    }

    #[test]
    fn test_clamped_at_100() {
        let score = strategy_risk_score(
            dec!(10000),
            dec!(500),
            50,
            dec!(10000000),
            &ModelParams::default(),
        );
        assert_eq!(score, dec!(100));
    }
}
