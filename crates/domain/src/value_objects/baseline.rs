use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current (pre-decision) annual financials.
///
/// Both figures must be strictly positive: the ratio and division formulas
/// downstream are undefined otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialBaseline {
    /// Current annual revenue in USD.
    pub revenue: Decimal,
    /// Current annual cost in USD.
    pub cost: Decimal,
}

impl FinancialBaseline {
    /// Creates a new baseline. Call [`FinancialBaseline::validate`] before
    /// feeding it into the model.
    #[must_use]
    pub fn new(revenue: Decimal, cost: Decimal) -> Self {
        Self { revenue, cost }
    }

    /// Current annual profit.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.revenue - self.cost
    }

    /// Rejects non-positive revenue or cost.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.revenue <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRevenue(self.revenue));
        }
        if self.cost <= Decimal::ZERO {
            return Err(DomainError::NonPositiveCost(self.cost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_profit() {
        let baseline = FinancialBaseline::new(dec!(10000000), dec!(7000000));
        assert_eq!(baseline.profit(), dec!(3000000));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(FinancialBaseline::new(dec!(0), dec!(1)).validate().is_err());
        assert!(FinancialBaseline::new(dec!(-5), dec!(1)).validate().is_err());
        assert!(FinancialBaseline::new(dec!(1), dec!(0)).validate().is_err());
        assert!(FinancialBaseline::new(dec!(1), dec!(1)).validate().is_ok());
    }
}
