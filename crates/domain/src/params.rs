use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed coefficients of the financial model.
///
/// Defaults are the calibrated demo values; callers with their own
/// calibration override individual fields through the builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Average annual fully-loaded cost per new hire (USD).
    pub avg_employee_cost: Decimal,
    /// Revenue lift per 1% of additional marketing spend (1% spend -> 0.5% revenue).
    pub marketing_elasticity: Decimal,
    /// Revenue recovered per retention dollar, before churn scaling.
    pub retention_revenue_multiplier: Decimal,
    /// Risk score weight on |marketing increase %|.
    pub marketing_risk_weight: Decimal,
    /// Risk score weight on |price change %|.
    pub pricing_risk_weight: Decimal,
    /// Risk score weight per new hire.
    pub hiring_risk_weight: Decimal,
    /// Risk score weight per 10,000 USD of retention investment.
    pub retention_risk_weight_per_10k: Decimal,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            avg_employee_cost: Decimal::from(60_000),
            marketing_elasticity: Decimal::new(5, 1),
            retention_revenue_multiplier: Decimal::from(3),
            marketing_risk_weight: Decimal::new(4, 1),
            pricing_risk_weight: Decimal::new(12, 1),
            hiring_risk_weight: Decimal::new(3, 1),
            retention_risk_weight_per_10k: Decimal::new(5, 1),
        }
    }
}

impl ModelParams {
    /// Sets the average annual cost per new hire.
    #[must_use]
    pub fn with_avg_employee_cost(mut self, cost: Decimal) -> Self {
        self.avg_employee_cost = cost;
        self
    }

    /// Sets the marketing-to-revenue elasticity.
    #[must_use]
    pub fn with_marketing_elasticity(mut self, elasticity: Decimal) -> Self {
        self.marketing_elasticity = elasticity;
        self
    }

    /// Sets the retention revenue multiplier.
    #[must_use]
    pub fn with_retention_revenue_multiplier(mut self, multiplier: Decimal) -> Self {
        self.retention_revenue_multiplier = multiplier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_params() {
        let params = ModelParams::default();
        assert_eq!(params.avg_employee_cost, dec!(60000));
        assert_eq!(params.marketing_elasticity, dec!(0.5));
        assert_eq!(params.retention_revenue_multiplier, dec!(3));
        assert_eq!(params.pricing_risk_weight, dec!(1.2));
    }

    #[test]
    fn test_builders() {
        let params = ModelParams::default()
            .with_avg_employee_cost(dec!(80000))
            .with_marketing_elasticity(dec!(0.7));
        assert_eq!(params.avg_employee_cost, dec!(80000));
        assert_eq!(params.marketing_elasticity, dec!(0.7));
    }
}
