//! Rule-based executive insight generation.
//!
//! Turns the numeric outputs of the pipelines into board-level commentary
//! and action items. Pure string assembly over thresholds; nothing here is
//! a statistical estimate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the revenue forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueTrend {
    Up,
    Down,
    Stable,
}

/// Business risk bands over the 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        write!(f, "{label}")
    }
}

/// Churn severity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLevel {
    Healthy,
    Elevated,
    Critical,
}

/// Numeric inputs distilled from the pipelines.
#[derive(Debug, Clone)]
pub struct InsightInputs {
    pub revenue_trend: RevenueTrend,
    /// Current churn rate as a fraction (0.15 = 15%).
    pub churn_rate: f64,
    pub anomaly_count: usize,
    /// Risk score of the strategy under evaluation (0-100).
    pub risk_score: f64,
    pub forecast_mape: Option<f64>,
    pub projected_profit_delta: Option<Decimal>,
}

/// Assembled executive briefing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveInsights {
    pub commentary: Vec<String>,
    pub action_items: Vec<String>,
    pub risk_level: RiskLevel,
    pub churn_level: ChurnLevel,
}

impl ExecutiveInsights {
    /// Commentary joined into a single paragraph.
    #[must_use]
    pub fn executive_summary(&self) -> String {
        self.commentary.join(" ")
    }
}

pub fn classify_risk(score: f64) -> RiskLevel {
    if score < 20.0 {
        RiskLevel::Low
    } else if score < 40.0 {
        RiskLevel::Moderate
    } else if score < 65.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

pub fn classify_churn(rate: f64) -> ChurnLevel {
    if rate < 0.05 {
        ChurnLevel::Healthy
    } else if rate < 0.15 {
        ChurnLevel::Elevated
    } else {
        ChurnLevel::Critical
    }
}

fn risk_commentary(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "The business is operating in a stable risk environment.",
        RiskLevel::Moderate => {
            "Moderate risk warrants proactive monitoring and contingency planning."
        }
        RiskLevel::High => {
            "Elevated risk requires immediate strategic attention and mitigation measures."
        }
        RiskLevel::Critical => "Critical risk levels demand urgent executive intervention.",
    }
}

/// Generates board-level commentary and action items from the KPIs.
#[must_use]
pub fn generate_executive_insights(inputs: &InsightInputs) -> ExecutiveInsights {
    let mut commentary = Vec::new();
    let mut action_items = Vec::new();
    let risk_level = classify_risk(inputs.risk_score);
    let churn_level = classify_churn(inputs.churn_rate);
    let churn_pct = inputs.churn_rate * 100.0;

    match inputs.revenue_trend {
        RevenueTrend::Up => commentary.push(
            "Revenue trajectory is positive, reflecting healthy market demand and effective \
             go-to-market execution."
                .to_string(),
        ),
        RevenueTrend::Down => {
            commentary.push(
                "Revenue is exhibiting a downward trend. Immediate investigation into pricing \
                 strategy, sales pipeline health, and competitive positioning is warranted."
                    .to_string(),
            );
            action_items.push(
                "Conduct urgent revenue recovery review with Sales & Marketing leadership."
                    .to_string(),
            );
        }
        RevenueTrend::Stable => {
            commentary.push(
                "Revenue performance remains stable. Consider growth initiatives to capitalize \
                 on market opportunities."
                    .to_string(),
            );
            action_items.push("Identify and evaluate new revenue stream opportunities.".to_string());
        }
    }

    match churn_level {
        ChurnLevel::Critical => {
            commentary.push(format!(
                "Customer churn rate stands at {churn_pct:.1}%, which is critically high and \
                 poses a material risk to recurring revenue."
            ));
            action_items.push(
                "Initiate emergency churn reduction program: targeted retention campaigns and \
                 proactive customer success outreach."
                    .to_string(),
            );
        }
        ChurnLevel::Elevated => {
            commentary.push(format!(
                "Churn rate of {churn_pct:.1}% is above industry benchmarks; retention \
                 investment should be prioritized in the next budget cycle."
            ));
            action_items
                .push("Launch structured customer retention program with measurable KPIs.".to_string());
        }
        ChurnLevel::Healthy => commentary.push(format!(
            "Customer churn is well-controlled at {churn_pct:.1}%, demonstrating strong \
             customer satisfaction."
        )),
    }

    if inputs.anomaly_count > 10 {
        commentary.push(format!(
            "{} cost anomalies detected in operational expenditure. This level of irregularity \
             may indicate process inefficiencies or potential financial risk.",
            inputs.anomaly_count
        ));
        action_items.push(
            "Engage Finance and Operations teams to investigate cost anomalies and implement \
             cost governance controls."
                .to_string(),
        );
    } else if inputs.anomaly_count > 3 {
        commentary.push(format!(
            "{} moderate cost anomalies identified; targeted review of flagged cost centres is \
             recommended.",
            inputs.anomaly_count
        ));
        action_items.push("Schedule cost anomaly review with Finance team.".to_string());
    } else {
        commentary.push(
            "Cost structure is operating within normal parameters. Expenditure discipline is \
             commendable."
                .to_string(),
        );
    }

    commentary.push(format!(
        "Overall business risk score is {:.0}/100 ({risk_level}). {}",
        inputs.risk_score,
        risk_commentary(risk_level)
    ));
    if matches!(risk_level, RiskLevel::High | RiskLevel::Critical) {
        action_items.push(
            "Convene Risk Committee to review and mitigate elevated business risk exposure."
                .to_string(),
        );
    }

    if let Some(mape) = inputs.forecast_mape {
        if mape < 5.0 {
            commentary.push(format!(
                "Revenue forecast model achieves high accuracy with MAPE of {mape:.2}%; \
                 leadership can rely on forecast outputs with confidence."
            ));
        } else if mape < 10.0 {
            commentary.push(format!(
                "Revenue forecast MAPE of {mape:.2}% is acceptable; periodic model \
                 recalibration is advisable."
            ));
        } else {
            commentary.push(format!(
                "Forecast MAPE of {mape:.2}% indicates high uncertainty; model retraining with \
                 more recent data is strongly recommended."
            ));
        }
    }

    if let Some(delta) = inputs.projected_profit_delta {
        if delta > Decimal::ZERO {
            commentary.push(format!(
                "Strategic initiatives are projected to deliver ${} in incremental profit, a \
                 positive signal for shareholder value creation.",
                delta.round_dp(0)
            ));
        } else {
            commentary.push(format!(
                "Current strategic plan projects a profit shortfall of ${}; recalibration of \
                 investment allocation is advised.",
                delta.abs().round_dp(0)
            ));
        }
    }

    ExecutiveInsights {
        commentary,
        action_items,
        risk_level,
        churn_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs() -> InsightInputs {
        InsightInputs {
            revenue_trend: RevenueTrend::Up,
            churn_rate: 0.12,
            anomaly_count: 2,
            risk_score: 16.5,
            forecast_mape: Some(3.2),
            projected_profit_delta: Some(dec!(250000)),
        }
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(classify_risk(0.0), RiskLevel::Low);
        assert_eq!(classify_risk(19.9), RiskLevel::Low);
        assert_eq!(classify_risk(20.0), RiskLevel::Moderate);
        assert_eq!(classify_risk(39.9), RiskLevel::Moderate);
        assert_eq!(classify_risk(40.0), RiskLevel::High);
        assert_eq!(classify_risk(64.9), RiskLevel::High);
        assert_eq!(classify_risk(65.0), RiskLevel::Critical);
        assert_eq!(classify_risk(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_churn_bands() {
        assert_eq!(classify_churn(0.01), ChurnLevel::Healthy);
        assert_eq!(classify_churn(0.05), ChurnLevel::Elevated);
        assert_eq!(classify_churn(0.149), ChurnLevel::Elevated);
        assert_eq!(classify_churn(0.15), ChurnLevel::Critical);
    }

    #[test]
    fn test_healthy_report_has_no_alarm_actions() {
        let insights = generate_executive_insights(&inputs());
        assert_eq!(insights.risk_level, RiskLevel::Low);
        assert_eq!(insights.churn_level, ChurnLevel::Elevated);
        let summary = insights.executive_summary();
        assert!(summary.contains("12.0%"));
        assert!(summary.contains("incremental profit"));
        assert!(
            !insights
                .action_items
                .iter()
                .any(|a| a.contains("Risk Committee"))
        );
    }

    #[test]
    fn test_distressed_report_escalates() {
        let distressed = InsightInputs {
            revenue_trend: RevenueTrend::Down,
            churn_rate: 0.30,
            anomaly_count: 14,
            risk_score: 70.0,
            forecast_mape: Some(15.0),
            projected_profit_delta: Some(dec!(-55000)),
        };
        let insights = generate_executive_insights(&distressed);
        assert_eq!(insights.risk_level, RiskLevel::Critical);
        assert_eq!(insights.churn_level, ChurnLevel::Critical);
        assert!(insights.action_items.len() >= 4);
        let summary = insights.executive_summary();
        assert!(summary.contains("profit shortfall of $55000"));
        assert!(summary.contains("high uncertainty"));
    }

    #[test]
    fn test_optional_sections_are_optional() {
        let minimal = InsightInputs {
            forecast_mape: None,
            projected_profit_delta: None,
            ..inputs()
        };
        let insights = generate_executive_insights(&minimal);
        let summary = insights.executive_summary();
        assert!(!summary.contains("MAPE"));
        assert!(!summary.contains("incremental profit"));
    }
}
