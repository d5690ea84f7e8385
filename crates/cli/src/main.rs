//! Command Line Interface for the Stratlab decision engine.

mod insights;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use insights::{InsightInputs, RevenueTrend, generate_executive_insights};
use prettytable::{Table, row};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use stratlab_data::{
    generate_cost_records, generate_customer_records, generate_revenue_series, observed_churn_rate,
};
use stratlab_domain::ModelParams;
use stratlab_domain::value_objects::{
    FinancialBaseline, OptimizationConstraints, StrategyDecision,
};
use stratlab_models::{LinearTrendModel, LogisticChurnModel, RevenueForecaster, ZScoreDetector};
use stratlab_optimization::ProfitOptimizer;
use stratlab_simulation::simulate_strategy;
use tracing::info;

#[derive(Parser)]
#[command(name = "stratlab")]
#[command(about = "Business strategy simulator and profit optimizer", long_about = None)]
struct Cli {
    /// Seed for the synthetic data generators
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast monthly revenue from synthetic history
    Forecast {
        /// Months of history to generate
        #[arg(long, default_value_t = 36)]
        periods: usize,

        /// Months to forecast ahead
        #[arg(long, default_value_t = 6)]
        horizon: usize,
    },
    /// Train and evaluate the churn classifier
    Churn {
        /// Number of synthetic customer records
        #[arg(long, default_value_t = 2000)]
        customers: usize,
    },
    /// Detect anomalous cost days
    Anomalies {
        /// Days of cost history to generate
        #[arg(long, default_value_t = 180)]
        days: usize,

        /// Expected fraction of anomalous days
        #[arg(long, default_value_t = 0.08)]
        contamination: f64,
    },
    /// Simulate the financial impact of a strategy decision
    Simulate {
        /// Base annual revenue (USD)
        #[arg(long, default_value = "10000000")]
        revenue: Decimal,

        /// Base annual cost (USD)
        #[arg(long, default_value = "7000000")]
        cost: Decimal,

        /// Current customer churn rate (0-1)
        #[arg(long, default_value = "0.15")]
        churn_rate: Decimal,

        /// Marketing spend increase (%)
        #[arg(long, default_value = "10")]
        marketing: Decimal,

        /// Price change (%)
        #[arg(long, default_value = "5", allow_hyphen_values = true)]
        price: Decimal,

        /// New hires
        #[arg(long, default_value_t = 5)]
        hires: u32,

        /// Retention investment (USD)
        #[arg(long, default_value = "100000")]
        retention: Decimal,
    },
    /// Find the profit-maximizing decision within budget and risk limits
    Optimize {
        /// Base annual revenue (USD)
        #[arg(long, default_value = "10000000")]
        revenue: Decimal,

        /// Base annual cost (USD)
        #[arg(long, default_value = "7000000")]
        cost: Decimal,

        /// Maximum additional spend (USD)
        #[arg(long, default_value = "1000000")]
        budget: Decimal,

        /// Maximum acceptable risk score (0-100)
        #[arg(long, default_value = "50")]
        risk: Decimal,
    },
    /// Executive summary across all pipelines
    Summary {
        /// Base annual revenue (USD)
        #[arg(long, default_value = "10000000")]
        revenue: Decimal,

        /// Base annual cost (USD)
        #[arg(long, default_value = "7000000")]
        cost: Decimal,

        /// Marketing spend increase under evaluation (%)
        #[arg(long, default_value = "10")]
        marketing: Decimal,

        /// Price change under evaluation (%)
        #[arg(long, default_value = "5", allow_hyphen_values = true)]
        price: Decimal,

        /// New hires under evaluation
        #[arg(long, default_value_t = 5)]
        hires: u32,

        /// Retention investment under evaluation (USD)
        #[arg(long, default_value = "100000")]
        retention: Decimal,
    },
}

/// Anchor date of the synthetic monthly history.
fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date")
}

/// Anchor date of the synthetic daily cost history.
fn costs_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Forecast { periods, horizon } => {
            run_forecast(cli.seed, cli.json, *periods, *horizon)
        }
        Commands::Churn { customers } => run_churn(cli.seed, cli.json, *customers),
        Commands::Anomalies {
            days,
            contamination,
        } => run_anomalies(cli.seed, cli.json, *days, *contamination),
        Commands::Simulate {
            revenue,
            cost,
            churn_rate,
            marketing,
            price,
            hires,
            retention,
        } => run_simulate(
            cli.json,
            FinancialBaseline::new(*revenue, *cost),
            StrategyDecision::default()
                .with_marketing_increase(*marketing)
                .with_price_change(*price)
                .with_hiring(*hires)
                .with_retention_investment(*retention),
            *churn_rate,
        ),
        Commands::Optimize {
            revenue,
            cost,
            budget,
            risk,
        } => run_optimize(
            cli.json,
            FinancialBaseline::new(*revenue, *cost),
            OptimizationConstraints::new(*budget, *risk),
        ),
        Commands::Summary {
            revenue,
            cost,
            marketing,
            price,
            hires,
            retention,
        } => run_summary(
            cli.seed,
            cli.json,
            FinancialBaseline::new(*revenue, *cost),
            StrategyDecision::default()
                .with_marketing_increase(*marketing)
                .with_price_change(*price)
                .with_hiring(*hires)
                .with_retention_investment(*retention),
        ),
    }
}

fn run_forecast(seed: u64, json: bool, periods: usize, horizon: usize) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let series = generate_revenue_series(history_start(), periods, &mut rng);
    let model = LinearTrendModel::fit(&series)?;
    let metrics = model.metrics();
    let forecast = model.predict(horizon);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "metrics": metrics,
                "forecast": forecast,
            }))?
        );
        return Ok(());
    }

    println!("📈 Revenue Forecast ({periods} months of history)");
    let mut table = Table::new();
    table.add_row(row!["Month", "Projected Revenue"]);
    for point in &forecast {
        table.add_row(row![point.date, format!("${}", point.revenue)]);
    }
    table.printstd();
    println!("In-sample MAPE:   {:.2}%", metrics.mape);
    println!("Last actual:      ${}", metrics.last_actual_revenue);
    println!("Next month:       ${}", metrics.next_period_forecast);
    Ok(())
}

fn run_churn(seed: u64, json: bool, customers: usize) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = generate_customer_records(customers, &mut rng);
    let model = LogisticChurnModel::fit(&records, &mut rng)?;
    let metrics = model.metrics();
    let churn_rate = observed_churn_rate(&records);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "observed_churn_rate": churn_rate,
                "metrics": metrics,
            }))?
        );
        return Ok(());
    }

    println!("👥 Churn Prediction ({customers} customers)");
    let mut table = Table::new();
    table.add_row(row!["Metric", "Value"]);
    table.add_row(row!["Observed churn rate", format!("{:.1}%", churn_rate * 100.0)]);
    table.add_row(row!["ROC-AUC", format!("{:.4}", metrics.roc_auc)]);
    table.add_row(row!["Precision", format!("{:.4}", metrics.precision)]);
    table.add_row(row!["Recall", format!("{:.4}", metrics.recall)]);
    table.add_row(row!["F1", format!("{:.4}", metrics.f1)]);
    table.printstd();

    let mut confusion = Table::new();
    confusion.add_row(row!["", "Predicted retained", "Predicted churned"]);
    confusion.add_row(row![
        "Actual retained",
        metrics.confusion[0][0],
        metrics.confusion[0][1]
    ]);
    confusion.add_row(row![
        "Actual churned",
        metrics.confusion[1][0],
        metrics.confusion[1][1]
    ]);
    confusion.printstd();
    Ok(())
}

fn run_anomalies(seed: u64, json: bool, days: usize, contamination: f64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = generate_cost_records(costs_start(), days, &mut rng);
    let detector = ZScoreDetector::new(contamination)?;
    let scored = detector.detect(&records)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
        return Ok(());
    }

    let flagged: Vec<_> = records
        .iter()
        .zip(scored.iter())
        .filter(|(_, s)| s.is_anomaly)
        .collect();

    println!("🔎 Cost Anomalies ({} of {days} days flagged)", flagged.len());
    let mut table = Table::new();
    table.add_row(row!["Date", "Operational", "Marketing", "Total", "Score"]);
    for (record, score) in flagged {
        table.add_row(row![
            record.date,
            format!("${}", record.operational_cost),
            format!("${}", record.marketing_cost),
            format!("${}", record.total_cost),
            format!("{:.2}", score.score)
        ]);
    }
    table.printstd();
    Ok(())
}

fn run_simulate(
    json: bool,
    baseline: FinancialBaseline,
    decision: StrategyDecision,
    churn_rate: Decimal,
) -> Result<()> {
    let projection = simulate_strategy(&baseline, &decision, churn_rate, &ModelParams::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!("🧩 Strategy Simulation");
    let mut table = Table::new();
    table.add_row(row!["", "Baseline", "Projected", "Delta"]);
    table.add_row(row![
        "Revenue",
        format!("${}", projection.base_revenue),
        format!("${}", projection.projected_revenue),
        format!("${}", projection.revenue_delta)
    ]);
    table.add_row(row![
        "Cost",
        format!("${}", projection.base_cost),
        format!("${}", projection.projected_cost),
        format!("${}", projection.cost_delta)
    ]);
    table.add_row(row![
        "Profit",
        format!("${}", projection.base_profit),
        format!("${}", projection.projected_profit),
        format!("${}", projection.profit_delta)
    ]);
    table.printstd();
    println!("ROI on incremental spend: {}%", projection.roi_pct);
    println!("Risk score:               {}/100", projection.risk_score);
    Ok(())
}

fn run_optimize(
    json: bool,
    baseline: FinancialBaseline,
    constraints: OptimizationConstraints,
) -> Result<()> {
    info!("running profit optimization");
    let result = ProfitOptimizer::default().optimize(&baseline, &constraints)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("💰 Profit Optimization");
    if !result.optimizer_success {
        println!(
            "⚠️  Solver did not converge ({}); showing best-effort fallback.",
            result.optimizer_message
        );
    }
    let mut table = Table::new();
    table.add_row(row!["Lever", "Optimized value"]);
    table.add_row(row![
        "Marketing increase",
        format!("{}%", result.marketing_increase_pct)
    ]);
    table.add_row(row!["Price change", format!("{}%", result.price_change_pct)]);
    table.add_row(row!["New hires", result.hiring_count]);
    table.printstd();
    println!(
        "Projected profit: ${} (baseline ${})",
        result.projection.projected_profit, result.projection.base_profit
    );
    println!("Risk score:       {}/100", result.projection.risk_score);
    Ok(())
}

fn run_summary(
    seed: u64,
    json: bool,
    baseline: FinancialBaseline,
    decision: StrategyDecision,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);

    let series = generate_revenue_series(history_start(), 36, &mut rng);
    let forecaster = LinearTrendModel::fit(&series)?;
    let forecast_metrics = forecaster.metrics();
    let trend = revenue_trend(&forecast_metrics.last_actual_revenue, &forecast_metrics.next_period_forecast);

    let customers = generate_customer_records(2000, &mut rng);
    let churn_model = LogisticChurnModel::fit(&customers, &mut rng)?;
    let churn_rate = observed_churn_rate(&customers);

    let costs = generate_cost_records(costs_start(), 180, &mut rng);
    let scored = ZScoreDetector::default().detect(&costs)?;
    let anomaly_count = scored.iter().filter(|s| s.is_anomaly).count();

    let churn_rate_decimal = Decimal::from_f64(churn_rate).unwrap_or_default().round_dp(4);
    let projection =
        simulate_strategy(&baseline, &decision, churn_rate_decimal, &ModelParams::default())?;

    let insights = generate_executive_insights(&InsightInputs {
        revenue_trend: trend,
        churn_rate,
        anomaly_count,
        risk_score: projection.risk_score.to_f64().unwrap_or(0.0),
        forecast_mape: Some(forecast_metrics.mape),
        projected_profit_delta: Some(projection.profit_delta),
    });

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "forecast": forecast_metrics,
                "churn_model": churn_model.metrics(),
                "observed_churn_rate": churn_rate,
                "anomaly_count": anomaly_count,
                "projection": projection,
                "insights": insights,
            }))?
        );
        return Ok(());
    }

    println!("🧠 Executive Summary");
    let mut table = Table::new();
    table.add_row(row!["KPI", "Value"]);
    table.add_row(row![
        "Next month revenue",
        format!("${}", forecast_metrics.next_period_forecast)
    ]);
    table.add_row(row!["Forecast MAPE", format!("{:.2}%", forecast_metrics.mape)]);
    table.add_row(row!["Churn rate", format!("{:.1}%", churn_rate * 100.0)]);
    table.add_row(row![
        "Churn model ROC-AUC",
        format!("{:.4}", churn_model.metrics().roc_auc)
    ]);
    table.add_row(row!["Cost anomalies", anomaly_count]);
    table.add_row(row![
        "Strategy profit delta",
        format!("${}", projection.profit_delta)
    ]);
    table.add_row(row![
        "Strategy risk",
        format!("{}/100 ({})", projection.risk_score, insights.risk_level)
    ]);
    table.printstd();

    println!("\n{}\n", insights.executive_summary());
    if !insights.action_items.is_empty() {
        println!("Action items:");
        for item in &insights.action_items {
            println!("  • {item}");
        }
    }
    Ok(())
}

/// Classifies the forecast direction, with a ±2% dead band around flat.
fn revenue_trend(last_actual: &Decimal, next_forecast: &Decimal) -> RevenueTrend {
    let threshold = last_actual.abs() * Decimal::new(2, 2);
    if *next_forecast > *last_actual + threshold {
        RevenueTrend::Up
    } else if *next_forecast < *last_actual - threshold {
        RevenueTrend::Down
    } else {
        RevenueTrend::Stable
    }
}
