//! FinCoach CLI - Personal finance analytics
//!
//! Usage:
//!   fincoach import --file bank.csv       Import transactions into the snapshot
//!   fincoach report dashboard             Current month at a glance
//!   fincoach anomaly spike                Compare this month to the baseline
//!   fincoach insights                     All alerts, most severe first

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let now = commands::resolve_now(cli.now.as_deref())?;

    match cli.command {
        Commands::Categorize { description, batch } => match (description, batch) {
            (_, Some(batch)) => {
                commands::cmd_categorize_batch(cli.categories.as_deref(), &batch, cli.json)
            }
            (Some(description), None) => {
                commands::cmd_categorize(cli.categories.as_deref(), &description, cli.json)
            }
            (None, None) => anyhow::bail!("Provide a description or --batch"),
        },
        Commands::Suggest { description } => {
            commands::cmd_suggest(cli.categories.as_deref(), &description, cli.json)
        }
        Commands::Import {
            file,
            no_categorize,
        } => commands::cmd_import(
            &cli.data,
            &file,
            cli.categories.as_deref(),
            no_categorize,
            now,
        ),
        Commands::ParseSms { text, save } => {
            commands::cmd_parse_sms(&cli.data, &text, now, save, cli.json)
        }
        Commands::Forecast { kind } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match kind {
                ForecastKind::NextMonth => commands::cmd_forecast_next_month(session),
                ForecastKind::Monthly { months } => {
                    commands::cmd_forecast_monthly(session, months)
                }
                ForecastKind::Category { category } => {
                    commands::cmd_forecast_category(session, &category)
                }
                ForecastKind::Income => commands::cmd_forecast_income(session),
                ForecastKind::Savings => commands::cmd_forecast_savings(session),
                ForecastKind::Goal { id } => commands::cmd_forecast_goal(session, id),
                ForecastKind::ByCategory => commands::cmd_forecast_by_category(session),
            }
        }
        Commands::Anomaly { action } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match action {
                AnomalyAction::Unusual { amount, category } => {
                    commands::cmd_anomaly_unusual(session, amount, &category)
                }
                AnomalyAction::Spike => commands::cmd_anomaly_spike(session),
                AnomalyAction::Patterns => commands::cmd_anomaly_patterns(session),
                AnomalyAction::Duplicate {
                    amount,
                    category,
                    description,
                } => commands::cmd_anomaly_duplicate(
                    session,
                    amount,
                    &category,
                    description.as_deref(),
                ),
            }
        }
        Commands::Advise { action } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match action {
                AdviseAction::Spending => commands::cmd_advise_spending(session),
                AdviseAction::Budget => commands::cmd_advise_budget(session),
                AdviseAction::Allocation => commands::cmd_advise_allocation(session),
                AdviseAction::Health => commands::cmd_advise_health(session),
                AdviseAction::AnalyticsHealth => commands::cmd_advise_analytics_health(session),
            }
        }
        Commands::Risk { action } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match action {
                RiskAction::EmergencyFund => commands::cmd_risk_emergency_fund(session),
                RiskAction::Debt => commands::cmd_risk_debt(session),
                RiskAction::Goal { id } => commands::cmd_risk_goal(session, id),
                RiskAction::Volatility => commands::cmd_risk_volatility(session),
            }
        }
        Commands::Coach { action } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match action {
                CoachAction::Tips => commands::cmd_coach_tips(session),
                CoachAction::Weekly => commands::cmd_coach_weekly(session),
                CoachAction::Plan => commands::cmd_coach_plan(session),
                CoachAction::Motivation => commands::cmd_coach_motivation(session),
            }
        }
        Commands::Report { report_type } => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            let session = &session;
            match report_type {
                ReportType::Dashboard => commands::cmd_report_dashboard(session),
                ReportType::Trends { months } => commands::cmd_report_trends(session, months),
                ReportType::Categories => commands::cmd_report_categories(session),
            }
        }
        Commands::Insights => {
            let session = Session::open(&cli.data, cli.config.as_deref(), now, cli.json)?;
            commands::cmd_insights(&session)
        }
    }
}
