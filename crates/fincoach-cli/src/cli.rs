//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FinCoach - Understand where your money goes
#[derive(Parser)]
#[command(name = "fincoach")]
#[command(about = "Personal finance analytics over a local snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot file (profile, transactions, goals, jars as JSON)
    #[arg(long, default_value = "fincoach.json", global = true)]
    pub data: PathBuf,

    /// Threshold config (defaults to the data-dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Category keyword table (TOML)
    #[arg(long, global = true)]
    pub categories: Option<PathBuf>,

    /// Evaluate as of this instant (YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD)
    ///
    /// Defaults to the local clock. Fixing it makes output reproducible.
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize a transaction description
    Categorize {
        /// Description text, e.g. "Uber ride to airport"
        #[arg(required_unless_present = "batch")]
        description: Option<String>,

        /// JSON file of [{"transaction_id": 1, "description": "..."}]
        #[arg(long, conflicts_with = "description")]
        batch: Option<PathBuf>,
    },

    /// Show the top category candidates for a description
    Suggest {
        description: String,
    },

    /// Import transactions from CSV into the snapshot
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Leave blank categories as "other"
        #[arg(long)]
        no_categorize: bool,
    },

    /// Parse a bank SMS alert into a transaction
    ParseSms {
        /// Full SMS text
        text: String,

        /// Append the parsed transaction to the snapshot
        #[arg(long)]
        save: bool,
    },

    /// Spending, income and goal forecasts
    Forecast {
        #[command(subcommand)]
        kind: ForecastKind,
    },

    /// Anomaly detection
    Anomaly {
        #[command(subcommand)]
        action: AnomalyAction,
    },

    /// Budget advice and health scores
    Advise {
        #[command(subcommand)]
        action: AdviseAction,
    },

    /// Risk assessments
    Risk {
        #[command(subcommand)]
        action: RiskAction,
    },

    /// Coaching tips, summaries and plans
    Coach {
        #[command(subcommand)]
        action: CoachAction,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Run every insight analyzer and list alerts, most severe first
    Insights,
}

#[derive(Subcommand)]
pub enum ForecastKind {
    /// Next month's total spending (exponential smoothing)
    NextMonth,

    /// Monthly expenses for the coming months
    Monthly {
        /// Number of months to project
        #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=120))]
        months: u32,
    },

    /// Monthly spending for one category
    Category {
        category: String,
    },

    /// Income trend over the last three months
    Income,

    /// Savings if expenses dropped by 10%
    Savings,

    /// When a goal will be reached at the current savings rate
    Goal {
        /// Goal ID
        id: i64,
    },

    /// Next month's spending per category
    ByCategory,
}

#[derive(Subcommand)]
pub enum AnomalyAction {
    /// Is an amount unusual for its category?
    Unusual {
        amount: f64,
        category: String,
    },

    /// This month against the recent baseline
    Spike,

    /// Small, late-night and weekend spending habits
    Patterns,

    /// Check a new transaction against recent ones
    Duplicate {
        amount: f64,
        category: String,

        /// Description (accepted, not used for matching)
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdviseAction {
    /// Category breakdown of the last 30 days
    Spending,

    /// Budget recommendations
    Budget,

    /// 50/30/20 allocation of monthly income
    Allocation,

    /// Habit-based health score
    Health,

    /// Metric-based health score
    AnalyticsHealth,
}

#[derive(Subcommand)]
pub enum RiskAction {
    /// Emergency fund coverage
    EmergencyFund,

    /// Expense-to-income ratio
    Debt,

    /// Can a goal be reached by its deadline?
    Goal {
        /// Goal ID
        id: i64,
    },

    /// Month-to-month spending variation
    Volatility,
}

#[derive(Subcommand)]
pub enum CoachAction {
    /// Today's tips
    Tips,

    /// Last seven days in review
    Weekly,

    /// Prioritized action plan
    Plan,

    /// Encouragement based on progress
    Motivation,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Current month at a glance
    Dashboard,

    /// Monthly spending over recent calendar months
    Trends {
        /// Number of months, including the current one
        #[arg(short, long, default_value = "6", value_parser = clap::value_parser!(u32).range(1..=120))]
        months: u32,
    },

    /// Current month by category
    Categories,
}
