//! FinCoach Core Library
//!
//! Analytics for the FinCoach personal finance tracker. Everything here runs
//! over a snapshot of one user's records and an explicit "now":
//! - Keyword categorization of transaction descriptions
//! - Spending forecasts and goal completion estimates
//! - Anomaly detection (unusual amounts, spikes, patterns, duplicates)
//! - Budget advice and financial health scores
//! - Risk assessment (emergency fund, expense ratio, goal feasibility)
//! - Coaching tips, weekly summaries and action plans
//! - Dashboard and trend reports
//! - Insight engine producing prioritized alerts
//! - CSV import, bank SMS parsing and input validation

pub mod advisor;
pub mod aggregate;
pub mod analysis;
pub mod anomaly;
pub mod categorize;
pub mod coach;
pub mod config;
pub mod context;
pub mod error;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod models;
pub mod reports;
pub mod risk;
pub mod sms;
pub mod stats;
pub mod validate;

/// Shared snapshot fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{Analysis, Status};
pub use anomaly::AnomalyDetector;
pub use categorize::{Categorization, CategoryTable};
pub use config::{Config, DetectionConfig, ForecastConfig};
pub use context::AnalysisContext;
pub use error::{Error, Result};
pub use forecast::ForecastEngine;
pub use insights::{AlertSeverity, Finding, InsightEngine};
pub use models::{
    Goal, GoalStatus, Jar, JarPriority, Snapshot, Transaction, TransactionKind, UserProfile,
};
pub use sms::{ParsedSms, SmsParser};
