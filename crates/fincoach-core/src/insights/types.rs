//! Core types for the insight engine

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// This month's spending against the recent baseline
    SpendingSpike,
    /// Small-purchase, late-night and weekend habits
    SpendingPattern,
    /// Savings coverage of monthly expenses
    EmergencyFund,
    /// Recent expenses against profile income
    DebtToIncome,
    /// Active goals that cannot be met at the current savings rate
    GoalDeadline,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingSpike => "spending_spike",
            InsightType::SpendingPattern => "spending_pattern",
            InsightType::EmergencyFund => "emergency_fund",
            InsightType::DebtToIncome => "debt_to_income",
            InsightType::GoalDeadline => "goal_deadline",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_spike" => Ok(InsightType::SpendingSpike),
            "spending_pattern" => Ok(InsightType::SpendingPattern),
            "emergency_fund" => Ok(InsightType::EmergencyFund),
            "debt_to_income" => Ok(InsightType::DebtToIncome),
            "goal_deadline" => Ok(InsightType::GoalDeadline),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Severity of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Informational - no action needed
    Info,
    /// Should be addressed soon
    Warning,
    /// Something can no longer go to plan (e.g. a deadline already passed)
    Error,
    /// Requires immediate attention
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Error => "error",
            AlertSeverity::Critical => "critical",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            AlertSeverity::Info => 1,
            AlertSeverity::Warning => 2,
            AlertSeverity::Error => 3,
            AlertSeverity::Critical => 4,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(AlertSeverity::Info),
            "warning" => Ok(AlertSeverity::Warning),
            "error" => Ok(AlertSeverity::Error),
            "critical" => Ok(AlertSeverity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A finding produced by an insight analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Type of insight that generated this finding
    pub insight_type: InsightType,
    /// Unique key for deduplication (e.g., "goal:12")
    pub key: String,
    pub severity: AlertSeverity,
    /// Short title (e.g., "Spending spike")
    pub title: String,
    /// One-line message shown to the user
    pub message: String,
    /// Optional follow-up advice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Insight-specific structured data
    pub data: serde_json::Value,
    /// The analysis instant, not the wall clock
    pub detected_at: NaiveDateTime,
}

impl Finding {
    pub fn new(
        insight_type: InsightType,
        key: impl Into<String>,
        severity: AlertSeverity,
        title: impl Into<String>,
        message: impl Into<String>,
        detected_at: NaiveDateTime,
    ) -> Self {
        Self {
            insight_type,
            key: key.into(),
            severity,
            title: title.into(),
            message: message.into(),
            recommendation: None,
            data: serde_json::Value::Null,
            detected_at,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Add structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
