//! Domain models for FinCoach

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate::{
    validate_amount, validate_budget, validate_deadline, validate_non_negative,
    validate_target_amount,
};

/// Whether a transaction adds to or draws from the user's money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income or expense.
///
/// Amounts are always non-negative; `kind` decides which side of the ledger
/// the record lands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub amount: f64,
    #[serde(rename = "type", alias = "kind")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "transaction_date", alias = "occurred_at")]
    pub occurred_at: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
        occurred_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            amount,
            kind,
            category: category.into(),
            description: None,
            occurred_at,
        }
    }

    pub fn expense(amount: f64, category: impl Into<String>, occurred_at: NaiveDateTime) -> Self {
        Self::new(amount, TransactionKind::Expense, category, occurred_at)
    }

    pub fn income(amount: f64, category: impl Into<String>, occurred_at: NaiveDateTime) -> Self {
        Self::new(amount, TransactionKind::Income, category, occurred_at)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// 22:00 through 05:59 local time
    pub fn is_late_night(&self) -> bool {
        let hour = self.occurred_at.hour();
        hour >= 22 || hour <= 5
    }
}

/// Income and budget figures the user entered on their profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub monthly_budget: f64,
}

/// Spending total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Total for one calendar month, keyed "YYYY-MM"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub total: f64,
}

/// Lifecycle of a goal.
///
/// `Completed` and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deadline-bound savings target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: NaiveDateTime,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Goal {
    pub fn new(title: impl Into<String>, target_amount: f64, deadline: NaiveDateTime) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: None,
            target_amount,
            current_amount: 0.0,
            deadline,
            status: GoalStatus::Active,
            category: None,
        }
    }

    /// A new goal from user input: positive target, deadline after `now`
    pub fn try_new(
        title: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let target_amount = validate_target_amount(target_amount)?;
        let deadline = validate_deadline(deadline, now)?;
        Ok(Self::new(title, target_amount, deadline))
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_current_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    pub fn remaining(&self) -> f64 {
        self.target_amount - self.current_amount
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Add progress to an active goal, completing it once the target is reached
    pub fn contribute(&mut self, amount: f64) -> Result<GoalStatus> {
        if self.status.is_terminal() {
            return Err(Error::InvalidState(format!(
                "Goal '{}' is {} and no longer accepts progress",
                self.title, self.status
            )));
        }
        let amount = validate_amount(amount)?;
        self.current_amount += amount;
        if self.is_reached() {
            self.status = GoalStatus::Completed;
        }
        Ok(self.status)
    }

    pub fn abandon(&mut self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::InvalidState(format!(
                "Goal '{}' is already {}",
                self.title, self.status
            )));
        }
        self.status = GoalStatus::Abandoned;
        Ok(())
    }

    pub fn progress(&self, now: NaiveDateTime) -> GoalProgress {
        GoalProgress {
            goal_id: self.id,
            title: self.title.clone(),
            current_amount: self.current_amount,
            target_amount: self.target_amount,
            remaining_amount: self.remaining(),
            progress_percentage: crate::stats::round2(crate::stats::percentage_of(
                self.current_amount,
                self.target_amount,
            )),
            days_remaining: (self.deadline - now).num_days(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: i64,
    pub title: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub remaining_amount: f64,
    pub progress_percentage: f64,
    pub days_remaining: i64,
    pub status: GoalStatus,
}

/// Priority of a savings jar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JarPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl JarPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for JarPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown jar priority: {}", s)),
        }
    }
}

pub const DEFAULT_JAR_COLOR: &str = "#3B82F6";

fn default_jar_color() -> String {
    DEFAULT_JAR_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

/// A named savings sub-balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jar {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub priority: JarPriority,
    /// Resolved to [`DEFAULT_JAR_COLOR`] when the input omits it
    #[serde(default = "default_jar_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Jar {
    pub fn new(name: impl Into<String>, target_amount: f64, color: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            target_amount,
            current_amount: 0.0,
            priority: JarPriority::default(),
            color: color.unwrap_or_else(default_jar_color),
            is_active: true,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// A new jar from user input: positive target
    pub fn try_new(name: impl Into<String>, target_amount: f64, color: Option<String>) -> Result<Self> {
        let target_amount = validate_target_amount(target_amount)?;
        Ok(Self::new(name, target_amount, color))
    }

    pub fn with_balance(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    pub fn with_priority(mut self, priority: JarPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Deposit into the jar, returning the new balance
    pub fn add_funds(&mut self, amount: f64) -> Result<f64> {
        let amount = validate_amount(amount)?;
        self.current_amount += amount;
        Ok(self.current_amount)
    }

    pub fn progress(&self) -> JarProgress {
        JarProgress {
            jar_id: self.id,
            name: self.name.clone(),
            current_amount: self.current_amount,
            target_amount: self.target_amount,
            remaining_amount: self.target_amount - self.current_amount,
            progress_percentage: crate::stats::round2(crate::stats::percentage_of(
                self.current_amount,
                self.target_amount,
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JarProgress {
    pub jar_id: i64,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub remaining_amount: f64,
    pub progress_percentage: f64,
}

/// Everything the caller fetched for one user, as loaded from a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub jars: Vec<Jar>,
}

impl Snapshot {
    /// Parse and validate a snapshot
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Amounts, targets, balances and the budget must all be non-negative
    pub fn validate(&self) -> Result<()> {
        if let Some(profile) = &self.profile {
            validate_non_negative(profile.monthly_income, "Monthly income")?;
            validate_budget(profile.monthly_budget)?;
        }
        for tx in &self.transactions {
            validate_non_negative(tx.amount, &format!("Transaction {} amount", tx.id))?;
        }
        for goal in &self.goals {
            validate_non_negative(goal.target_amount, &format!("Goal '{}' target amount", goal.title))?;
            validate_non_negative(goal.current_amount, &format!("Goal '{}' current amount", goal.title))?;
        }
        for jar in &self.jars {
            validate_non_negative(jar.target_amount, &format!("Jar '{}' target amount", jar.name))?;
            validate_non_negative(jar.current_amount, &format!("Jar '{}' balance", jar.name))?;
        }
        Ok(())
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn goal_mut(&mut self, id: i64) -> Result<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    pub fn jar_mut(&mut self, id: i64) -> Result<&mut Jar> {
        self.jars
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| Error::NotFound(format!("Jar {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_transaction_kind_parsing() {
        assert_eq!(
            "Expense".parse::<TransactionKind>().unwrap(),
            TransactionKind::Expense
        );
        assert_eq!(
            "credit".parse::<TransactionKind>().unwrap(),
            TransactionKind::Income
        );
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_late_night_window() {
        assert!(Transaction::expense(10.0, "food", at(2024, 3, 1, 22)).is_late_night());
        assert!(Transaction::expense(10.0, "food", at(2024, 3, 1, 5)).is_late_night());
        assert!(!Transaction::expense(10.0, "food", at(2024, 3, 1, 6)).is_late_night());
        assert!(!Transaction::expense(10.0, "food", at(2024, 3, 1, 21)).is_late_night());
    }

    #[test]
    fn test_goal_completes_when_target_reached() {
        let mut goal = Goal::new("Laptop", 1000.0, at(2025, 1, 1, 0));
        assert_eq!(goal.contribute(400.0).unwrap(), GoalStatus::Active);
        assert_eq!(goal.contribute(600.0).unwrap(), GoalStatus::Completed);
        assert!(goal.contribute(10.0).is_err());
    }

    #[test]
    fn test_contributions_must_be_positive() {
        let mut goal = Goal::new("Laptop", 1000.0, at(2025, 1, 1, 0));
        assert!(matches!(goal.contribute(-100.0), Err(Error::InvalidInput(_))));
        assert!(goal.contribute(0.0).is_err());
        assert_eq!(goal.current_amount, 0.0);

        let mut jar = Jar::new("Travel", 500.0, None);
        assert!(matches!(jar.add_funds(-20.0), Err(Error::InvalidInput(_))));
        assert_eq!(jar.current_amount, 0.0);
    }

    #[test]
    fn test_try_new_checks_user_input() {
        let now = at(2024, 6, 20, 12);
        assert!(Goal::try_new("Car", 8000.0, at(2025, 6, 1, 0), now).is_ok());
        assert!(Goal::try_new("Car", -10.0, at(2025, 6, 1, 0), now).is_err());
        assert!(Goal::try_new("Car", 8000.0, at(2024, 6, 1, 0), now).is_err());

        assert!(Jar::try_new("Gifts", 200.0, None).is_ok());
        assert!(Jar::try_new("Gifts", -50.0, None).is_err());
    }

    #[test]
    fn test_snapshot_rejects_negative_targets() {
        let json = r#"{
            "goals": [{"title": "Bike", "target_amount": -10.0, "deadline": "2025-01-01T00:00:00"}],
            "jars": [{"name": "Travel", "target_amount": 100.0}]
        }"#;
        match Snapshot::from_reader(json.as_bytes()) {
            Err(Error::InvalidInput(msg)) => {
                assert_eq!(msg, "Goal 'Bike' target amount cannot be negative")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let json = r#"{"jars": [{"name": "Travel", "target_amount": -50.0}]}"#;
        assert!(Snapshot::from_reader(json.as_bytes()).is_err());

        let json = r#"{"profile": {"monthly_income": 4000.0, "monthly_budget": -1.0}}"#;
        assert!(Snapshot::from_reader(json.as_bytes()).is_err());

        let json = r#"{"jars": [{"name": "Travel", "target_amount": 50.0, "current_amount": 20.0}]}"#;
        assert_eq!(Snapshot::from_reader(json.as_bytes()).unwrap().jars.len(), 1);
    }

    #[test]
    fn test_abandoned_goal_does_not_revert() {
        let mut goal = Goal::new("Trip", 500.0, at(2025, 1, 1, 0));
        goal.abandon().unwrap();
        assert_eq!(goal.status, GoalStatus::Abandoned);
        assert!(goal.abandon().is_err());
        assert!(goal.contribute(500.0).is_err());
        assert_eq!(goal.status, GoalStatus::Abandoned);
    }

    #[test]
    fn test_goal_progress() {
        let goal = Goal::new("Bike", 800.0, at(2024, 4, 1, 0)).with_current_amount(200.0);
        let progress = goal.progress(at(2024, 3, 1, 0));
        assert_eq!(progress.progress_percentage, 25.0);
        assert_eq!(progress.remaining_amount, 600.0);
        assert_eq!(progress.days_remaining, 31);
    }

    #[test]
    fn test_jar_color_default_resolved_on_deserialize() {
        let jar: Jar =
            serde_json::from_str(r#"{"name": "Travel", "target_amount": 1000.0}"#).unwrap();
        assert_eq!(jar.color, DEFAULT_JAR_COLOR);
        assert_eq!(jar.priority, JarPriority::Medium);
        assert!(jar.is_active);

        let jar = Jar::new("Gifts", 200.0, Some("#FF0000".to_string()));
        assert_eq!(jar.color, "#FF0000");
    }

    #[test]
    fn test_jar_progress_zero_target() {
        let mut jar = Jar::new("Misc", 0.0, None);
        assert_eq!(jar.add_funds(50.0).unwrap(), 50.0);
        assert_eq!(jar.progress().progress_percentage, 0.0);
        assert_eq!(jar.current_amount, 50.0);
    }

    #[test]
    fn test_transaction_json_shape() {
        let json = r#"{
            "id": 7,
            "amount": 42.5,
            "type": "expense",
            "category": "food",
            "transaction_date": "2024-03-01T12:30:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 7);
        assert!(tx.is_expense());
        assert_eq!(tx.occurred_at, at(2024, 3, 1, 12) + chrono::Duration::minutes(30));
    }
}
