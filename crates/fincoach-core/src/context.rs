//! Analysis context
//!
//! Bundles the records a caller already fetched for one user with the instant
//! the analysis is evaluated at. Lookback windows ("last 90 days", "current
//! month") are always measured from [`AnalysisContext::now`], never from the
//! wall clock.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::{Goal, Jar, Snapshot, Transaction, TransactionKind, UserProfile};

#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub transactions: &'a [Transaction],
    pub goals: &'a [Goal],
    pub jars: &'a [Jar],
    /// `None` is the missing-user case
    pub profile: Option<&'a UserProfile>,
    pub now: NaiveDateTime,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(transactions: &'a [Transaction], now: NaiveDateTime) -> Self {
        Self {
            transactions,
            goals: &[],
            jars: &[],
            profile: None,
            now,
        }
    }

    pub fn from_snapshot(snapshot: &'a Snapshot, now: NaiveDateTime) -> Self {
        Self {
            transactions: &snapshot.transactions,
            goals: &snapshot.goals,
            jars: &snapshot.jars,
            profile: snapshot.profile.as_ref(),
            now,
        }
    }

    pub fn with_goals(mut self, goals: &'a [Goal]) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_jars(mut self, jars: &'a [Jar]) -> Self {
        self.jars = jars;
        self
    }

    pub fn with_profile(mut self, profile: &'a UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Records of `kind` dated at or after `now - days`
    pub fn recent(&self, kind: TransactionKind, days: i64) -> Vec<&'a Transaction> {
        let since = self.now - Duration::days(days);
        self.transactions
            .iter()
            .filter(|t| t.kind == kind && t.occurred_at >= since)
            .collect()
    }

    pub fn recent_expenses(&self, days: i64) -> Vec<&'a Transaction> {
        self.recent(TransactionKind::Expense, days)
    }

    pub fn expenses(&self) -> Vec<&'a Transaction> {
        self.transactions.iter().filter(|t| t.is_expense()).collect()
    }

    /// Midnight on the first day of `now`'s month
    pub fn month_start(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.now.year(), self.now.month(), 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(self.now)
    }

    /// Records of either kind dated on or after [`Self::month_start`]
    pub fn current_month(&self) -> Vec<&'a Transaction> {
        let start = self.month_start();
        self.transactions
            .iter()
            .filter(|t| t.occurred_at >= start)
            .collect()
    }

    pub fn active_goals(&self) -> impl Iterator<Item = &'a Goal> {
        self.goals.iter().filter(|g| g.is_active())
    }

    pub fn active_jars(&self) -> impl Iterator<Item = &'a Jar> {
        self.jars.iter().filter(|j| j.is_active)
    }

    /// Sum of every jar balance, active or not
    pub fn total_saved(&self) -> f64 {
        self.jars.iter().map(|j| j.current_amount).sum()
    }

    pub fn goal(&self, id: i64) -> Option<&'a Goal> {
        self.goals.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, day};

    #[test]
    fn test_recent_window_is_inclusive() {
        let now = at(2024, 6, 30, 12);
        let txs = vec![
            Transaction::expense(10.0, "food", now - Duration::days(30)),
            Transaction::expense(20.0, "food", now - Duration::days(31)),
            Transaction::income(500.0, "salary", now - Duration::days(1)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        assert_eq!(ctx.recent_expenses(30).len(), 1);
        assert_eq!(ctx.recent(TransactionKind::Income, 30).len(), 1);
    }

    #[test]
    fn test_month_start() {
        let ctx = AnalysisContext::new(&[], at(2024, 2, 17, 9));
        assert_eq!(ctx.month_start(), day(2024, 2, 1));
    }
}
