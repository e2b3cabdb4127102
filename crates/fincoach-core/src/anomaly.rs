//! Anomaly detection
//!
//! Detects:
//! - Unusual amounts: a candidate far from the category's recent mean (z-score)
//! - Spending spikes: this month against the previous three months' average
//! - Behavioural patterns: many small, late-night or weekend purchases
//! - Duplicates: same amount and category inside a short window

use chrono::{Datelike, Duration};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::Analysis;
use crate::config::DetectionConfig;
use crate::context::AnalysisContext;
use crate::stats::{mean, percentage_of, round2, stddev, z_score};

/// Days counted as one month when turning a lookback window into months
const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnomalySeverity {
    /// Band for an absolute z-score
    pub fn from_z_score(z: f64) -> Self {
        let z = z.abs();
        if z > 3.0 {
            Self::Critical
        } else if z > 2.0 {
            Self::High
        } else if z > 1.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnusualAmount {
    pub is_anomaly: bool,
    pub transaction_amount: f64,
    pub category_average: f64,
    pub category_std_dev: f64,
    pub z_score: f64,
    pub severity: AnomalySeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSpike {
    pub is_spike: bool,
    pub current_month_spending: f64,
    pub historical_average: f64,
    pub percentage_increase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    FrequentSmallTransactions,
    LateNightSpending,
    WeekendHeavySpending,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrequentSmallTransactions => "frequent_small_transactions",
            Self::LateNightSpending => "late_night_spending",
            Self::WeekendHeavySpending => "weekend_heavy_spending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPattern {
    pub pattern: PatternKind,
    pub description: String,
    pub severity: AnomalySeverity,
    pub recommendation: String,
}

impl SpendingPattern {
    fn new(pattern: PatternKind) -> Self {
        let (description, severity, recommendation) = match pattern {
            PatternKind::FrequentSmallTransactions => (
                "Many small transactions detected",
                AnomalySeverity::Medium,
                "Consider consolidating purchases",
            ),
            PatternKind::LateNightSpending => (
                "Significant late night spending detected",
                AnomalySeverity::Low,
                "Review late night purchases",
            ),
            PatternKind::WeekendHeavySpending => (
                "Most spending occurs on weekends",
                AnomalySeverity::Low,
                "Plan weekend budget carefully",
            ),
        };
        Self {
            pattern,
            description: description.to_string(),
            severity,
            recommendation: recommendation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub patterns: Vec<SpendingPattern>,
    pub total_patterns_detected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    pub similar_transactions: usize,
}

/// Runs the anomaly checks over one user's history
pub struct AnomalyDetector<'a> {
    ctx: AnalysisContext<'a>,
    config: DetectionConfig,
}

impl<'a> AnomalyDetector<'a> {
    pub fn new(ctx: AnalysisContext<'a>) -> Self {
        Self::with_config(ctx, DetectionConfig::default())
    }

    pub fn with_config(ctx: AnalysisContext<'a>, config: DetectionConfig) -> Self {
        Self { ctx, config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Is `amount` unusual for `category` given the recent history?
    pub fn detect_unusual_spending(&self, amount: f64, category: &str) -> Analysis<UnusualAmount> {
        let amounts: Vec<f64> = self
            .ctx
            .recent_expenses(self.config.unusual_lookback_days)
            .into_iter()
            .filter(|t| t.category == category)
            .map(|t| t.amount)
            .collect();

        if amounts.len() < self.config.unusual_min_samples {
            debug!(category, count = amounts.len(), "Not enough history for z-score");
            return Analysis::insufficient_data("Need more transaction history");
        }

        let average = mean(&amounts);
        let spread = stddev(&amounts);
        let z = z_score(amount, average, spread);
        let is_anomaly = z.abs() > self.config.unusual_z_threshold;

        let recommendation = if !is_anomaly {
            "Transaction is within normal range".to_string()
        } else if z > 0.0 {
            format!(
                "This transaction is significantly higher than your average of ${:.2}. Verify if this is intentional.",
                average
            )
        } else {
            format!(
                "This transaction is significantly lower than your average of ${:.2}.",
                average
            )
        };

        if is_anomaly {
            info!(category, amount, z_score = z, "Unusual transaction amount");
        }

        Analysis::success(UnusualAmount {
            is_anomaly,
            transaction_amount: amount,
            category_average: round2(average),
            category_std_dev: round2(spread),
            z_score: round2(z),
            severity: AnomalySeverity::from_z_score(z),
        })
        .with_recommendation(recommendation)
    }

    /// This calendar month's expenses against the average month of the
    /// lookback window that precedes it
    pub fn detect_spending_spike(&self) -> Analysis<SpendingSpike> {
        let month_start = self.ctx.month_start();
        let since = self.ctx.now - Duration::days(self.config.spike_lookback_days);

        let mut current_total = 0.0;
        let mut historical_total = 0.0;
        let mut historical_count = 0;
        for tx in self.ctx.transactions.iter().filter(|t| t.is_expense()) {
            if tx.occurred_at >= month_start {
                current_total += tx.amount;
            } else if tx.occurred_at >= since {
                historical_total += tx.amount;
                historical_count += 1;
            }
        }

        if historical_count == 0 {
            return Analysis::insufficient_data("Need historical data");
        }

        let baseline_months = self.config.spike_lookback_days as f64 / DAYS_PER_MONTH;
        let average = historical_total / baseline_months;
        let increase = if average > 0.0 {
            percentage_of(current_total - average, average)
        } else {
            0.0
        };
        let is_spike = increase > self.config.spike_threshold_percent;

        let recommendation = if is_spike {
            info!(current_total, average, increase, "Spending spike detected");
            format!(
                "Your spending has increased by {:.1}% this month. Review your expenses to identify the cause.",
                increase
            )
        } else {
            "Spending is within normal range".to_string()
        };

        Analysis::success(SpendingSpike {
            is_spike,
            current_month_spending: round2(current_total),
            historical_average: round2(average),
            percentage_increase: round2(increase),
        })
        .with_recommendation(recommendation)
    }

    /// Behavioural patterns over the trailing window; each fires when its
    /// share of records is strictly above the configured fraction
    pub fn detect_patterns(&self) -> Analysis<PatternReport> {
        let recent = self.ctx.recent_expenses(self.config.pattern_lookback_days);
        if recent.len() < self.config.pattern_min_samples {
            return Analysis::insufficient_data(format!(
                "Need at least {} transactions in the last {} days",
                self.config.pattern_min_samples, self.config.pattern_lookback_days
            ));
        }

        let total = recent.len() as f64;
        let small = recent
            .iter()
            .filter(|t| t.amount < self.config.small_amount)
            .count();
        let late = recent.iter().filter(|t| t.is_late_night()).count();
        // Saturday and Sunday
        let weekend = recent
            .iter()
            .filter(|t| t.occurred_at.weekday().num_days_from_monday() >= 5)
            .count();

        let mut patterns = Vec::new();
        if small as f64 > total * self.config.small_transaction_ratio {
            patterns.push(SpendingPattern::new(PatternKind::FrequentSmallTransactions));
        }
        if late as f64 > total * self.config.late_night_ratio {
            patterns.push(SpendingPattern::new(PatternKind::LateNightSpending));
        }
        if weekend as f64 > total * self.config.weekend_ratio {
            patterns.push(SpendingPattern::new(PatternKind::WeekendHeavySpending));
        }

        debug!(
            records = recent.len(),
            small,
            late,
            weekend,
            detected = patterns.len(),
            "Pattern scan complete"
        );

        Analysis::success(PatternReport {
            total_patterns_detected: patterns.len(),
            patterns,
        })
    }

    /// Records of either kind in the trailing window with the same amount
    /// (to the cent) and category as the candidate.
    ///
    /// `_description` is accepted for interface compatibility and does not
    /// take part in the match.
    pub fn detect_duplicate(
        &self,
        amount: f64,
        category: &str,
        _description: Option<&str>,
    ) -> Analysis<DuplicateCheck> {
        let since = self.ctx.now - Duration::hours(self.config.duplicate_window_hours);
        let similar = self
            .ctx
            .transactions
            .iter()
            .filter(|t| {
                t.occurred_at >= since && t.category == category && round2(t.amount) == round2(amount)
            })
            .count();

        if similar == 0 {
            return Analysis::success(DuplicateCheck {
                is_duplicate: false,
                similar_transactions: 0,
            });
        }

        debug!(category, amount, similar, "Possible duplicate");
        Analysis::success(DuplicateCheck {
            is_duplicate: true,
            similar_transactions: similar,
        })
        .with_recommendation("This transaction appears to be a duplicate. Please verify.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Status;
    use crate::models::Transaction;
    use crate::test_utils::{at, expense_series};

    #[test]
    fn test_severity_bands() {
        assert_eq!(AnomalySeverity::from_z_score(3.5), AnomalySeverity::Critical);
        assert_eq!(AnomalySeverity::from_z_score(-2.5), AnomalySeverity::High);
        assert_eq!(AnomalySeverity::from_z_score(1.5), AnomalySeverity::Medium);
        assert_eq!(AnomalySeverity::from_z_score(1.0), AnomalySeverity::Low);
    }

    #[test]
    fn test_unusual_amount() {
        let now = at(2024, 5, 20, 12);
        let mut txs = Vec::new();
        for (i, amount) in [90.0, 110.0, 90.0, 110.0, 90.0, 110.0].iter().enumerate() {
            txs.push(Transaction::expense(*amount, "food", now - Duration::days(i as i64 * 7)));
        }
        let ctx = AnalysisContext::new(&txs, now);
        let detector = AnomalyDetector::new(ctx);

        let result = detector.detect_unusual_spending(150.0, "food");
        let data = result.data().unwrap();
        assert!(data.is_anomaly);
        assert_eq!(data.category_average, 100.0);
        assert_eq!(data.category_std_dev, 10.0);
        assert_eq!(data.z_score, 5.0);
        assert_eq!(data.severity, AnomalySeverity::Critical);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("This transaction is significantly higher than your average of $100.00. Verify if this is intentional.")
        );

        let low = detector.detect_unusual_spending(70.0, "food");
        assert!(low.data().unwrap().is_anomaly);
        assert_eq!(
            low.recommendation.as_deref(),
            Some("This transaction is significantly lower than your average of $100.00.")
        );

        let normal = detector.detect_unusual_spending(105.0, "food");
        assert!(!normal.data().unwrap().is_anomaly);
        assert_eq!(
            normal.recommendation.as_deref(),
            Some("Transaction is within normal range")
        );
    }

    #[test]
    fn test_unusual_amount_needs_history() {
        let now = at(2024, 5, 20, 12);
        let txs = expense_series(100.0, "food", now, 4, 7);
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_unusual_spending(500.0, "food");
        assert_eq!(result.status, Status::InsufficientData);
        assert_eq!(result.message.as_deref(), Some("Need more transaction history"));
    }

    #[test]
    fn test_constant_history_has_zero_z() {
        let now = at(2024, 5, 20, 12);
        let txs = expense_series(100.0, "food", now, 6, 7);
        let ctx = AnalysisContext::new(&txs, now);
        let data = AnomalyDetector::new(ctx)
            .detect_unusual_spending(10_000.0, "food")
            .into_success()
            .unwrap();
        assert_eq!(data.z_score, 0.0);
        assert!(!data.is_anomaly);
    }

    #[test]
    fn test_spending_spike() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![
            Transaction::expense(300.0, "food", at(2024, 3, 10, 12)),
            Transaction::expense(300.0, "food", at(2024, 4, 10, 12)),
            Transaction::expense(300.0, "food", at(2024, 2, 25, 12)),
            Transaction::expense(150.0, "food", at(2024, 5, 2, 12)),
            Transaction::expense(100.0, "food", at(2024, 5, 15, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_spending_spike();
        let data = result.data().unwrap();
        assert_eq!(data.historical_average, 300.0);
        assert_eq!(data.current_month_spending, 250.0);
        assert!(!data.is_spike);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("Spending is within normal range")
        );
    }

    #[test]
    fn test_spending_spike_flagged() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![
            Transaction::expense(300.0, "food", at(2024, 4, 10, 12)),
            Transaction::expense(250.0, "food", at(2024, 5, 2, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_spending_spike();
        let data = result.data().unwrap();
        assert!(data.is_spike);
        assert_eq!(data.percentage_increase, 150.0);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("Your spending has increased by 150.0% this month. Review your expenses to identify the cause.")
        );
    }

    #[test]
    fn test_spike_baseline_follows_lookback() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![
            Transaction::expense(300.0, "food", at(2024, 3, 10, 12)),
            Transaction::expense(300.0, "food", at(2024, 3, 25, 12)),
            Transaction::expense(300.0, "food", at(2024, 4, 10, 12)),
            Transaction::expense(250.0, "food", at(2024, 5, 2, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        let config = DetectionConfig {
            spike_lookback_days: 60,
            ..Default::default()
        };
        // Two months of baseline: the March 10 record is outside the window
        let data = AnomalyDetector::with_config(ctx, config)
            .detect_spending_spike()
            .into_success()
            .unwrap();
        assert_eq!(data.historical_average, 300.0);
        assert!(!data.is_spike);
    }

    #[test]
    fn test_spike_without_history() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![Transaction::expense(250.0, "food", at(2024, 5, 2, 12))];
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_spending_spike();
        assert_eq!(result.status, Status::InsufficientData);
        assert_eq!(result.message.as_deref(), Some("Need historical data"));
    }

    #[test]
    fn test_patterns() {
        // 2024-05-18 is a Saturday
        let now = at(2024, 5, 20, 12);
        let txs: Vec<Transaction> = (0..10)
            .map(|i| Transaction::expense(15.0, "food", at(2024, 5, 18, 23) - Duration::minutes(i)))
            .collect();
        let ctx = AnalysisContext::new(&txs, now);
        let report = AnomalyDetector::new(ctx).detect_patterns().into_success().unwrap();

        let kinds: Vec<PatternKind> = report.patterns.iter().map(|p| p.pattern).collect();
        assert_eq!(
            kinds,
            vec![
                PatternKind::FrequentSmallTransactions,
                PatternKind::LateNightSpending,
                PatternKind::WeekendHeavySpending
            ]
        );
        assert_eq!(report.total_patterns_detected, 3);
        assert_eq!(report.patterns[0].severity, AnomalySeverity::Medium);
    }

    #[test]
    fn test_patterns_threshold_is_strict() {
        // Exactly 7 of 10 small: not more than 70%
        let now = at(2024, 5, 22, 12); // Wednesday
        let mut txs = expense_series(50.0, "food", at(2024, 5, 22, 11), 7, 0);
        txs.extend(expense_series(500.0, "rent", at(2024, 5, 22, 10), 3, 0));
        let ctx = AnalysisContext::new(&txs, now);
        let report = AnomalyDetector::new(ctx).detect_patterns().into_success().unwrap();
        assert!(report.patterns.is_empty());
    }

    #[test]
    fn test_patterns_need_ten_records() {
        let now = at(2024, 5, 22, 12);
        let txs = expense_series(50.0, "food", now, 9, 1);
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_patterns();
        assert_eq!(result.status, Status::InsufficientData);
    }

    #[test]
    fn test_duplicate_window() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![Transaction::expense(500.0, "food", now - Duration::hours(5))];
        let ctx = AnalysisContext::new(&txs, now);
        let result = AnomalyDetector::new(ctx).detect_duplicate(500.0, "food", Some("Lunch"));
        let data = result.data().unwrap();
        assert!(data.is_duplicate);
        assert_eq!(data.similar_transactions, 1);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("This transaction appears to be a duplicate. Please verify.")
        );

        let old = vec![Transaction::expense(500.0, "food", now - Duration::hours(25))];
        let ctx = AnalysisContext::new(&old, now);
        let data = AnomalyDetector::new(ctx)
            .detect_duplicate(500.0, "food", None)
            .into_success()
            .unwrap();
        assert!(!data.is_duplicate);
        assert_eq!(data.similar_transactions, 0);
    }

    #[test]
    fn test_duplicate_ignores_description() {
        let now = at(2024, 5, 20, 12);
        let txs = vec![Transaction::expense(500.0, "food", now - Duration::hours(1))
            .with_description("Groceries")];
        let ctx = AnalysisContext::new(&txs, now);
        let detector = AnomalyDetector::new(ctx);
        assert!(detector.detect_duplicate(500.0, "food", Some("Totally different")).data().unwrap().is_duplicate);
        assert!(!detector.detect_duplicate(500.0, "rent", None).data().unwrap().is_duplicate);
        assert!(!detector.detect_duplicate(499.0, "food", None).data().unwrap().is_duplicate);
    }
}
