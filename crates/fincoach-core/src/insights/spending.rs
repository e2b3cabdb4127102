//! Spending insights - month-over-baseline spikes and behavioural patterns

use crate::anomaly::{AnomalyDetector, AnomalySeverity};
use crate::config::DetectionConfig;
use crate::context::AnalysisContext;

use super::engine::Insight;
use super::types::{AlertSeverity, Finding, InsightType};

/// Increase over baseline at which a spike becomes critical
const CRITICAL_SPIKE_PERCENT: f64 = 50.0;

pub struct SpendingSpikeInsight {
    config: DetectionConfig,
}

impl SpendingSpikeInsight {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }
}

impl Insight for SpendingSpikeInsight {
    fn id(&self) -> InsightType {
        InsightType::SpendingSpike
    }

    fn name(&self) -> &'static str {
        "Spending Spike"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let detector = AnomalyDetector::with_config(*ctx, self.config.clone());
        let result = detector.detect_spending_spike();
        let Some(spike) = result.data().filter(|s| s.is_spike) else {
            return vec![];
        };

        let severity = if spike.percentage_increase > CRITICAL_SPIKE_PERCENT {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        let mut finding = Finding::new(
            self.id(),
            format!("spike:{}", ctx.month_start().format("%Y-%m")),
            severity,
            "Spending spike",
            format!(
                "Spending this month is {:.1}% above your recent average",
                spike.percentage_increase
            ),
            ctx.now,
        )
        .with_data(serde_json::to_value(spike).unwrap_or_default());
        if let Some(rec) = &result.recommendation {
            finding = finding.with_recommendation(rec.clone());
        }

        vec![finding]
    }
}

pub struct SpendingPatternInsight {
    config: DetectionConfig,
}

impl SpendingPatternInsight {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }
}

impl Insight for SpendingPatternInsight {
    fn id(&self) -> InsightType {
        InsightType::SpendingPattern
    }

    fn name(&self) -> &'static str {
        "Spending Patterns"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let detector = AnomalyDetector::with_config(*ctx, self.config.clone());
        let Some(report) = detector.detect_patterns().into_success() else {
            return vec![];
        };

        report
            .patterns
            .into_iter()
            .map(|pattern| {
                let severity = match pattern.severity {
                    AnomalySeverity::Low => AlertSeverity::Info,
                    _ => AlertSeverity::Warning,
                };
                Finding::new(
                    self.id(),
                    format!("pattern:{}", pattern.pattern.as_str()),
                    severity,
                    "Spending pattern",
                    pattern.description.clone(),
                    ctx.now,
                )
                .with_recommendation(pattern.recommendation.clone())
                .with_data(serde_json::json!({ "pattern": pattern.pattern.as_str() }))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::test_utils::at;
    use chrono::Duration;

    #[test]
    fn test_spike_finding() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![
            Transaction::expense(300.0, "food", at(2024, 5, 10, 12)),
            Transaction::expense(600.0, "rent", at(2024, 6, 5, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        let findings = SpendingSpikeInsight::new(DetectionConfig::default()).analyze(&ctx);

        // baseline 300 / 3 = 100, current 600
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].key, "spike:2024-06");
        assert_eq!(findings[0].severity, AlertSeverity::Critical);
        assert_eq!(findings[0].data["percentage_increase"], 500.0);
    }

    #[test]
    fn test_no_spike_no_finding() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![
            Transaction::expense(300.0, "food", at(2024, 5, 10, 12)),
            Transaction::expense(50.0, "food", at(2024, 6, 5, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        assert!(SpendingSpikeInsight::new(DetectionConfig::default())
            .analyze(&ctx)
            .is_empty());
    }

    #[test]
    fn test_pattern_findings() {
        let now = at(2024, 5, 20, 12);
        let base = at(2024, 5, 18, 23);
        let txs: Vec<Transaction> = (0..10)
            .map(|i| Transaction::expense(15.0, "food", base - Duration::minutes(i)))
            .collect();
        let ctx = AnalysisContext::new(&txs, now);
        let findings = SpendingPatternInsight::new(DetectionConfig::default()).analyze(&ctx);

        let keys: Vec<&str> = findings.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "pattern:frequent_small_transactions",
                "pattern:late_night_spending",
                "pattern:weekend_heavy_spending"
            ]
        );
        assert_eq!(findings[0].severity, AlertSeverity::Warning);
        assert_eq!(findings[1].severity, AlertSeverity::Info);
    }
}
