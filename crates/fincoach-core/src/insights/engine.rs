//! Insight engine - runs every registered analyzer over one context

use crate::config::DetectionConfig;
use crate::context::AnalysisContext;

use super::types::{Finding, InsightType};
use super::{
    DebtToIncomeInsight, EmergencyFundInsight, GoalDeadlineInsight, SpendingPatternInsight,
    SpendingSpikeInsight,
};

/// Trait for insight analyzers.
///
/// An analyzer that cannot run (no profile, thin history) returns no findings.
pub trait Insight: Send + Sync {
    /// Unique identifier for this insight type
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the context and produce findings
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding>;
}

pub struct InsightEngine {
    insights: Vec<Box<dyn Insight>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the built-in analyzers and default detection thresholds
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        let mut engine = Self { insights: vec![] };

        engine.register(Box::new(SpendingSpikeInsight::new(config.clone())));
        engine.register(Box::new(SpendingPatternInsight::new(config)));
        engine.register(Box::new(EmergencyFundInsight));
        engine.register(Box::new(DebtToIncomeInsight));
        engine.register(Box::new(GoalDeadlineInsight));

        engine
    }

    /// Engine with no analyzers registered
    pub fn empty() -> Self {
        Self { insights: vec![] }
    }

    pub fn register(&mut self, insight: Box<dyn Insight>) {
        self.insights.push(insight);
    }

    pub fn len(&self) -> usize {
        self.insights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    /// Run all analyzers, most severe findings first
    pub fn analyze_all(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let mut all_findings = vec![];

        for insight in &self.insights {
            let findings = insight.analyze(ctx);
            tracing::debug!(
                insight = insight.id().as_str(),
                count = findings.len(),
                "Insight analysis complete"
            );
            all_findings.extend(findings);
        }

        // Stable: equal severities keep registration order
        all_findings.sort_by(|a, b| b.severity.priority().cmp(&a.severity.priority()));

        all_findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::AlertSeverity;
    use crate::test_utils::at;

    struct Fixed(AlertSeverity, &'static str);

    impl Insight for Fixed {
        fn id(&self) -> InsightType {
            InsightType::SpendingPattern
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
            vec![Finding::new(self.id(), self.1, self.0, "t", "m", ctx.now)]
        }
    }

    #[test]
    fn test_findings_sorted_by_severity() {
        let mut engine = InsightEngine::empty();
        engine.register(Box::new(Fixed(AlertSeverity::Info, "a")));
        engine.register(Box::new(Fixed(AlertSeverity::Critical, "b")));
        engine.register(Box::new(Fixed(AlertSeverity::Warning, "c")));
        engine.register(Box::new(Fixed(AlertSeverity::Info, "d")));

        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12));
        let keys: Vec<String> = engine.analyze_all(&ctx).into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_builtins_registered() {
        assert_eq!(InsightEngine::new().len(), 5);
        assert!(InsightEngine::empty().is_empty());
    }

    #[test]
    fn test_empty_context_produces_nothing() {
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12));
        assert!(InsightEngine::new().analyze_all(&ctx).is_empty());
    }
}
