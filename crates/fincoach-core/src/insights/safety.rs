//! Safety-net insights - emergency fund coverage and expense-to-income ratio

use crate::context::AnalysisContext;
use crate::risk::{assess_debt_risk, assess_emergency_fund, RiskLevel};

use super::engine::Insight;
use super::types::{AlertSeverity, Finding, InsightType};

pub struct EmergencyFundInsight;

impl Insight for EmergencyFundInsight {
    fn id(&self) -> InsightType {
        InsightType::EmergencyFund
    }

    fn name(&self) -> &'static str {
        "Emergency Fund"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let result = assess_emergency_fund(ctx);
        let Some(fund) = result.data() else {
            return vec![];
        };

        let severity = match fund.risk_level {
            RiskLevel::Low => return vec![],
            RiskLevel::Medium => AlertSeverity::Info,
            _ if fund.coverage_months < 1.0 => AlertSeverity::Critical,
            _ => AlertSeverity::Warning,
        };

        let mut finding = Finding::new(
            self.id(),
            "emergency_fund",
            severity,
            "Emergency fund",
            format!(
                "Savings cover {:.1} months of expenses",
                fund.coverage_months
            ),
            ctx.now,
        )
        .with_data(serde_json::to_value(fund).unwrap_or_default());
        if let Some(rec) = &result.recommendation {
            finding = finding.with_recommendation(rec.clone());
        }

        vec![finding]
    }
}

pub struct DebtToIncomeInsight;

impl Insight for DebtToIncomeInsight {
    fn id(&self) -> InsightType {
        InsightType::DebtToIncome
    }

    fn name(&self) -> &'static str {
        "Debt to Income"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let result = assess_debt_risk(ctx);
        let Some(risk) = result.data() else {
            return vec![];
        };

        let severity = match risk.risk_level {
            RiskLevel::Low => return vec![],
            RiskLevel::Medium => AlertSeverity::Info,
            RiskLevel::High => AlertSeverity::Warning,
            RiskLevel::Critical => AlertSeverity::Critical,
        };

        let mut finding = Finding::new(
            self.id(),
            "debt_to_income",
            severity,
            "Expenses vs income",
            format!(
                "Last 30 days of expenses are {:.1}% of your income",
                risk.debt_to_income_ratio
            ),
            ctx.now,
        )
        .with_data(serde_json::to_value(risk).unwrap_or_default());
        if let Some(rec) = &result.recommendation {
            finding = finding.with_recommendation(rec.clone());
        }

        vec![finding]
    }
}
