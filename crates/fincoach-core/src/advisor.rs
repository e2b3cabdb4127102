//! Budget advice and financial health scores
//!
//! Two health scores live here. [`agent_health_score`] awards 20 points for
//! each habit the user has in place (budget, income, goals, jars, staying
//! under budget). [`analytics_health_score`] grades the current calendar
//! month's numbers instead: savings against income, expense ratio, goal
//! completion and jar count.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{category_totals, total_by_kind};
use crate::analysis::{ordered_map, Analysis};
use crate::context::AnalysisContext;
use crate::models::TransactionKind;
use crate::stats::{percentage_of, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Score label shared by both health scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnalysis {
    pub total_expenses: f64,
    pub transaction_count: usize,
    /// Category → all-time total, highest first
    #[serde(serialize_with = "ordered_map")]
    pub category_breakdown: Vec<(String, f64)>,
    pub top_spending_category: String,
    pub top_spending_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRecommendation {
    pub priority: Priority,
    pub message: String,
    pub action: String,
}

impl BudgetRecommendation {
    fn new(priority: Priority, message: &str, action: &str) -> Self {
        Self {
            priority,
            message: message.to_string(),
            action: action.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAdvice {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub savings_rate: f64,
    pub recommendations: Vec<BudgetRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationDescription {
    pub needs: String,
    pub wants: String,
    pub savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsAllocation {
    pub allocation_rule: String,
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
    pub description: AllocationDescription,
}

/// Points earned per habit in [`agent_health_score`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_tracking: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_stability: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_goals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_jars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending_discipline: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentHealthScore {
    pub financial_health_score: u32,
    pub factors: HealthFactors,
    pub rating: HealthRating,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub total_income: f64,
    pub total_expense: f64,
    pub savings_rate: f64,
    pub expense_ratio: f64,
    pub total_saved: f64,
    pub goals_completed: usize,
    pub total_goals: usize,
    pub jars_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsHealthScore {
    pub health_score: f64,
    pub health_status: HealthRating,
    pub metrics: HealthMetrics,
}

const FACTOR_POINTS: u32 = 20;

/// All-time expenses by category
pub fn analyze_spending(ctx: &AnalysisContext<'_>) -> Analysis<SpendingAnalysis> {
    let expenses = ctx.expenses();
    if expenses.is_empty() {
        return Analysis::no_data("No expense data available");
    }

    let totals = category_totals(expenses.iter().copied());
    let total_expenses: f64 = expenses.iter().map(|t| t.amount).sum();
    let (top_category, top_amount) = totals
        .first()
        .map(|c| (c.category.clone(), c.total))
        .unwrap_or_default();

    Analysis::success(SpendingAnalysis {
        total_expenses: round2(total_expenses),
        transaction_count: expenses.len(),
        category_breakdown: totals
            .into_iter()
            .map(|c| (c.category, round2(c.total)))
            .collect(),
        top_spending_category: top_category,
        top_spending_amount: round2(top_amount),
    })
}

/// Rule-based advice from the profile income and all-time expenses
pub fn budget_recommendations(ctx: &AnalysisContext<'_>) -> Analysis<BudgetAdvice> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let spending = analyze_spending(ctx);
    let Some(spending) = spending.into_success() else {
        return Analysis::no_data("No expense data available");
    };

    let income = profile.monthly_income;
    let total = spending.total_expenses;
    let savings_rate = if income > 0.0 {
        (income - total) / income * 100.0
    } else {
        0.0
    };

    let mut recommendations = Vec::new();
    if savings_rate < 10.0 {
        recommendations.push(BudgetRecommendation::new(
            Priority::High,
            "Your savings rate is below 10%. Consider reducing discretionary spending.",
            "Review entertainment and shopping expenses",
        ));
    }
    if spending.top_spending_category == "food" {
        recommendations.push(BudgetRecommendation::new(
            Priority::Medium,
            "Food expenses are your highest spending category.",
            "Consider meal planning and cooking at home",
        ));
    }
    if total > income {
        recommendations.push(BudgetRecommendation::new(
            Priority::Critical,
            "You are spending more than your income!",
            "Immediately reduce expenses or increase income",
        ));
    }

    debug!(savings_rate, count = recommendations.len(), "Budget recommendations");
    Analysis::success(BudgetAdvice {
        monthly_income: income,
        total_expenses: total,
        savings_rate: round2(savings_rate),
        recommendations,
    })
}

/// 50/30/20 split of the profile's monthly income
pub fn suggest_allocation(ctx: &AnalysisContext<'_>) -> Analysis<SavingsAllocation> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };
    let income = profile.monthly_income;
    if income <= 0.0 {
        return Analysis::error("Invalid monthly income");
    }

    Analysis::success(SavingsAllocation {
        allocation_rule: "50-30-20".to_string(),
        needs: round2(income * 0.50),
        wants: round2(income * 0.30),
        savings: round2(income * 0.20),
        description: AllocationDescription {
            needs: "Essential expenses (food, utilities, rent)".to_string(),
            wants: "Discretionary spending (entertainment, dining out)".to_string(),
            savings: "Emergency fund, investments, goals".to_string(),
        },
    })
}

/// Habit score: 20 points per habit in place, capped at 100
pub fn agent_health_score(ctx: &AnalysisContext<'_>) -> Analysis<AgentHealthScore> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let mut factors = HealthFactors::default();
    if profile.monthly_budget > 0.0 {
        factors.budget_tracking = Some(FACTOR_POINTS);
    }
    if profile.monthly_income > 0.0 {
        factors.income_stability = Some(FACTOR_POINTS);
    }
    if ctx.active_goals().next().is_some() {
        factors.active_goals = Some(FACTOR_POINTS);
    }
    if ctx.active_jars().next().is_some() {
        factors.savings_jars = Some(FACTOR_POINTS);
    }
    let expenses = ctx.expenses();
    if !expenses.is_empty() {
        let total: f64 = expenses.iter().map(|t| t.amount).sum();
        if profile.monthly_budget > 0.0 && total <= profile.monthly_budget {
            factors.spending_discipline = Some(FACTOR_POINTS);
        }
    }

    let score = [
        factors.budget_tracking,
        factors.income_stability,
        factors.active_goals,
        factors.savings_jars,
        factors.spending_discipline,
    ]
    .iter()
    .flatten()
    .sum::<u32>()
    .min(100);

    Analysis::success(AgentHealthScore {
        financial_health_score: score,
        factors,
        rating: HealthRating::from_score(score as f64),
        recommendations: score_recommendations(score)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

fn score_recommendations(score: u32) -> [&'static str; 2] {
    if score < 40 {
        [
            "Start tracking your budget immediately",
            "Set up at least one financial goal",
        ]
    } else if score < 60 {
        [
            "Increase your savings rate",
            "Create more savings jars for different goals",
        ]
    } else if score < 80 {
        [
            "Maintain your current financial discipline",
            "Consider increasing your savings goals",
        ]
    } else {
        [
            "Excellent financial management!",
            "Consider investing for long-term growth",
        ]
    }
}

/// Current-month score out of 100: savings (30), expense ratio (30), goal
/// completion (20), jar count (20)
pub fn analytics_health_score(ctx: &AnalysisContext<'_>) -> Analysis<AnalyticsHealthScore> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let month = ctx.current_month();
    let income = total_by_kind(month.iter().copied(), TransactionKind::Income);
    let expense = total_by_kind(month.iter().copied(), TransactionKind::Expense);
    let total_saved = ctx.total_saved();
    let completed = ctx.goals.iter().filter(|g| g.is_reached()).count();

    let savings_rate = percentage_of(total_saved, income);
    let expense_ratio = percentage_of(expense, income);

    let mut score = 0.0;
    if income > 0.0 {
        score += (savings_rate / 20.0 * 30.0).min(30.0);
        score += if expense_ratio <= 50.0 {
            30.0
        } else if expense_ratio <= 70.0 {
            20.0
        } else if expense_ratio <= 90.0 {
            10.0
        } else {
            0.0
        };
    }
    if !ctx.goals.is_empty() {
        score += completed as f64 / ctx.goals.len() as f64 * 20.0;
    }
    score += (ctx.jars.len() as f64 * 5.0).min(20.0);

    Analysis::success(AnalyticsHealthScore {
        health_score: round2(score),
        health_status: HealthRating::from_score(score),
        metrics: HealthMetrics {
            total_income: round2(income),
            total_expense: round2(expense),
            savings_rate: round2(savings_rate),
            expense_ratio: round2(expense_ratio),
            total_saved: round2(total_saved),
            goals_completed: completed,
            total_goals: ctx.goals.len(),
            jars_count: ctx.jars.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Status;
    use crate::models::{Goal, Jar, Transaction, UserProfile};
    use crate::test_utils::{at, sample_snapshot};

    fn profile(income: f64, budget: f64) -> UserProfile {
        UserProfile {
            monthly_income: income,
            monthly_budget: budget,
        }
    }

    #[test]
    fn test_spending_analysis() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![
            Transaction::expense(40.0, "food", at(2024, 6, 1, 12)),
            Transaction::expense(300.0, "rent", at(2024, 6, 1, 12)),
            Transaction::expense(70.0, "food", at(2023, 1, 1, 12)),
            Transaction::income(900.0, "salary", at(2024, 6, 1, 12)),
        ];
        let ctx = AnalysisContext::new(&txs, now);
        let data = analyze_spending(&ctx).into_success().unwrap();
        assert_eq!(data.total_expenses, 410.0);
        assert_eq!(data.transaction_count, 3);
        assert_eq!(data.top_spending_category, "rent");
        assert_eq!(data.category_breakdown[1], ("food".to_string(), 110.0));

        let empty = AnalysisContext::new(&[], now);
        assert_eq!(analyze_spending(&empty).status, Status::NoData);
    }

    #[test]
    fn test_budget_recommendations_all_rules() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![Transaction::expense(1500.0, "food", at(2024, 6, 1, 12))];
        let user = profile(1000.0, 0.0);
        let ctx = AnalysisContext::new(&txs, now).with_profile(&user);

        let advice = budget_recommendations(&ctx).into_success().unwrap();
        assert_eq!(advice.savings_rate, -50.0);
        let priorities: Vec<Priority> = advice.recommendations.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Medium, Priority::Critical]
        );
        assert_eq!(
            advice.recommendations[2].message,
            "You are spending more than your income!"
        );
    }

    #[test]
    fn test_budget_recommendations_missing_user() {
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12));
        let result = budget_recommendations(&ctx);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.message.as_deref(), Some("User not found"));
    }

    #[test]
    fn test_allocation() {
        let user = profile(5000.0, 0.0);
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12)).with_profile(&user);
        let split = suggest_allocation(&ctx).into_success().unwrap();
        assert_eq!((split.needs, split.wants, split.savings), (2500.0, 1500.0, 1000.0));
        assert_eq!(split.allocation_rule, "50-30-20");

        let broke = profile(0.0, 0.0);
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12)).with_profile(&broke);
        let result = suggest_allocation(&ctx);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.message.as_deref(), Some("Invalid monthly income"));
    }

    #[test]
    fn test_agent_health_score_full_marks() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![Transaction::expense(500.0, "food", at(2024, 6, 1, 12))];
        let goals = vec![Goal::new("Trip", 1000.0, at(2025, 1, 1, 0))];
        let jars = vec![Jar::new("Rainy day", 500.0, None)];
        let user = profile(3000.0, 2000.0);
        let ctx = AnalysisContext::new(&txs, now)
            .with_goals(&goals)
            .with_jars(&jars)
            .with_profile(&user);

        let score = agent_health_score(&ctx).into_success().unwrap();
        assert_eq!(score.financial_health_score, 100);
        assert_eq!(score.rating, HealthRating::Excellent);
        assert_eq!(score.factors.spending_discipline, Some(20));
        assert_eq!(score.recommendations[0], "Excellent financial management!");
    }

    #[test]
    fn test_agent_health_score_partial() {
        let user = profile(3000.0, 0.0);
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12)).with_profile(&user);
        let score = agent_health_score(&ctx).into_success().unwrap();
        assert_eq!(score.financial_health_score, 20);
        assert_eq!(score.rating, HealthRating::Poor);
        assert!(score.factors.budget_tracking.is_none());

        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["factors"], serde_json::json!({"income_stability": 20}));
        assert_eq!(json["rating"], "Poor");
    }

    #[test]
    fn test_analytics_health_score() {
        let now = at(2024, 6, 20, 12);
        let snapshot = sample_snapshot(now);
        let ctx = AnalysisContext::from_snapshot(&snapshot, now);
        let result = analytics_health_score(&ctx).into_success().unwrap();

        // June: 5000 income, 1480 expenses, 2900 saved in two jars, one of two goals reached
        assert_eq!(result.metrics.total_income, 5000.0);
        assert_eq!(result.metrics.total_expense, 1480.0);
        assert_eq!(result.metrics.goals_completed, 1);
        assert_eq!(result.metrics.jars_count, 2);
        // 30 (capped savings) + 30 (ratio 29.6) + 10 (half the goals) + 10 (two jars)
        assert_eq!(result.health_score, 80.0);
        assert_eq!(result.health_status, HealthRating::Excellent);
    }
}
