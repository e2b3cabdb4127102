//! Coaching: daily tips, weekly summary, action plan and motivation

use serde::Serialize;

use crate::aggregate::category_totals;
use crate::analysis::Analysis;
use crate::context::AnalysisContext;
use crate::models::{GoalStatus, TransactionKind};
use crate::stats::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipPriority {
    Low,
    Medium,
    High,
}

impl TipPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachingTip {
    pub category: String,
    pub tip: String,
    pub priority: TipPriority,
}

impl CoachingTip {
    fn new(category: &str, tip: &str, priority: TipPriority) -> Self {
        Self {
            category: category.to_string(),
            tip: tip.to_string(),
            priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTips {
    pub tips: Vec<CoachingTip>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_ending: String,
    pub weekly_income: f64,
    pub weekly_expenses: f64,
    pub weekly_savings: f64,
    pub top_spending_categories: Vec<CategoryAmount>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedAction {
    pub action: String,
    pub reason: String,
    pub target: String,
}

impl PlannedAction {
    fn new(action: &str, reason: &str, target: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            reason: reason.to_string(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionPlan {
    pub immediate_actions: Vec<PlannedAction>,
    pub short_term_actions: Vec<PlannedAction>,
    pub long_term_actions: Vec<PlannedAction>,
}

impl ActionPlan {
    pub fn len(&self) -> usize {
        self.immediate_actions.len() + self.short_term_actions.len() + self.long_term_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanReport {
    pub action_plan: ActionPlan,
    pub total_actions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotivationLevel {
    Low,
    Medium,
    High,
}

impl MotivationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The joined text is carried in [`Analysis::message`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motivation {
    pub messages: Vec<String>,
    pub motivation_level: MotivationLevel,
}

fn spent_last_30_days(ctx: &AnalysisContext<'_>) -> f64 {
    ctx.recent_expenses(30).iter().map(|t| t.amount).sum()
}

pub fn daily_tips(ctx: &AnalysisContext<'_>) -> Analysis<DailyTips> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let mut tips = Vec::new();
    if profile.monthly_budget > 0.0 {
        let usage = spent_last_30_days(ctx) / profile.monthly_budget * 100.0;
        if usage > 80.0 {
            tips.push(CoachingTip::new(
                "Budget",
                "You're approaching your monthly budget limit. Be mindful of remaining spending.",
                TipPriority::High,
            ));
        } else if usage < 50.0 {
            tips.push(CoachingTip::new(
                "Savings",
                "Great job! You're well under budget. Consider increasing your savings goals.",
                TipPriority::Medium,
            ));
        }
    }

    if ctx.active_goals().next().is_none() {
        tips.push(CoachingTip::new(
            "Goals",
            "You don't have any active financial goals. Setting goals helps you stay motivated!",
            TipPriority::Medium,
        ));
    }

    if ctx.active_jars().next().is_none() {
        tips.push(CoachingTip::new(
            "Savings",
            "Create savings jars to organize your money for different purposes.",
            TipPriority::Medium,
        ));
    }

    if tips.is_empty() {
        tips.push(CoachingTip::new(
            "General",
            "You're doing great! Keep tracking your expenses and working towards your goals.",
            TipPriority::Low,
        ));
    }

    Analysis::success(DailyTips {
        tips,
        timestamp: ctx.now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

/// The trailing seven days
pub fn weekly_summary(ctx: &AnalysisContext<'_>) -> Analysis<WeeklySummary> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let income: f64 = ctx
        .recent(TransactionKind::Income, 7)
        .iter()
        .map(|t| t.amount)
        .sum();
    let expenses = ctx.recent_expenses(7);
    let spent: f64 = expenses.iter().map(|t| t.amount).sum();
    let savings = income - spent;

    let top: Vec<CategoryAmount> = category_totals(expenses.iter().copied())
        .into_iter()
        .take(3)
        .map(|c| CategoryAmount {
            category: c.category,
            amount: round2(c.total),
        })
        .collect();

    let mut insights = Vec::new();
    if savings > 0.0 {
        insights.push(format!("Great week! You saved ${:.2}", savings));
    } else if savings < 0.0 {
        insights.push(format!(
            "You spent ${:.2} more than you earned this week",
            savings.abs()
        ));
    }
    if let Some(first) = top.first() {
        insights.push(format!(
            "Your highest spending category this week was {}",
            first.category
        ));
    }

    Analysis::success(WeeklySummary {
        week_ending: ctx.now.format("%Y-%m-%d").to_string(),
        weekly_income: round2(income),
        weekly_expenses: round2(spent),
        weekly_savings: round2(savings),
        top_spending_categories: top,
        insights,
    })
}

pub fn action_plan(ctx: &AnalysisContext<'_>) -> Analysis<ActionPlanReport> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let mut plan = ActionPlan::default();
    let income = profile.monthly_income;
    let spent = spent_last_30_days(ctx);

    if spent > income {
        plan.immediate_actions.push(PlannedAction::new(
            "Reduce monthly expenses",
            "You're spending more than you earn",
            format!("Reduce expenses by ${:.2}", spent - income),
        ));
    }
    if profile.monthly_budget == 0.0 {
        plan.immediate_actions.push(PlannedAction::new(
            "Set a monthly budget",
            "Budget helps track and control spending",
            format!("Set budget to ${:.2}", income * 0.8),
        ));
    }

    if ctx.active_goals().count() < 2 {
        plan.short_term_actions.push(PlannedAction::new(
            "Create financial goals",
            "Goals provide direction and motivation",
            "Create at least 2 financial goals",
        ));
    }
    if ctx.active_jars().count() < 3 {
        plan.short_term_actions.push(PlannedAction::new(
            "Create savings jars",
            "Jars help organize savings for different purposes",
            "Create 3-5 savings jars",
        ));
    }

    plan.long_term_actions.push(PlannedAction::new(
        "Build emergency fund",
        "Emergency fund provides financial security",
        "Save 6 months of expenses",
    ));
    plan.long_term_actions.push(PlannedAction::new(
        "Increase income",
        "Higher income accelerates financial goals",
        "Increase monthly income by 10-20%",
    ));

    Analysis::success(ActionPlanReport {
        total_actions: plan.len(),
        action_plan: plan,
    })
}

pub fn motivation(ctx: &AnalysisContext<'_>) -> Analysis<Motivation> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let completed = ctx
        .goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    let saved = ctx.total_saved();

    let mut messages = Vec::new();
    if completed > 0 {
        messages.push(format!(
            "🎉 Congratulations! You've completed {} financial goal(s)!",
            completed
        ));
    }
    if saved > 0.0 {
        messages.push(format!("💰 You've saved ${:.2} towards your goals!", saved));
    }
    if profile.monthly_budget > 0.0 {
        messages.push("📊 You're actively tracking your budget - great discipline!".to_string());
    }
    if messages.is_empty() {
        messages.push(
            "🚀 Start your financial journey today! Set a goal and begin tracking your progress."
                .to_string(),
        );
    }

    let level = if completed > 0 {
        MotivationLevel::High
    } else if saved > 0.0 {
        MotivationLevel::Medium
    } else {
        MotivationLevel::Low
    };

    let text = messages.join(" ");
    Analysis::success(Motivation {
        messages,
        motivation_level: level,
    })
    .with_message(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, Jar, Transaction, UserProfile};
    use crate::test_utils::at;
    use chrono::Duration;

    fn profile(income: f64, budget: f64) -> UserProfile {
        UserProfile {
            monthly_income: income,
            monthly_budget: budget,
        }
    }

    #[test]
    fn test_daily_tips_new_user() {
        let user = profile(3000.0, 0.0);
        let ctx = AnalysisContext::new(&[], at(2024, 6, 20, 12)).with_profile(&user);
        let tips = daily_tips(&ctx).into_success().unwrap();
        let categories: Vec<&str> = tips.tips.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, vec!["Goals", "Savings"]);
        assert_eq!(tips.timestamp, "2024-06-20T12:00:00");
    }

    #[test]
    fn test_daily_tips_budget_pressure() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![Transaction::expense(900.0, "rent", now - Duration::days(2))];
        let goals = vec![Goal::new("Trip", 1000.0, at(2025, 1, 1, 0))];
        let jars = vec![Jar::new("Travel", 1000.0, None)];
        let user = profile(3000.0, 1000.0);
        let ctx = AnalysisContext::new(&txs, now)
            .with_goals(&goals)
            .with_jars(&jars)
            .with_profile(&user);

        let tips = daily_tips(&ctx).into_success().unwrap();
        assert_eq!(tips.tips.len(), 1);
        assert_eq!(tips.tips[0].category, "Budget");
        assert_eq!(tips.tips[0].priority, TipPriority::High);
    }

    #[test]
    fn test_daily_tips_default() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![Transaction::expense(600.0, "rent", now - Duration::days(2))];
        let goals = vec![Goal::new("Trip", 1000.0, at(2025, 1, 1, 0))];
        let jars = vec![Jar::new("Travel", 1000.0, None)];
        let user = profile(3000.0, 1000.0);
        let ctx = AnalysisContext::new(&txs, now)
            .with_goals(&goals)
            .with_jars(&jars)
            .with_profile(&user);

        let tips = daily_tips(&ctx).into_success().unwrap();
        assert_eq!(tips.tips[0].category, "General");
        assert_eq!(tips.tips[0].priority, TipPriority::Low);
    }

    #[test]
    fn test_weekly_summary() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![
            Transaction::income(1000.0, "salary", now - Duration::days(1)),
            Transaction::expense(200.0, "food", now - Duration::days(2)),
            Transaction::expense(300.0, "shopping", now - Duration::days(3)),
            Transaction::expense(50.0, "food", now - Duration::days(4)),
            Transaction::expense(10.0, "transportation", now - Duration::days(5)),
            Transaction::expense(5.0, "entertainment", now - Duration::days(6)),
            Transaction::expense(999.0, "rent", now - Duration::days(8)),
        ];
        let user = profile(3000.0, 0.0);
        let ctx = AnalysisContext::new(&txs, now).with_profile(&user);

        let summary = weekly_summary(&ctx).into_success().unwrap();
        assert_eq!(summary.week_ending, "2024-06-20");
        assert_eq!(summary.weekly_expenses, 565.0);
        assert_eq!(summary.weekly_savings, 435.0);
        assert_eq!(summary.top_spending_categories.len(), 3);
        assert_eq!(summary.top_spending_categories[0].category, "shopping");
        assert_eq!(
            summary.insights,
            vec![
                "Great week! You saved $435.00".to_string(),
                "Your highest spending category this week was shopping".to_string()
            ]
        );
    }

    #[test]
    fn test_action_plan() {
        let now = at(2024, 6, 20, 12);
        let txs = vec![Transaction::expense(3500.0, "rent", now - Duration::days(2))];
        let user = profile(3000.0, 0.0);
        let ctx = AnalysisContext::new(&txs, now).with_profile(&user);

        let report = action_plan(&ctx).into_success().unwrap();
        let plan = &report.action_plan;
        assert_eq!(plan.immediate_actions[0].target, "Reduce expenses by $500.00");
        assert_eq!(plan.immediate_actions[1].target, "Set budget to $2400.00");
        assert_eq!(plan.short_term_actions.len(), 2);
        assert_eq!(plan.long_term_actions.len(), 2);
        assert_eq!(report.total_actions, 6);
    }

    #[test]
    fn test_motivation_levels() {
        let now = at(2024, 6, 20, 12);
        let mut done = Goal::new("Phone", 500.0, at(2025, 1, 1, 0));
        done.contribute(500.0).unwrap();
        let goals = vec![done];
        let jars = vec![Jar::new("Travel", 1000.0, None).with_balance(250.0)];
        let user = profile(3000.0, 0.0);
        let ctx = AnalysisContext::new(&[], now)
            .with_goals(&goals)
            .with_jars(&jars)
            .with_profile(&user);

        let result = motivation(&ctx);
        assert_eq!(
            result.message.as_deref(),
            Some("🎉 Congratulations! You've completed 1 financial goal(s)! 💰 You've saved $250.00 towards your goals!")
        );
        assert_eq!(result.data().unwrap().motivation_level, MotivationLevel::High);

        let ctx = AnalysisContext::new(&[], now).with_profile(&user);
        let result = motivation(&ctx);
        assert_eq!(result.data().unwrap().motivation_level, MotivationLevel::Low);
        assert!(result.message.unwrap().starts_with("🚀"));
    }
}
