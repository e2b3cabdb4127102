//! Risk assessments: emergency fund, expense-to-income, goal feasibility and
//! spending volatility

use serde::Serialize;
use tracing::debug;

use crate::aggregate::group_by_month;
use crate::analysis::Analysis;
use crate::context::AnalysisContext;
use crate::models::Goal;
use crate::stats::{coefficient_of_variation, mean, round2, stddev};

/// Months of expenses a complete emergency fund covers
const EMERGENCY_FUND_MONTHS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feasibility {
    Achieved,
    Feasible,
    Challenging,
    Impossible,
}

impl Feasibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::Feasible => "feasible",
            Self::Challenging => "challenging",
            Self::Impossible => "impossible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyFund {
    pub monthly_average_expense: f64,
    pub recommended_emergency_fund: f64,
    pub current_savings: f64,
    pub coverage_months: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtRisk {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub debt_to_income_ratio: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalFeasibility {
    pub feasibility: Feasibility,
    /// Absent when the deadline has already passed
    #[serde(flatten)]
    pub details: Option<FeasibilityDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityDetails {
    pub goal_title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub amount_remaining: f64,
    pub days_remaining: i64,
    pub months_remaining: f64,
    pub required_monthly_savings: f64,
    pub available_monthly_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingVolatility {
    pub average_monthly_spending: f64,
    pub standard_deviation: f64,
    pub volatility_percentage: f64,
    pub volatility_level: RiskLevel,
}

/// Can the jar savings cover six months of the recent average spend?
///
/// The advice text and `risk_level` use different bands: below one month of
/// coverage the text is critical while the level is only "high".
pub fn assess_emergency_fund(ctx: &AnalysisContext<'_>) -> Analysis<EmergencyFund> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let expenses = ctx.recent_expenses(90);
    if expenses.is_empty() {
        return Analysis::warning("Insufficient data to assess emergency fund")
            .with_recommendation("Track expenses for 3 months");
    }

    let monthly_average = expenses.iter().map(|t| t.amount).sum::<f64>() / 3.0;
    let savings = ctx.total_saved();
    let coverage = if monthly_average > 0.0 {
        savings / monthly_average
    } else {
        0.0
    };

    let risk_level = if coverage >= 6.0 {
        RiskLevel::Low
    } else if coverage >= 3.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let recommendation = if coverage < 1.0 {
        "Critical: Build emergency fund immediately. Aim for 6 months of expenses."
    } else if coverage < 3.0 {
        "Warning: Emergency fund is below recommended level. Target 6 months of expenses."
    } else if coverage < 6.0 {
        "Good: Continue building emergency fund to reach 6 months."
    } else {
        "Excellent: Your emergency fund is well-established."
    };

    debug!(coverage, risk = risk_level.as_str(), "Emergency fund assessed");
    Analysis::success(EmergencyFund {
        monthly_average_expense: round2(monthly_average),
        recommended_emergency_fund: round2(monthly_average * EMERGENCY_FUND_MONTHS),
        current_savings: round2(savings),
        coverage_months: round2(coverage),
        risk_level,
    })
    .with_recommendation(recommendation)
}

/// Last 30 days of expenses as a percentage of the profile income
pub fn assess_debt_risk(ctx: &AnalysisContext<'_>) -> Analysis<DebtRisk> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let income = profile.monthly_income;
    if income <= 0.0 {
        return Analysis::warning("Income not set")
            .with_recommendation("Set your monthly income for accurate assessment");
    }

    let expenses: f64 = ctx.recent_expenses(30).iter().map(|t| t.amount).sum();
    let ratio = expenses / income * 100.0;

    let (risk_level, recommendation) = if ratio > 100.0 {
        (
            RiskLevel::Critical,
            "Critical: You are spending more than you earn. Reduce expenses immediately.",
        )
    } else if ratio > 80.0 {
        (
            RiskLevel::High,
            "High Risk: Your expenses are too high relative to income. Cut discretionary spending.",
        )
    } else if ratio > 60.0 {
        (
            RiskLevel::Medium,
            "Medium Risk: Consider reducing expenses to improve financial health.",
        )
    } else {
        (
            RiskLevel::Low,
            "Low Risk: Your expense-to-income ratio is healthy.",
        )
    };

    Analysis::success(DebtRisk {
        monthly_income: income,
        monthly_expenses: round2(expenses),
        debt_to_income_ratio: round2(ratio),
        risk_level,
    })
    .with_recommendation(recommendation)
}

/// Can the user's current surplus reach the goal by its deadline?
pub fn assess_goal_feasibility(ctx: &AnalysisContext<'_>, goal_id: i64) -> Analysis<GoalFeasibility> {
    match ctx.goal(goal_id) {
        Some(goal) => assess_goal(ctx, goal),
        None => Analysis::not_found("Goal"),
    }
}

/// Feasibility of one goal record, which need not have a unique id
pub fn assess_goal(ctx: &AnalysisContext<'_>, goal: &Goal) -> Analysis<GoalFeasibility> {
    let Some(profile) = ctx.profile else {
        return Analysis::not_found("User");
    };

    let days_remaining = (goal.deadline - ctx.now).num_days();
    let months_remaining = days_remaining as f64 / 30.0;
    if months_remaining <= 0.0 {
        return Analysis::error("Goal deadline has passed").with_data(GoalFeasibility {
            feasibility: Feasibility::Impossible,
            details: None,
        });
    }

    let remaining = goal.remaining();
    let required = remaining / months_remaining;
    let recent_expenses: f64 = ctx.recent_expenses(30).iter().map(|t| t.amount).sum();
    let available = profile.monthly_income - recent_expenses;

    let (feasibility, recommendation) = if required <= 0.0 {
        (Feasibility::Achieved, "Goal target already reached!".to_string())
    } else if required <= available {
        (
            Feasibility::Feasible,
            format!("Goal is achievable. Save ${:.2} monthly.", required),
        )
    } else {
        (
            Feasibility::Challenging,
            format!(
                "Challenging: Need ${:.2} more monthly. Consider extending deadline or reducing target.",
                required - available
            ),
        )
    };

    Analysis::success(GoalFeasibility {
        feasibility,
        details: Some(FeasibilityDetails {
            goal_title: goal.title.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            amount_remaining: round2(remaining),
            days_remaining,
            months_remaining: round2(months_remaining),
            required_monthly_savings: round2(required),
            available_monthly_savings: round2(available),
        }),
    })
    .with_recommendation(recommendation)
}

/// Coefficient of variation of the monthly expense totals over 90 days
pub fn assess_spending_volatility(ctx: &AnalysisContext<'_>) -> Analysis<SpendingVolatility> {
    let expenses = ctx.recent_expenses(90);
    if expenses.len() < 10 {
        return Analysis::warning("Insufficient data for volatility assessment")
            .with_recommendation("Track more transactions for accurate analysis");
    }

    let totals: Vec<f64> = group_by_month(expenses.iter().copied()).into_values().collect();
    if totals.len() < 2 {
        return Analysis::warning("Need at least 2 months of data")
            .with_recommendation("Continue tracking expenses");
    }

    let volatility = coefficient_of_variation(&totals);
    let (level, recommendation) = if volatility > 30.0 {
        (
            RiskLevel::High,
            "Your spending is highly variable. Create a budget to stabilize expenses.",
        )
    } else if volatility > 15.0 {
        (
            RiskLevel::Medium,
            "Moderate spending variation. Track categories to identify patterns.",
        )
    } else {
        (
            RiskLevel::Low,
            "Excellent: Your spending is consistent and predictable.",
        )
    };

    Analysis::success(SpendingVolatility {
        average_monthly_spending: round2(mean(&totals)),
        standard_deviation: round2(stddev(&totals)),
        volatility_percentage: round2(volatility),
        volatility_level: level,
    })
    .with_recommendation(recommendation)
}
