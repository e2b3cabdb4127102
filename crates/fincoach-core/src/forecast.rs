//! Spending and income forecasts
//!
//! Projections work on calendar-month totals taken from the records'
//! own timestamps and always walk those months in chronological order.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{category_totals, group_by_month};
use crate::analysis::{ordered_map, Analysis};
use crate::config::ForecastConfig;
use crate::context::AnalysisContext;
use crate::models::TransactionKind;
use crate::stats::{linear_trend, mean, round2};

/// Window behind the category, income, savings and goal projections
const RECENT_DAYS: i64 = 90;

/// Months in [`RECENT_DAYS`]
const RECENT_MONTHS: f64 = 3.0;

const NEXT_MONTH_CONFIDENCE: f64 = 0.75;

/// One-step-ahead forecast over chronological totals (oldest first).
///
/// Seeds with the most recent total and folds backward through older ones
/// with `forecast = alpha * older + (1 - alpha) * forecast`. Returns `None`
/// for fewer than two totals.
pub fn exponential_smoothing(totals: &[f64], alpha: f64) -> Option<f64> {
    let (&latest, older) = totals.split_last()?;
    if older.is_empty() {
        return None;
    }
    Some(
        older
            .iter()
            .rev()
            .fold(latest, |forecast, &value| alpha * value + (1.0 - alpha) * forecast),
    )
}

/// Average of `amounts` with a repeating seasonal uplift for each of the next
/// `months_ahead` months: month `i` (1-indexed) gets `1 + step * (i % 3)`.
pub fn moving_average_forecast(amounts: &[f64], months_ahead: u32, seasonal_step: f64) -> Vec<f64> {
    let average = mean(amounts);
    (1..=months_ahead)
        .map(|i| average * (1.0 + seasonal_step * (i % 3) as f64))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextMonthForecast {
    pub predicted_spending: f64,
    pub confidence: f64,
    pub method: String,
    pub months_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPrediction {
    /// e.g. "March 2024"
    pub month: String,
    pub predicted_expense: f64,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpenseForecast {
    pub historical_average: f64,
    pub predictions: Vec<MonthlyPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryForecast {
    pub category: String,
    pub predicted_monthly_spending: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeTrend {
    pub average_monthly_income: f64,
    pub trend: Trend,
    /// Least-squares change per month
    pub slope: f64,
    pub months_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPotential {
    pub monthly_income: f64,
    pub current_monthly_expense: f64,
    pub current_monthly_savings: f64,
    pub optimized_monthly_expense: f64,
    pub optimized_monthly_savings: f64,
    pub potential_savings_increase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCompletion {
    pub goal_title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub amount_remaining: f64,
    pub monthly_savings_rate: f64,
    pub months_needed: f64,
    pub predicted_completion_date: String,
    pub deadline: String,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpendingForecast {
    /// Category → predicted monthly amount, highest first
    #[serde(serialize_with = "ordered_map")]
    pub predicted_spending_by_category: Vec<(String, f64)>,
    pub total_predicted_spending: f64,
}

/// Forecasts over one user's history
pub struct ForecastEngine<'a> {
    ctx: AnalysisContext<'a>,
    config: ForecastConfig,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(ctx: AnalysisContext<'a>) -> Self {
        Self::with_config(ctx, ForecastConfig::default())
    }

    pub fn with_config(ctx: AnalysisContext<'a>, config: ForecastConfig) -> Self {
        Self { ctx, config }
    }

    /// Chronological monthly expense totals over the forecast lookback, along
    /// with the number of records behind them
    fn monthly_expense_totals(&self) -> (Vec<f64>, usize) {
        let history = self.ctx.recent_expenses(self.config.lookback_days);
        let totals = group_by_month(history.iter().copied())
            .into_values()
            .collect();
        (totals, history.len())
    }

    /// Next month's spending by exponential smoothing
    pub fn predict_next_month_spending(&self) -> Analysis<NextMonthForecast> {
        let (totals, count) = self.monthly_expense_totals();
        if count < self.config.min_samples {
            return Analysis::insufficient_data("Need at least 6 months of data");
        }

        let Some(forecast) = exponential_smoothing(&totals, self.config.smoothing_alpha) else {
            return Analysis::insufficient_data("Need at least 2 months of data");
        };

        debug!(months = totals.len(), forecast, "Next month forecast");
        Analysis::success(NextMonthForecast {
            predicted_spending: round2(forecast),
            confidence: NEXT_MONTH_CONFIDENCE,
            method: "exponential_smoothing".to_string(),
            months_analyzed: totals.len(),
        })
    }

    pub fn predict_monthly_expenses(&self, months_ahead: u32) -> Analysis<MonthlyExpenseForecast> {
        let (totals, count) = self.monthly_expense_totals();
        if count < self.config.min_samples {
            return Analysis::warning("Insufficient historical data for accurate prediction")
                .with_recommendation("Track expenses for at least 6 months");
        }

        let average = mean(&totals);
        let predictions = moving_average_forecast(&totals, months_ahead, self.config.seasonal_step)
            .into_iter()
            .zip(1..)
            .map(|(amount, i): (f64, i64)| MonthlyPrediction {
                month: (self.ctx.now + Duration::days(30 * i))
                    .format("%B %Y")
                    .to_string(),
                predicted_expense: round2(amount),
                confidence: "medium".to_string(),
            })
            .collect();

        Analysis::success(MonthlyExpenseForecast {
            historical_average: round2(average),
            predictions,
        })
        .with_recommendation("Use these predictions to plan your budget for upcoming months")
    }

    pub fn predict_category_spending(&self, category: &str) -> Analysis<CategoryForecast> {
        let records: Vec<_> = self
            .ctx
            .recent_expenses(RECENT_DAYS)
            .into_iter()
            .filter(|t| t.category == category)
            .collect();

        if records.is_empty() {
            return Analysis::no_data(format!(
                "No {} expenses in the last {} days",
                category, RECENT_DAYS
            ));
        }

        let total: f64 = records.iter().map(|t| t.amount).sum();
        Analysis::success(CategoryForecast {
            category: category.to_string(),
            predicted_monthly_spending: round2(total / RECENT_MONTHS),
            transaction_count: records.len(),
        })
    }

    pub fn predict_income_trend(&self) -> Analysis<IncomeTrend> {
        let income = self.ctx.recent(TransactionKind::Income, RECENT_DAYS);
        if income.is_empty() {
            return Analysis::no_data("No income recorded in the last 90 days");
        }

        let totals: Vec<f64> = group_by_month(income.iter().copied()).into_values().collect();
        let trend = match (totals.first(), totals.last()) {
            (Some(first), Some(last)) if totals.len() >= 2 && last > first => Trend::Increasing,
            (Some(first), Some(last)) if totals.len() >= 2 && last < first => Trend::Decreasing,
            _ => Trend::Stable,
        };

        Analysis::success(IncomeTrend {
            average_monthly_income: round2(mean(&totals)),
            trend,
            slope: round2(linear_trend(&totals)),
            months_analyzed: totals.len(),
        })
    }

    pub fn predict_savings_potential(&self) -> Analysis<SavingsPotential> {
        let Some(profile) = self.ctx.profile else {
            return Analysis::not_found("User");
        };

        let expenses = self.ctx.recent_expenses(RECENT_DAYS);
        if expenses.is_empty() {
            return Analysis::warning("No expense data available")
                .with_recommendation("Track expenses to get savings predictions");
        }

        let monthly_expense = expenses.iter().map(|t| t.amount).sum::<f64>() / RECENT_MONTHS;
        let current_savings = profile.monthly_income - monthly_expense;
        let optimized_expense = monthly_expense * 0.9;
        let optimized_savings = profile.monthly_income - optimized_expense;
        let increase = optimized_savings - current_savings;

        Analysis::success(SavingsPotential {
            monthly_income: profile.monthly_income,
            current_monthly_expense: round2(monthly_expense),
            current_monthly_savings: round2(current_savings),
            optimized_monthly_expense: round2(optimized_expense),
            optimized_monthly_savings: round2(optimized_savings),
            potential_savings_increase: round2(increase),
        })
        .with_recommendation(format!(
            "By reducing expenses by 10%, you could save an additional ${:.2} monthly",
            increase
        ))
    }

    pub fn predict_goal_completion(&self, goal_id: i64) -> Analysis<GoalCompletion> {
        let Some(goal) = self.ctx.goal(goal_id) else {
            return Analysis::not_found("Goal");
        };

        let income: f64 = self
            .ctx
            .recent(TransactionKind::Income, RECENT_DAYS)
            .iter()
            .map(|t| t.amount)
            .sum();
        let expenses: f64 = self
            .ctx
            .recent_expenses(RECENT_DAYS)
            .iter()
            .map(|t| t.amount)
            .sum();
        let monthly_savings = if income > 0.0 {
            (income - expenses) / RECENT_MONTHS
        } else {
            0.0
        };

        if monthly_savings <= 0.0 {
            return Analysis::warning("Negative or zero savings rate")
                .with_recommendation("Increase income or reduce expenses to achieve this goal");
        }

        let remaining = goal.remaining();
        let months_needed = remaining / monthly_savings;
        let days_until_deadline = (goal.deadline - self.ctx.now).num_days();
        let on_track = months_needed * 30.0 <= days_until_deadline as f64;

        let recommendation = if on_track {
            format!(
                "On track! Goal will be completed in approximately {:.1} months.",
                months_needed
            )
        } else {
            "Behind schedule. Increase monthly savings to meet deadline.".to_string()
        };

        Analysis::success(GoalCompletion {
            goal_title: goal.title.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            amount_remaining: round2(remaining),
            monthly_savings_rate: round2(monthly_savings),
            months_needed: round2(months_needed),
            predicted_completion_date: completion_date(self.ctx.now, months_needed),
            deadline: goal.deadline.format("%B %d, %Y").to_string(),
            on_track,
        })
        .with_recommendation(recommendation)
    }

    /// Next month's spending per category from the last 90 days
    pub fn predict_spending_by_category(&self) -> Analysis<CategorySpendingForecast> {
        let expenses = self.ctx.recent_expenses(RECENT_DAYS);
        if expenses.is_empty() {
            return Analysis::warning("No expense data available")
                .with_recommendation("Track expenses to get category predictions");
        }

        let predictions: Vec<(String, f64)> = category_totals(expenses.iter().copied())
            .into_iter()
            .map(|c| (c.category, round2(c.total / RECENT_MONTHS)))
            .collect();
        let total = predictions.iter().map(|(_, amount)| amount).sum::<f64>();

        Analysis::success(CategorySpendingForecast {
            predicted_spending_by_category: predictions,
            total_predicted_spending: round2(total),
        })
        .with_recommendation("Use these predictions to set category budgets")
    }
}

/// `now` plus `months` thirty-day months, formatted for display
fn completion_date(now: NaiveDateTime, months: f64) -> String {
    // Far beyond any deadline; keeps the addition in range
    let seconds = (months.max(0.0) * 30.0 * 86_400.0).min(1.0e11) as i64;
    now.checked_add_signed(Duration::seconds(seconds))
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|| "Not within a foreseeable date".to_string())
}
