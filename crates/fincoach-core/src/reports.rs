//! Dashboard and trend reports

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::aggregate::{category_totals, total_by_kind, within};
use crate::analysis::{ordered_map, Analysis};
use crate::context::AnalysisContext;
use crate::models::{GoalProgress, Transaction, TransactionKind};
use crate::stats::{mean, percentage_of, round2};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTotals {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub total_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// e.g. "June 2024"
    pub period: String,
    pub summary: DashboardTotals,
    #[serde(serialize_with = "ordered_map")]
    pub category_breakdown: Vec<(String, f64)>,
    pub goals_progress: Vec<GoalProgress>,
    pub transaction_count: usize,
    pub goals_count: usize,
    pub jars_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrend {
    pub month: String,
    pub total_expense: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingTrends {
    /// Oldest month first
    pub trends: Vec<MonthTrend>,
    pub average_monthly_expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAnalysis {
    pub period: String,
    pub total_expense: f64,
    #[serde(serialize_with = "ordered_map")]
    pub categories: Vec<(String, CategoryStats)>,
}

/// Income, expense and net over any record set
pub fn transaction_summary<'a, I>(records: I) -> TransactionSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let records: Vec<&Transaction> = records.into_iter().collect();
    let income = total_by_kind(records.iter().copied(), TransactionKind::Income);
    let expense = total_by_kind(records.iter().copied(), TransactionKind::Expense);
    TransactionSummary {
        total_income: round2(income),
        total_expense: round2(expense),
        net_balance: round2(income - expense),
        transaction_count: records.len(),
    }
}

fn period_label(ctx: &AnalysisContext<'_>) -> String {
    ctx.month_start().format("%B %Y").to_string()
}

/// Current calendar month at a glance
pub fn dashboard(ctx: &AnalysisContext<'_>) -> Analysis<Dashboard> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let month = ctx.current_month();
    let totals = transaction_summary(month.iter().copied());
    let breakdown = category_totals(month.iter().copied().filter(|t| t.is_expense()))
        .into_iter()
        .map(|c| (c.category, round2(c.total)))
        .collect();

    Analysis::success(Dashboard {
        period: period_label(ctx),
        summary: DashboardTotals {
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            net_balance: totals.net_balance,
            total_saved: round2(ctx.total_saved()),
        },
        category_breakdown: breakdown,
        goals_progress: ctx.goals.iter().map(|g| g.progress(ctx.now)).collect(),
        transaction_count: month.len(),
        goals_count: ctx.goals.len(),
        jars_count: ctx.jars.len(),
    })
}

fn month_bounds(start: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let next = start.checked_add_months(Months::new(1))?;
    Some((start.and_hms_opt(0, 0, 0)?, next.and_hms_opt(0, 0, 0)?))
}

/// Expense totals for the last `months` calendar months, including the
/// current one
pub fn spending_trends(ctx: &AnalysisContext<'_>, months: u32) -> Analysis<SpendingTrends> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let expenses = ctx.expenses();
    let current = ctx.month_start().date();
    let mut trends = Vec::with_capacity(months as usize);

    for i in (0..months).rev() {
        let Some(start) = current.checked_sub_months(Months::new(i)) else {
            continue;
        };
        let Some((since, until)) = month_bounds(start) else {
            continue;
        };
        let records = within(expenses.iter().copied(), since, until);
        trends.push(MonthTrend {
            month: start.format("%B %Y").to_string(),
            total_expense: round2(records.iter().map(|t| t.amount).sum()),
            transaction_count: records.len(),
        });
    }

    let totals: Vec<f64> = trends.iter().map(|t| t.total_expense).collect();
    Analysis::success(SpendingTrends {
        average_monthly_expense: round2(mean(&totals)),
        trends,
    })
}

/// Current calendar month expenses per category
pub fn category_analysis(ctx: &AnalysisContext<'_>) -> Analysis<CategoryAnalysis> {
    if ctx.profile.is_none() {
        return Analysis::not_found("User");
    }

    let month = ctx.current_month();
    let totals = category_totals(month.into_iter().filter(|t| t.is_expense()));
    let total_expense: f64 = totals.iter().map(|c| c.total).sum();

    let categories = totals
        .into_iter()
        .map(|c| {
            let stats = CategoryStats {
                total: round2(c.total),
                count: c.count,
                average: round2(c.total / c.count as f64),
                percentage: round2(percentage_of(c.total, total_expense)),
            };
            (c.category, stats)
        })
        .collect();

    Analysis::success(CategoryAnalysis {
        period: period_label(ctx),
        total_expense: round2(total_expense),
        categories,
    })
}
