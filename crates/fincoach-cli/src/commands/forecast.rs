//! Forecast command implementations

use anyhow::Result;
use fincoach_core::ForecastEngine;

use super::{money, print_analysis, Session};

fn engine(session: &Session) -> ForecastEngine<'_> {
    ForecastEngine::with_config(session.ctx(), session.config.forecast.clone())
}

pub fn cmd_forecast_next_month(session: &Session) -> Result<()> {
    let result = engine(session).predict_next_month_spending();
    print_analysis(session.json, "🔮 Next Month Forecast", &result, |f| {
        println!("   Predicted spending: {}", money(f.predicted_spending));
        println!(
            "   Confidence: {:.0}% ({} over {} months)",
            f.confidence * 100.0,
            f.method,
            f.months_analyzed
        );
    })
}

pub fn cmd_forecast_monthly(session: &Session, months: u32) -> Result<()> {
    let result = engine(session).predict_monthly_expenses(months);
    print_analysis(session.json, "🔮 Monthly Expense Forecast", &result, |f| {
        println!("   Historical average: {}", money(f.historical_average));
        println!();
        for p in &f.predictions {
            println!("   {:<16} {:>12}", p.month, money(p.predicted_expense));
        }
    })
}

pub fn cmd_forecast_category(session: &Session, category: &str) -> Result<()> {
    let result = engine(session).predict_category_spending(category);
    print_analysis(session.json, "🔮 Category Forecast", &result, |f| {
        println!(
            "   {}: {} per month ({} transactions)",
            f.category,
            money(f.predicted_monthly_spending),
            f.transaction_count
        );
    })
}

pub fn cmd_forecast_income(session: &Session) -> Result<()> {
    let result = engine(session).predict_income_trend();
    print_analysis(session.json, "📈 Income Trend", &result, |t| {
        println!("   Average monthly income: {}", money(t.average_monthly_income));
        println!(
            "   Trend: {} ({:+.2}/month over {} months)",
            t.trend.as_str(),
            t.slope,
            t.months_analyzed
        );
    })
}

pub fn cmd_forecast_savings(session: &Session) -> Result<()> {
    let result = engine(session).predict_savings_potential();
    print_analysis(session.json, "💰 Savings Potential", &result, |s| {
        println!("   Income:            {:>12}", money(s.monthly_income));
        println!("   Current expenses:  {:>12}", money(s.current_monthly_expense));
        println!("   Current savings:   {:>12}", money(s.current_monthly_savings));
        println!("   With 10% less:     {:>12}", money(s.optimized_monthly_savings));
    })
}

pub fn cmd_forecast_goal(session: &Session, id: i64) -> Result<()> {
    let result = engine(session).predict_goal_completion(id);
    print_analysis(session.json, "🎯 Goal Completion", &result, |g| {
        println!("   {}", g.goal_title);
        println!(
            "   {} of {} saved, {} to go",
            money(g.current_amount),
            money(g.target_amount),
            money(g.amount_remaining)
        );
        println!(
            "   Saving {} a month → {} ({:.1} months)",
            money(g.monthly_savings_rate),
            g.predicted_completion_date,
            g.months_needed
        );
        let marker = if g.on_track { "✅" } else { "⚠️ " };
        println!("   {} Deadline: {}", marker, g.deadline);
    })
}

pub fn cmd_forecast_by_category(session: &Session) -> Result<()> {
    let result = engine(session).predict_spending_by_category();
    print_analysis(session.json, "🔮 Next Month by Category", &result, |f| {
        for (category, amount) in &f.predicted_spending_by_category {
            println!("   {:<20} {:>12}", category, money(*amount));
        }
        println!("   {:<20} {:>12}", "Total", money(f.total_predicted_spending));
    })
}
