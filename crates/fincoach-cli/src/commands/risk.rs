//! Risk command implementations

use anyhow::Result;
use fincoach_core::risk;

use super::{money, print_analysis, Session};

pub fn cmd_risk_emergency_fund(session: &Session) -> Result<()> {
    let result = risk::assess_emergency_fund(&session.ctx());
    print_analysis(session.json, "🛟 Emergency Fund", &result, |e| {
        println!("   Monthly expenses: {:>12}", money(e.monthly_average_expense));
        println!("   Saved:            {:>12}", money(e.current_savings));
        println!("   Recommended:      {:>12}", money(e.recommended_emergency_fund));
        println!(
            "   Coverage: {:.1} months (risk {})",
            e.coverage_months,
            e.risk_level.as_str()
        );
    })
}

pub fn cmd_risk_debt(session: &Session) -> Result<()> {
    let result = risk::assess_debt_risk(&session.ctx());
    print_analysis(session.json, "⚖️  Expenses vs Income", &result, |d| {
        println!("   Income:   {:>12}", money(d.monthly_income));
        println!("   Expenses: {:>12}", money(d.monthly_expenses));
        println!(
            "   Ratio: {:.1}% (risk {})",
            d.debt_to_income_ratio,
            d.risk_level.as_str()
        );
    })
}

pub fn cmd_risk_goal(session: &Session, id: i64) -> Result<()> {
    let result = risk::assess_goal_feasibility(&session.ctx(), id);
    print_analysis(session.json, "🎯 Goal Feasibility", &result, |g| {
        println!("   Feasibility: {}", g.feasibility.as_str());
        if let Some(d) = &g.details {
            println!("   {}: {} remaining", d.goal_title, money(d.amount_remaining));
            println!(
                "   {} days left, needs {} a month ({} available)",
                d.days_remaining,
                money(d.required_monthly_savings),
                money(d.available_monthly_savings)
            );
        }
    })
}

pub fn cmd_risk_volatility(session: &Session) -> Result<()> {
    let result = risk::assess_spending_volatility(&session.ctx());
    print_analysis(session.json, "🌊 Spending Volatility", &result, |v| {
        println!("   Average month: {:>12}", money(v.average_monthly_spending));
        println!("   Std deviation: {:>12}", money(v.standard_deviation));
        println!(
            "   Variation: {:.1}% ({})",
            v.volatility_percentage,
            v.volatility_level.as_str()
        );
    })
}
