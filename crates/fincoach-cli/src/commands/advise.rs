//! Advisor command implementations (spending, budget, allocation, health)

use anyhow::Result;
use fincoach_core::advisor;

use super::{money, print_analysis, Session};

pub fn cmd_advise_spending(session: &Session) -> Result<()> {
    let result = advisor::analyze_spending(&session.ctx());
    print_analysis(session.json, "💸 Spending Analysis", &result, |s| {
        println!(
            "   Total: {} across {} transactions",
            money(s.total_expenses),
            s.transaction_count
        );
        println!();
        for (category, amount) in &s.category_breakdown {
            println!("   {:<20} {:>12}", category, money(*amount));
        }
    })
}

pub fn cmd_advise_budget(session: &Session) -> Result<()> {
    let result = advisor::budget_recommendations(&session.ctx());
    print_analysis(session.json, "📋 Budget Recommendations", &result, |b| {
        println!("   Income:       {:>12}", money(b.monthly_income));
        println!("   Expenses:     {:>12}", money(b.total_expenses));
        println!("   Savings rate: {:>11.1}%", b.savings_rate);
        if !b.recommendations.is_empty() {
            println!();
        }
        for r in &b.recommendations {
            println!("   [{}] {}", r.priority.as_str(), r.message);
            println!("          → {}", r.action);
        }
    })
}

pub fn cmd_advise_allocation(session: &Session) -> Result<()> {
    let result = advisor::suggest_allocation(&session.ctx());
    print_analysis(session.json, "🧮 Suggested Allocation", &result, |a| {
        println!("   Rule: {}", a.allocation_rule);
        println!("   Needs:   {:>12}  {}", money(a.needs), a.description.needs);
        println!("   Wants:   {:>12}  {}", money(a.wants), a.description.wants);
        println!("   Savings: {:>12}  {}", money(a.savings), a.description.savings);
    })
}

pub fn cmd_advise_health(session: &Session) -> Result<()> {
    let result = advisor::agent_health_score(&session.ctx());
    print_analysis(session.json, "❤️  Financial Health", &result, |h| {
        println!(
            "   Score: {}/100 ({})",
            h.financial_health_score,
            h.rating.as_str()
        );
        let f = &h.factors;
        for (name, points) in [
            ("Budget tracking", f.budget_tracking),
            ("Income stability", f.income_stability),
            ("Active goals", f.active_goals),
            ("Savings jars", f.savings_jars),
            ("Spending discipline", f.spending_discipline),
        ] {
            if let Some(points) = points {
                println!("   ✓ {:<20} +{}", name, points);
            }
        }
        for r in &h.recommendations {
            println!("   • {}", r);
        }
    })
}

pub fn cmd_advise_analytics_health(session: &Session) -> Result<()> {
    let result = advisor::analytics_health_score(&session.ctx());
    print_analysis(session.json, "❤️  Health Metrics", &result, |h| {
        println!(
            "   Score: {:.0}/100 ({})",
            h.health_score,
            h.health_status.as_str()
        );
        let m = &h.metrics;
        println!("   Savings rate:  {:>8.1}%", m.savings_rate);
        println!("   Expense ratio: {:>8.1}%", m.expense_ratio);
        println!("   Total saved:   {:>12}", money(m.total_saved));
        println!("   Goals: {}/{} completed, {} jars", m.goals_completed, m.total_goals, m.jars_count);
    })
}
