//! Report command implementations (dashboard, trends, categories)

use anyhow::Result;
use fincoach_core::reports;

use super::{money, print_analysis, Session, RULE};

pub fn cmd_report_dashboard(session: &Session) -> Result<()> {
    let result = reports::dashboard(&session.ctx());
    print_analysis(session.json, "📊 Dashboard", &result, |d| {
        println!("   Period: {}", d.period);
        println!("   Income:      {:>12}", money(d.summary.total_income));
        println!("   Expenses:    {:>12}", money(d.summary.total_expense));
        println!("   Net:         {:>12}", money(d.summary.net_balance));
        println!("   Saved (all): {:>12}", money(d.summary.total_saved));

        if !d.category_breakdown.is_empty() {
            println!();
            println!("   Spending by category");
            println!("{}", RULE);
            for (category, amount) in &d.category_breakdown {
                println!("   {:<20} {:>12}", category, money(*amount));
            }
        }

        if !d.goals_progress.is_empty() {
            println!();
            println!("   Goals");
            println!("{}", RULE);
            for g in &d.goals_progress {
                println!(
                    "   {:<24} {:>5.1}%  {} left, {} days ({})",
                    g.title,
                    g.progress_percentage,
                    money(g.remaining_amount),
                    g.days_remaining,
                    g.status.as_str()
                );
            }
        }

        println!();
        println!(
            "   {} transactions this month · {} goals · {} jars",
            d.transaction_count, d.goals_count, d.jars_count
        );
    })
}

pub fn cmd_report_trends(session: &Session, months: u32) -> Result<()> {
    let result = reports::spending_trends(&session.ctx(), months);
    print_analysis(session.json, "📉 Spending Trends", &result, |t| {
        for m in &t.trends {
            println!(
                "   {:<10} {:>12}  ({} transactions)",
                m.month,
                money(m.total_expense),
                m.transaction_count
            );
        }
        println!("{}", RULE);
        println!("   {:<10} {:>12}", "Average", money(t.average_monthly_expense));
    })
}

pub fn cmd_report_categories(session: &Session) -> Result<()> {
    let result = reports::category_analysis(&session.ctx());
    print_analysis(session.json, "🗂️  Category Analysis", &result, |c| {
        println!("   Period: {} · total {}", c.period, money(c.total_expense));
        println!();
        println!(
            "   {:<18} {:>12} {:>6} {:>12} {:>7}",
            "Category", "Total", "Count", "Average", "Share"
        );
        println!("{}", RULE);
        for (category, s) in &c.categories {
            println!(
                "   {:<18} {:>12} {:>6} {:>12} {:>6.1}%",
                category,
                money(s.total),
                s.count,
                money(s.average),
                s.percentage
            );
        }
    })
}
