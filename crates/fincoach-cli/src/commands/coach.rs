//! Coaching command implementations (tips, weekly, plan, motivation)

use anyhow::Result;
use fincoach_core::coach::{self, PlannedAction};

use super::{money, print_analysis, Session};

pub fn cmd_coach_tips(session: &Session) -> Result<()> {
    let result = coach::daily_tips(&session.ctx());
    print_analysis(session.json, "💬 Today's Tips", &result, |t| {
        for tip in &t.tips {
            println!("   [{}] {}: {}", tip.priority.as_str(), tip.category, tip.tip);
        }
    })
}

pub fn cmd_coach_weekly(session: &Session) -> Result<()> {
    let result = coach::weekly_summary(&session.ctx());
    print_analysis(session.json, "🗓️  Weekly Summary", &result, |w| {
        println!("   Week ending {}", w.week_ending);
        println!("   Income:   {:>12}", money(w.weekly_income));
        println!("   Expenses: {:>12}", money(w.weekly_expenses));
        println!("   Saved:    {:>12}", money(w.weekly_savings));
        if !w.top_spending_categories.is_empty() {
            println!();
            println!("   Top categories:");
            for c in &w.top_spending_categories {
                println!("     {:<18} {:>12}", c.category, money(c.amount));
            }
        }
        for insight in &w.insights {
            println!("   • {}", insight);
        }
    })
}

fn print_actions(label: &str, actions: &[PlannedAction]) {
    if actions.is_empty() {
        return;
    }
    println!("   {}:", label);
    for a in actions {
        println!("     • {} ({})", a.action, a.target);
        println!("       {}", a.reason);
    }
}

pub fn cmd_coach_plan(session: &Session) -> Result<()> {
    let result = coach::action_plan(&session.ctx());
    print_analysis(session.json, "🗺️  Action Plan", &result, |r| {
        let plan = &r.action_plan;
        print_actions("Now", &plan.immediate_actions);
        print_actions("Next few months", &plan.short_term_actions);
        print_actions("Long term", &plan.long_term_actions);
        println!("   {} actions in total", r.total_actions);
    })
}

pub fn cmd_coach_motivation(session: &Session) -> Result<()> {
    let result = coach::motivation(&session.ctx());
    print_analysis(session.json, "🚀 Motivation", &result, |m| {
        println!("   Level: {}", m.motivation_level.as_str());
    })
}
