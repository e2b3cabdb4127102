//! Anomaly command implementations (unusual, spike, patterns, duplicate)

use anyhow::Result;
use fincoach_core::AnomalyDetector;

use super::{money, print_analysis, Session};

fn detector(session: &Session) -> AnomalyDetector<'_> {
    AnomalyDetector::with_config(session.ctx(), session.config.detection.clone())
}

pub fn cmd_anomaly_unusual(session: &Session, amount: f64, category: &str) -> Result<()> {
    let result = detector(session).detect_unusual_spending(amount, category);
    print_analysis(session.json, "🔍 Unusual Amount Check", &result, |u| {
        let marker = if u.is_anomaly { "⚠️  Unusual" } else { "✅ Normal" };
        println!("   {} for {}: {}", marker, category, money(u.transaction_amount));
        println!(
            "   Category average {} ± {} (z = {:.2}, {})",
            money(u.category_average),
            money(u.category_std_dev),
            u.z_score,
            u.severity.as_str()
        );
    })
}

pub fn cmd_anomaly_spike(session: &Session) -> Result<()> {
    let result = detector(session).detect_spending_spike();
    print_analysis(session.json, "📈 Spending Spike", &result, |s| {
        println!("   This month:         {:>12}", money(s.current_month_spending));
        println!("   Historical average: {:>12}", money(s.historical_average));
        println!("   Change:             {:>11.1}%", s.percentage_increase);
    })
}

pub fn cmd_anomaly_patterns(session: &Session) -> Result<()> {
    let result = detector(session).detect_patterns();
    print_analysis(session.json, "🧭 Spending Patterns", &result, |r| {
        if r.patterns.is_empty() {
            println!("   No unusual patterns detected");
        }
        for p in &r.patterns {
            println!("   [{}] {}", p.severity.as_str(), p.description);
            println!("          {}", p.recommendation);
        }
    })
}

pub fn cmd_anomaly_duplicate(
    session: &Session,
    amount: f64,
    category: &str,
    description: Option<&str>,
) -> Result<()> {
    let result = detector(session).detect_duplicate(amount, category, description);
    print_analysis(session.json, "🔁 Duplicate Check", &result, |d| {
        if d.is_duplicate {
            println!(
                "   ⚠️  {} similar {} transaction(s) of {} in the window",
                d.similar_transactions,
                category,
                money(amount)
            );
        } else {
            println!("   ✅ No similar transactions found");
        }
    })
}
