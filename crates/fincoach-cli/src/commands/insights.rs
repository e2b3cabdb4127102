//! Insights command: run every registered check and list the findings

use anyhow::Result;
use fincoach_core::{AlertSeverity, InsightEngine};
use tracing::info;

use super::{print_json, Session, RULE};

fn severity_icon(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Info => "ℹ️ ",
        AlertSeverity::Warning => "⚠️ ",
        AlertSeverity::Error => "❌",
        AlertSeverity::Critical => "🚨",
    }
}

pub fn cmd_insights(session: &Session) -> Result<()> {
    let engine = InsightEngine::with_config(session.config.detection.clone());
    let findings = engine.analyze_all(&session.ctx());
    info!(checks = engine.len(), findings = findings.len(), "Insights analyzed");

    if session.json {
        return print_json(&findings);
    }

    println!();
    println!("🔔 Insights");
    println!("{}", RULE);

    if findings.is_empty() {
        println!("   ✅ Nothing needs your attention");
        println!();
        return Ok(());
    }

    for f in &findings {
        println!("   {} {} [{}]", severity_icon(f.severity), f.title, f.severity);
        println!("      {}", f.message);
        if let Some(recommendation) = &f.recommendation {
            println!("      💡 {}", recommendation);
        }
    }
    println!();
    Ok(())
}
