//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (Session, resolve_now, print_analysis)
//! - `categorize` - Keyword categorization (single, batch, suggest)
//! - `import` - CSV import and bank SMS parsing
//! - `forecast` - Spending, income, savings and goal forecasts
//! - `anomaly` - Unusual amounts, spikes, patterns, duplicates
//! - `advise` - Spending analysis, budget, allocation, health scores
//! - `risk` - Emergency fund, expense ratio, goal feasibility, volatility
//! - `coach` - Tips, weekly summary, action plan, motivation
//! - `reports` - Dashboard, trends, category analysis
//! - `insights` - Alert findings from all registered checks

pub mod advise;
pub mod anomaly;
pub mod categorize;
pub mod coach;
pub mod core;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod reports;
pub mod risk;

// Re-export command functions for main.rs
pub use advise::*;
pub use anomaly::*;
pub use categorize::*;
pub use coach::*;
pub use core::*;
pub use forecast::*;
pub use import::*;
pub use insights::*;
pub use reports::*;
pub use risk::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
