//! Insight Engine - proactive financial alerts
//!
//! Runs a set of analyzers over one [`AnalysisContext`] and turns whatever
//! they find worth mentioning into [`Finding`]s, most severe first.
//!
//! ## Built-in analyzers
//!
//! - **Spending Spike** - this month against the recent baseline
//! - **Spending Patterns** - small, late-night and weekend purchases
//! - **Emergency Fund** - savings coverage of monthly expenses
//! - **Debt to Income** - recent expenses against profile income
//! - **Goal Deadlines** - active goals at risk or already overdue
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fincoach_core::insights::InsightEngine;
//!
//! let ctx = AnalysisContext::from_snapshot(&snapshot, now);
//! let findings = InsightEngine::new().analyze_all(&ctx);
//! ```
//!
//! [`AnalysisContext`]: crate::context::AnalysisContext

pub mod engine;
pub mod goals;
pub mod safety;
pub mod spending;
pub mod types;

pub use engine::{Insight, InsightEngine};
pub use goals::GoalDeadlineInsight;
pub use safety::{DebtToIncomeInsight, EmergencyFundInsight};
pub use spending::{SpendingPatternInsight, SpendingSpikeInsight};
pub use types::{AlertSeverity, Finding, InsightType};
