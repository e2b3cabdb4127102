//! Goal deadline insight - active goals the current surplus cannot reach

use crate::context::AnalysisContext;
use crate::models::Goal;
use crate::risk::{assess_goal, Feasibility};

use super::engine::Insight;
use super::types::{AlertSeverity, Finding, InsightType};

pub struct GoalDeadlineInsight;

/// `goal:<id>`, with a 1-based ordinal appended when several goals share the id
fn goal_key(goals: &[Goal], index: usize) -> String {
    let id = goals[index].id;
    if goals.iter().filter(|g| g.id == id).count() < 2 {
        return format!("goal:{}", id);
    }
    let ordinal = goals[..=index].iter().filter(|g| g.id == id).count();
    format!("goal:{}#{}", id, ordinal)
}

impl Insight for GoalDeadlineInsight {
    fn id(&self) -> InsightType {
        InsightType::GoalDeadline
    }

    fn name(&self) -> &'static str {
        "Goal Deadlines"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, goal) in ctx.goals.iter().enumerate() {
            if !goal.is_active() {
                continue;
            }
            let result = assess_goal(ctx, goal);
            let key = goal_key(ctx.goals, index);

            let Some(assessment) = result.data() else {
                continue;
            };

            let finding = match assessment.feasibility {
                Feasibility::Impossible => Finding::new(
                    self.id(),
                    key,
                    AlertSeverity::Error,
                    "Goal deadline passed",
                    format!("\"{}\" is past its deadline", goal.title),
                    ctx.now,
                )
                .with_recommendation("Extend the deadline or close the goal"),
                Feasibility::Challenging => {
                    let mut finding = Finding::new(
                        self.id(),
                        key,
                        AlertSeverity::Warning,
                        "Goal at risk",
                        format!(
                            "\"{}\" needs more than your current monthly surplus",
                            goal.title
                        ),
                        ctx.now,
                    )
                    .with_data(serde_json::to_value(assessment).unwrap_or_default());
                    if let Some(rec) = &result.recommendation {
                        finding = finding.with_recommendation(rec.clone());
                    }
                    finding
                }
                Feasibility::Achieved | Feasibility::Feasible => continue,
            };
            findings.push(finding);
        }

        findings
    }
}
