//! Renders an ordered outcome list into the final user-facing answer.

use crate::plan::types::{Plan, StepOutcome, StepStatus};

pub const EMPTY_PLAN_RESPONSE: &str = "No steps were produced for this request.";

/// One line per step, in index order. Failures render inline without
/// stopping composition of the steps after them. Stable: identical
/// inputs always produce identical text.
pub fn compose(plan: &Plan, outcomes: &[StepOutcome]) -> String {
    if plan.is_empty() {
        return EMPTY_PLAN_RESPONSE.to_string();
    }

    let mut lines = Vec::with_capacity(plan.len());
    for step in plan.steps() {
        let line = match outcomes.iter().find(|o| o.index == step.index) {
            Some(outcome) if outcome.status == StepStatus::Ok => {
                let value = outcome
                    .value
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                format!("✅ Step {} ({}): {}", step.index + 1, step.capability, value)
            }
            Some(outcome) => {
                let message = outcome
                    .error
                    .as_ref()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "unknown error".to_string());
                format!("❌ Step {} ({}): {}", step.index + 1, step.capability, message)
            }
            None => format!(
                "❌ Step {} ({}): no outcome recorded",
                step.index + 1,
                step.capability
            ),
        };
        lines.push(line);
    }

    lines.join("\n")
}
