//! Incremental placeholder resolution against earlier step outcomes.
//!
//! Invoked by the orchestrator one step at a time, never over the whole
//! plan at once: a step's `{step:N}` tokens can only be filled after
//! step N has produced an outcome.

use crate::plan::types::{
    FailureKind, ResolvedSubTask, StepFailure, StepOutcome, SubTask,
};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DependencyError {
    #[error("dependency failed: step {step} did not produce a value")]
    UpstreamFailed { step: usize },
    #[error("no outcome recorded yet for step {step}")]
    MissingOutcome { step: usize },
    #[error("unresolved placeholder '{token}'")]
    UnresolvedPlaceholder { token: String },
}

impl From<&DependencyError> for StepFailure {
    fn from(error: &DependencyError) -> Self {
        StepFailure {
            kind: FailureKind::Dependency,
            message: error.to_string(),
        }
    }
}

/// `{step:N}` reference to an earlier step's result.
pub fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{step:(\d+)\}").unwrap())
}

/// Substitute the step's placeholders with the literal value produced by
/// its `depends_on` step. Pure value substitution; the plan is never
/// re-interpreted.
pub fn resolve(
    step: &SubTask,
    outcomes: &[StepOutcome],
) -> Result<ResolvedSubTask, DependencyError> {
    let substitution = match step.depends_on {
        Some(dep) => {
            let outcome = outcomes
                .iter()
                .find(|o| o.index == dep)
                .ok_or(DependencyError::MissingOutcome { step: dep })?;
            match &outcome.value {
                Some(value) if outcome.is_ok() => Some((dep, value.clone())),
                _ => return Err(DependencyError::UpstreamFailed { step: dep }),
            }
        }
        None => None,
    };

    let mut arguments = step.arguments.clone();
    if let Some((dep, value)) = &substitution {
        let token = format!("{{step:{}}}", dep);
        for slot in arguments.values_mut() {
            let Value::String(s) = slot else { continue };
            if s.as_str() == token {
                // Whole-token argument keeps the native type so chained
                // calculations stay numeric
                *slot = Value::from(value);
            } else if s.contains(&token) {
                *slot = Value::String(s.replace(&token, &value.to_string()));
            }
        }
    }

    // No placeholder may survive resolution
    for slot in arguments.values() {
        let Value::String(s) = slot else { continue };
        if let Some(m) = placeholder_pattern().find(s) {
            return Err(DependencyError::UnresolvedPlaceholder {
                token: m.as_str().to_string(),
            });
        }
    }

    Ok(ResolvedSubTask {
        index: step.index,
        capability: step.capability,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::types::{Capability, StepValue};

    fn step(index: usize, depends_on: Option<usize>, args: serde_json::Value) -> SubTask {
        let Value::Object(arguments) = args else { unreachable!() };
        SubTask {
            index,
            capability: Capability::Calculate,
            arguments,
            depends_on,
        }
    }

    #[test]
    fn test_whole_token_keeps_native_type() {
        let outcomes = vec![StepOutcome::ok(0, StepValue::Number(30.0))];
        let subtask = step(
            1,
            Some(0),
            serde_json::json!({"op": "add", "a": "{step:0}", "b": 5}),
        );

        let resolved = resolve(&subtask, &outcomes).unwrap();
        assert_eq!(resolved.arguments.get("a").unwrap(), &serde_json::json!(30.0));
    }

    #[test]
    fn test_embedded_token_substitutes_textually() {
        let outcomes = vec![StepOutcome::ok(0, StepValue::Text("Rome".to_string()))];
        let subtask = step(
            1,
            Some(0),
            serde_json::json!({"question": "How many people live in {step:0}?"}),
        );

        let resolved = resolve(&subtask, &outcomes).unwrap();
        assert_eq!(
            resolved.arguments.get("question").unwrap(),
            &serde_json::json!("How many people live in Rome?")
        );
    }

    #[test]
    fn test_embedded_number_renders_without_decimal() {
        let outcomes = vec![StepOutcome::ok(0, StepValue::Number(144.0))];
        let subtask = step(
            1,
            Some(0),
            serde_json::json!({"text": "the result is {step:0}"}),
        );

        let resolved = resolve(&subtask, &outcomes).unwrap();
        assert_eq!(
            resolved.arguments.get("text").unwrap(),
            &serde_json::json!("the result is 144")
        );
    }

    #[test]
    fn test_failed_dependency_blocks_resolution() {
        let outcomes = vec![StepOutcome::failed(
            0,
            StepFailure {
                kind: FailureKind::Arithmetic,
                message: "division by zero".to_string(),
            },
        )];
        let subtask = step(1, Some(0), serde_json::json!({"a": "{step:0}"}));

        let error = resolve(&subtask, &outcomes).unwrap_err();
        assert_eq!(error, DependencyError::UpstreamFailed { step: 0 });
        assert_eq!(StepFailure::from(&error).kind, FailureKind::Dependency);
    }

    #[test]
    fn test_missing_outcome_is_an_error() {
        let subtask = step(1, Some(0), serde_json::json!({"a": "{step:0}"}));
        assert_eq!(
            resolve(&subtask, &[]).unwrap_err(),
            DependencyError::MissingOutcome { step: 0 }
        );
    }

    #[test]
    fn test_leftover_placeholder_is_rejected() {
        // Token present but no depends_on: nothing substitutes it
        let subtask = step(1, None, serde_json::json!({"a": "{step:0}"}));
        assert_eq!(
            resolve(&subtask, &[]).unwrap_err(),
            DependencyError::UnresolvedPlaceholder {
                token: "{step:0}".to_string()
            }
        );
    }

    #[test]
    fn test_no_dependency_passes_through() {
        let subtask = step(0, None, serde_json::json!({"op": "add", "a": 1, "b": 2}));
        let resolved = resolve(&subtask, &[]).unwrap();
        assert_eq!(resolved.arguments, subtask.arguments);
    }
}
