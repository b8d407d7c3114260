//! Turns a raw utterance into a validated Plan via the language model.

use crate::ai::{LanguageModel, ModelError};
use crate::plan::resolver::placeholder_pattern;
use crate::plan::types::{Capability, Plan, SubTask};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const DECOMPOSE_PROMPT: &str = include_str!("prompts/decompose.md");

#[derive(Debug, Error)]
pub enum DecomposeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("could not parse plan from model response: {0}")]
    Parse(String),
    #[error("unknown capability '{capability}' in step {step}")]
    UnknownCapability { step: usize, capability: String },
    #[error("invalid dependency in step {step}: {reason}")]
    InvalidDependency { step: usize, reason: String },
}

/// Raw step shape as emitted by the model, before validation.
#[derive(Debug, Deserialize)]
struct RawStep {
    capability: String,
    #[serde(default)]
    arguments: Map<String, Value>,
    #[serde(default)]
    depends_on: Option<usize>,
}

pub struct Decomposer {
    model: Arc<dyn LanguageModel>,
    fence: Regex,
}

impl Decomposer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            fence: Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap(),
        }
    }

    /// Decompose one utterance into an ordered, validated Plan. The only
    /// side effect is the single outbound model call.
    pub async fn decompose(&self, utterance: &str) -> Result<Plan, DecomposeError> {
        let prompt = DECOMPOSE_PROMPT.replace("{utterance}", utterance);
        log::info!("[DECOMPOSE] Breaking down utterance: {}", utterance);

        let response = self.model.interpret(&prompt).await?;
        log::debug!("[DECOMPOSE] Model response: {}", response);

        let plan = self.parse_response(&response)?;
        log::info!("[DECOMPOSE] Parsed {} step(s)", plan.len());
        Ok(plan)
    }

    fn parse_response(&self, response: &str) -> Result<Plan, DecomposeError> {
        let payload = self.extract_json(response);
        let raw: Vec<RawStep> = serde_json::from_str(payload.trim())
            .map_err(|e| DecomposeError::Parse(e.to_string()))?;

        let mut steps = Vec::with_capacity(raw.len());
        for (index, raw_step) in raw.into_iter().enumerate() {
            let capability = Capability::from_str(raw_step.capability.trim()).map_err(|_| {
                DecomposeError::UnknownCapability {
                    step: index,
                    capability: raw_step.capability.clone(),
                }
            })?;

            if let Some(dep) = raw_step.depends_on {
                if dep >= index {
                    return Err(DecomposeError::InvalidDependency {
                        step: index,
                        reason: format!(
                            "depends_on {} must be strictly less than the step's own index",
                            dep
                        ),
                    });
                }
            }

            validate_placeholders(index, raw_step.depends_on, &raw_step.arguments)?;

            steps.push(SubTask {
                index,
                capability,
                arguments: raw_step.arguments,
                depends_on: raw_step.depends_on,
            });
        }

        Ok(Plan::new(steps))
    }

    /// Models tend to wrap JSON in markdown fences or prose. Take the
    /// fenced block if present, else the outermost array slice.
    fn extract_json<'a>(&self, response: &'a str) -> &'a str {
        if let Some(captures) = self.fence.captures(response) {
            if let Some(m) = captures.get(1) {
                return m.as_str();
            }
        }
        match (response.find('['), response.rfind(']')) {
            (Some(start), Some(end)) if end > start => &response[start..=end],
            _ => response,
        }
    }
}

/// Strict index-based references: every `{step:N}` must name exactly the
/// step's declared `depends_on`.
fn validate_placeholders(
    index: usize,
    depends_on: Option<usize>,
    arguments: &Map<String, Value>,
) -> Result<(), DecomposeError> {
    for slot in arguments.values() {
        let Value::String(s) = slot else { continue };
        for captures in placeholder_pattern().captures_iter(s) {
            let token = captures[0].to_string();
            let referenced: usize =
                captures[1]
                    .parse()
                    .map_err(|_| DecomposeError::InvalidDependency {
                        step: index,
                        reason: format!("placeholder '{}' does not name a step index", token),
                    })?;
            match depends_on {
                Some(dep) if dep == referenced => {}
                Some(dep) => {
                    return Err(DecomposeError::InvalidDependency {
                        step: index,
                        reason: format!(
                            "placeholder references step {} but depends_on is {}",
                            referenced, dep
                        ),
                    });
                }
                None => {
                    return Err(DecomposeError::InvalidDependency {
                        step: index,
                        reason: format!(
                            "placeholder references step {} but depends_on is not set",
                            referenced
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}
