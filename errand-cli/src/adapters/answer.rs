//! Direct-answer capability: questions that need no tool are passed
//! straight through the language model.

use crate::adapters::registry::{AdapterError, CapabilityAdapter};
use crate::ai::LanguageModel;
use crate::plan::types::{Capability, StepValue};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AnswerParams {
    question: String,
}

pub struct AnswerAdapter {
    model: Arc<dyn LanguageModel>,
}

impl AnswerAdapter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl CapabilityAdapter for AnswerAdapter {
    fn capability(&self) -> Capability {
        Capability::Answer
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<StepValue, AdapterError> {
        let params: AnswerParams = serde_json::from_value(Value::Object(arguments.clone()))
            .map_err(|e| AdapterError::InvalidArguments(e.to_string()))?;

        let question = params.question.trim();
        if question.is_empty() {
            return Err(AdapterError::InvalidArguments(
                "'question' must not be empty".to_string(),
            ));
        }

        let answer = self.model.interpret(question).await?;
        Ok(StepValue::Text(answer.trim().to_string()))
    }
}
