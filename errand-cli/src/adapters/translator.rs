//! Translation capability backed by the language model.
//!
//! Supported target languages are loaded from config/languages.ron at
//! startup.

use crate::adapters::registry::{AdapterError, CapabilityAdapter};
use crate::ai::LanguageModel;
use crate::plan::types::{Capability, StepValue};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Global language list (loaded once at startup)
static LANGUAGES: OnceLock<Vec<String>> = OnceLock::new();

pub const DEFAULT_TARGET_LANGUAGE: &str = "German";

/// Load supported languages from the config directory. Panics if the
/// config file is missing or invalid.
pub fn load_languages(config_dir: &Path) {
    let path = config_dir.join("languages.ron");

    if !path.exists() {
        panic!("[translator] Config file not found: {:?}", path);
    }

    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("[translator] Failed to read {:?}: {}", path, e));

    let languages: Vec<String> = ron::from_str(&content)
        .unwrap_or_else(|e| panic!("[translator] Failed to parse {:?}: {}", path, e));

    log::info!(
        "[translator] Loaded {} supported languages from {:?}",
        languages.len(),
        path
    );

    let _ = LANGUAGES.set(languages);
}

fn supported_languages() -> &'static [String] {
    LANGUAGES
        .get()
        .expect("[translator] Language config not loaded - call load_languages() first")
}

/// Case-insensitive membership check against the configured list.
pub fn is_supported(language: &str) -> bool {
    supported_languages()
        .iter()
        .any(|l| l.eq_ignore_ascii_case(language.trim()))
}

#[derive(Debug, Error, PartialEq)]
pub enum TranslationError {
    #[error("cannot translate empty text")]
    EmptyText,
    #[error("unsupported target language: '{0}'")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Deserialize)]
struct TranslateParams {
    text: String,
    #[serde(default = "default_target")]
    target_language: String,
}

fn default_target() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

pub struct TranslatorAdapter {
    model: Arc<dyn LanguageModel>,
}

impl TranslatorAdapter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Wording that keeps the model from wrapping the translation in
    /// commentary.
    fn build_prompt(text: &str, target_language: &str) -> String {
        format!(
            "Translate the following English text to {target}.\n\
             Provide only the {target} translation, nothing else.\n\n\
             English: \"{text}\"\n{target}:",
            target = target_language,
            text = text
        )
    }
}

#[async_trait]
impl CapabilityAdapter for TranslatorAdapter {
    fn capability(&self) -> Capability {
        Capability::Translate
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<StepValue, AdapterError> {
        let params: TranslateParams = serde_json::from_value(Value::Object(arguments.clone()))
            .map_err(|e| AdapterError::InvalidArguments(e.to_string()))?;

        let text = params
            .text
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        if text.is_empty() {
            return Err(TranslationError::EmptyText.into());
        }

        let target = params.target_language.trim();
        if !is_supported(target) {
            return Err(TranslationError::UnsupportedLanguage(target.to_string()).into());
        }

        let prompt = Self::build_prompt(&text, target);
        let translation = self.model.interpret(&prompt).await?;
        let translation = translation
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();

        log::debug!(
            "[TRANSLATE] '{}' -> {} ({} chars)",
            text,
            target,
            translation.len()
        );
        Ok(StepValue::Text(translation))
    }
}
