pub mod answer;
pub mod calculator;
pub mod registry;
pub mod translator;

pub use registry::AdapterRegistry;

use crate::ai::LanguageModel;
use std::sync::Arc;

/// Create a registry with every built-in capability registered.
pub fn create_default_registry(model: Arc<dyn LanguageModel>) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(calculator::CalculatorAdapter::new()));
    registry.register(Arc::new(translator::TranslatorAdapter::new(model.clone())));
    registry.register(Arc::new(answer::AnswerAdapter::new(model)));
    registry
}
