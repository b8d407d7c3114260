use crate::adapters::calculator::ArithmeticError;
use crate::adapters::translator::TranslationError;
use crate::ai::ModelError;
use crate::plan::types::{Capability, FailureKind, StepFailure, StepValue};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A capability call failure.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("no adapter registered for capability '{0}'")]
    Unregistered(Capability),
}

impl From<&AdapterError> for StepFailure {
    fn from(error: &AdapterError) -> Self {
        let kind = match error {
            AdapterError::InvalidArguments(_) => FailureKind::Arguments,
            AdapterError::Arithmetic(_) => FailureKind::Arithmetic,
            AdapterError::Translation(_) => FailureKind::Translation,
            AdapterError::Model(_) => FailureKind::Model,
            AdapterError::Unregistered(_) => FailureKind::Adapter,
        };
        StepFailure {
            kind,
            message: error.to_string(),
        }
    }
}

/// Uniform call interface over one capability: a typed argument bundle
/// in, a value or a typed failure out.
#[async_trait]
pub trait CapabilityAdapter: Send + Sync {
    fn capability(&self) -> Capability;

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<StepValue, AdapterError>;
}

/// Maps each capability to its adapter.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Capability, Arc<dyn CapabilityAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Arc<dyn CapabilityAdapter>) {
        let capability = adapter.capability();
        if self.adapters.insert(capability, adapter).is_some() {
            log::warn!("[ADAPTERS] Replacing adapter for capability '{}'", capability);
        }
    }

    pub fn get(&self, capability: Capability) -> Option<Arc<dyn CapabilityAdapter>> {
        self.adapters.get(&capability).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Dispatch one resolved argument bundle to the matching adapter.
    pub async fn execute(
        &self,
        capability: Capability,
        arguments: &Map<String, Value>,
    ) -> Result<StepValue, AdapterError> {
        let adapter = self
            .get(capability)
            .ok_or(AdapterError::Unregistered(capability))?;
        adapter.execute(arguments).await
    }
}
