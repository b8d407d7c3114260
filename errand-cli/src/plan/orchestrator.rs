//! Walks a Plan in declared index order, executing each step with
//! per-step failure isolation.

use crate::adapters::AdapterRegistry;
use crate::plan::resolver;
use crate::plan::types::{Plan, StepFailure, StepOutcome};

/// Per-step execution states, logged as the step advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepState {
    Pending,
    Resolving,
    Executing,
    Succeeded,
    Failed,
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepState::Pending => "pending",
            StepState::Resolving => "resolving",
            StepState::Executing => "executing",
            StepState::Succeeded => "succeeded",
            StepState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

pub struct Orchestrator {
    adapters: AdapterRegistry,
}

impl Orchestrator {
    pub fn new(adapters: AdapterRegistry) -> Self {
        Self { adapters }
    }

    /// Execute every step of the plan, in declared order. Each declared
    /// step yields exactly one outcome; a failed step never aborts its
    /// siblings, only the steps that depend on it.
    pub async fn run(&self, plan: &Plan) -> Vec<StepOutcome> {
        let mut outcomes: Vec<StepOutcome> = Vec::with_capacity(plan.len());

        for step in plan.steps() {
            let mut state = StepState::Pending;
            transition(step.index, &mut state, StepState::Resolving);

            let resolved = match resolver::resolve(step, &outcomes) {
                Ok(resolved) => resolved,
                Err(e) => {
                    transition(step.index, &mut state, StepState::Failed);
                    log::warn!("[ORCHESTRATOR] Step {} not executed: {}", step.index, e);
                    outcomes.push(StepOutcome::failed(step.index, StepFailure::from(&e)));
                    continue;
                }
            };

            transition(step.index, &mut state, StepState::Executing);
            match self
                .adapters
                .execute(resolved.capability, &resolved.arguments)
                .await
            {
                Ok(value) => {
                    transition(step.index, &mut state, StepState::Succeeded);
                    outcomes.push(StepOutcome::ok(step.index, value));
                }
                Err(e) => {
                    transition(step.index, &mut state, StepState::Failed);
                    log::warn!(
                        "[ORCHESTRATOR] Step {} ({}) failed: {}",
                        step.index,
                        step.capability,
                        e
                    );
                    outcomes.push(StepOutcome::failed(step.index, StepFailure::from(&e)));
                }
            }
        }

        outcomes
    }
}

fn transition(index: usize, state: &mut StepState, next: StepState) {
    log::debug!("[ORCHESTRATOR] Step {}: {} -> {}", index, state, next);
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::calculator::CalculatorAdapter;
    use crate::adapters::registry::{AdapterError, CapabilityAdapter};
    use crate::plan::types::{Capability, FailureKind, StepStatus, StepValue, SubTask};
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed value (or failure) and counts invocations.
    struct CountingAdapter {
        capability: Capability,
        value: Option<StepValue>,
        calls: AtomicUsize,
    }

    impl CountingAdapter {
        fn new(capability: Capability, value: Option<StepValue>) -> Arc<Self> {
            Arc::new(Self {
                capability,
                value,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CapabilityAdapter for CountingAdapter {
        fn capability(&self) -> Capability {
            self.capability
        }

        async fn execute(
            &self,
            _arguments: &Map<String, Value>,
        ) -> Result<StepValue, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.value {
                Some(value) => Ok(value.clone()),
                None => Err(AdapterError::InvalidArguments("stubbed failure".to_string())),
            }
        }
    }

    fn subtask(
        index: usize,
        capability: Capability,
        depends_on: Option<usize>,
        args: serde_json::Value,
    ) -> SubTask {
        let Value::Object(arguments) = args else { unreachable!() };
        SubTask {
            index,
            capability,
            arguments,
            depends_on,
        }
    }

    #[tokio::test]
    async fn test_outcomes_preserve_declared_order() {
        let mut registry = AdapterRegistry::new();
        registry.register(CountingAdapter::new(
            Capability::Answer,
            Some(StepValue::Text("Rome".to_string())),
        ));
        registry.register(CountingAdapter::new(
            Capability::Translate,
            Some(StepValue::Text("Hallo".to_string())),
        ));

        let plan = Plan::new(vec![
            subtask(0, Capability::Answer, None, serde_json::json!({"question": "q"})),
            subtask(1, Capability::Translate, None, serde_json::json!({"text": "Hello"})),
            subtask(2, Capability::Answer, None, serde_json::json!({"question": "q2"})),
        ]);

        let outcomes = Orchestrator::new(registry).run(&plan).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes.iter().map(|o| o.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(outcomes.iter().all(|o| o.status == StepStatus::Ok));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_the_failing_step() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(CalculatorAdapter::new()));
        registry.register(CountingAdapter::new(
            Capability::Answer,
            Some(StepValue::Text("Rome".to_string())),
        ));

        let plan = Plan::new(vec![
            subtask(
                0,
                Capability::Calculate,
                None,
                serde_json::json!({"op": "divide", "a": 10, "b": 0}),
            ),
            subtask(1, Capability::Answer, None, serde_json::json!({"question": "q"})),
        ]);

        let outcomes = Orchestrator::new(registry).run(&plan).await;
        assert_eq!(outcomes[0].status, StepStatus::Failed);
        assert_eq!(outcomes[0].error.as_ref().unwrap().kind, FailureKind::Arithmetic);
        assert_eq!(outcomes[1].status, StepStatus::Ok);
    }

    #[tokio::test]
    async fn test_dependent_step_skipped_when_upstream_fails() {
        let failing = CountingAdapter::new(Capability::Calculate, None);
        let downstream = CountingAdapter::new(
            Capability::Translate,
            Some(StepValue::Text("unused".to_string())),
        );

        let mut registry = AdapterRegistry::new();
        registry.register(failing.clone());
        registry.register(downstream.clone());

        let plan = Plan::new(vec![
            subtask(
                0,
                Capability::Calculate,
                None,
                serde_json::json!({"op": "add", "a": 1, "b": 2}),
            ),
            subtask(
                1,
                Capability::Translate,
                Some(0),
                serde_json::json!({"text": "{step:0}"}),
            ),
        ]);

        let outcomes = Orchestrator::new(registry).run(&plan).await;
        assert_eq!(outcomes[0].status, StepStatus::Failed);
        assert_eq!(outcomes[1].status, StepStatus::Failed);
        assert_eq!(outcomes[1].error.as_ref().unwrap().kind, FailureKind::Dependency);

        // The dependent step's adapter must never have been invoked
        assert_eq!(failing.calls(), 1);
        assert_eq!(downstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_chained_calculation_receives_native_value() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(CalculatorAdapter::new()));

        let plan = Plan::new(vec![
            subtask(
                0,
                Capability::Calculate,
                None,
                serde_json::json!({"op": "add", "a": 10, "b": 20}),
            ),
            subtask(
                1,
                Capability::Calculate,
                Some(0),
                serde_json::json!({"op": "add", "a": "{step:0}", "b": 5}),
            ),
        ]);

        let outcomes = Orchestrator::new(registry).run(&plan).await;
        assert_eq!(outcomes[0].value, Some(StepValue::Number(30.0)));
        assert_eq!(outcomes[1].value, Some(StepValue::Number(35.0)));
    }

    #[tokio::test]
    async fn test_empty_plan_yields_no_outcomes() {
        let outcomes = Orchestrator::new(AdapterRegistry::new())
            .run(&Plan::default())
            .await;
        assert!(outcomes.is_empty());
    }
}
