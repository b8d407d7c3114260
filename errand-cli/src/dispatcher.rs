//! Routes one utterance end-to-end: decompose, execute, compose,
//! journal.

use crate::journal::{InteractionJournal, InteractionRecord};
use crate::plan::types::StepOutcome;
use crate::plan::{DecomposeError, Decomposer, Orchestrator, Plan, composer};

/// Outcome of one dispatched utterance.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub success: bool,
    pub response: String,
}

impl DispatchResult {
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: message.into(),
        }
    }
}

pub struct RequestDispatcher {
    decomposer: Decomposer,
    orchestrator: Orchestrator,
    journal: Option<InteractionJournal>,
}

impl RequestDispatcher {
    pub fn new(decomposer: Decomposer, orchestrator: Orchestrator) -> Self {
        Self {
            decomposer,
            orchestrator,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: InteractionJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Process one utterance through the full pipeline. Never returns an
    /// error: a decomposition failure becomes a single top-level failure
    /// message; everything after decomposition is a per-step outcome
    /// inside a successful dispatch.
    pub async fn dispatch(&self, utterance: &str) -> DispatchResult {
        log::info!("[DISPATCH] Processing utterance: {}", utterance);

        let plan = match self.decomposer.decompose(utterance).await {
            Ok(plan) => plan,
            Err(e) => {
                log::error!("[DISPATCH] Decomposition failed: {}", e);
                let message = describe_decompose_failure(&e);
                self.record(utterance, &Plan::default(), &[], &message);
                return DispatchResult::error(message);
            }
        };

        let outcomes = self.orchestrator.run(&plan).await;
        let response = composer::compose(&plan, &outcomes);

        self.record(utterance, &plan, &outcomes, &response);

        log::info!("[DISPATCH] Completed {} step(s)", outcomes.len());
        DispatchResult::success(response)
    }

    fn record(&self, utterance: &str, plan: &Plan, outcomes: &[StepOutcome], response: &str) {
        let Some(journal) = &self.journal else { return };
        let record = InteractionRecord::new(utterance, plan, outcomes, response);
        if let Err(e) = journal.append(&record) {
            log::warn!("[DISPATCH] Failed to journal interaction: {}", e);
        }
    }
}

fn describe_decompose_failure(error: &DecomposeError) -> String {
    format!("Could not break the request into steps: {}", error)
}
