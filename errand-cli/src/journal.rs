//! Append-only interaction log for post-hoc debugging.
//!
//! One JSON line per request: the raw utterance, the resolved plan,
//! every step outcome, and the composed response. Write-only from the
//! core's perspective; never read back during a run.

use crate::plan::types::{Plan, StepOutcome, SubTask};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One journaled request/response cycle.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    pub id: String,
    pub at: DateTime<Utc>,
    pub utterance: String,
    pub plan: Vec<SubTask>,
    pub outcomes: Vec<StepOutcome>,
    pub response: String,
}

impl InteractionRecord {
    pub fn new(utterance: &str, plan: &Plan, outcomes: &[StepOutcome], response: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            at: Utc::now(),
            utterance: utterance.to_string(),
            plan: plan.steps().to_vec(),
            outcomes: outcomes.to_vec(),
            response: response.to_string(),
        }
    }
}

pub struct InteractionJournal {
    path: PathBuf,
}

impl InteractionJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line.
    pub fn append(&self, record: &InteractionRecord) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(file, "{}", line)
    }
}
