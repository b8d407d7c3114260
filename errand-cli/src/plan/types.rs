//! Plan data model: typed sub-tasks, step values, and per-step outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// The fixed operation kinds a sub-task can dispatch to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Capability {
    Calculate,
    Translate,
    Answer,
}

/// One atomic unit of work within a multi-step request.
///
/// `depends_on`, when present, names an earlier step (strictly smaller
/// index) whose result fills the `{step:N}` placeholders in `arguments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    pub index: usize,
    pub capability: Capability,
    pub arguments: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<usize>,
}

/// Ordered, dependency-annotated sequence of sub-tasks derived from one
/// utterance. Immutable after decomposition; owned by a single dispatch
/// run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<SubTask>,
}

impl Plan {
    pub fn new(steps: Vec<SubTask>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[SubTask] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A sub-task with every placeholder replaced by a literal value.
/// Invariant: no `{step:N}` token remains in `arguments`.
#[derive(Debug, Clone)]
pub struct ResolvedSubTask {
    pub index: usize,
    pub capability: Capability,
    pub arguments: Map<String, Value>,
}

/// Result value produced by a capability adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for StepValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Integral results read as integers (30, not 30.0)
            StepValue::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            StepValue::Number(n) => write!(f, "{}", n),
            StepValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&StepValue> for Value {
    fn from(value: &StepValue) -> Self {
        match value {
            StepValue::Number(n) => Value::from(*n),
            StepValue::Text(s) => Value::String(s.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Failed,
}

/// Failure classes a step can record. Serialized into the journal and
/// assertable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Dependency,
    Arithmetic,
    Translation,
    Model,
    Arguments,
    Adapter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Per-step result; exactly one of `value`/`error` is set, matching
/// `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<StepValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StepFailure>,
}

impl StepOutcome {
    pub fn ok(index: usize, value: StepValue) -> Self {
        Self {
            index,
            status: StepStatus::Ok,
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(index: usize, failure: StepFailure) -> Self {
        Self {
            index,
            status: StepStatus::Failed,
            value: None,
            error: Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StepStatus::Ok
    }
}
