pub mod composer;
pub mod decomposer;
pub mod orchestrator;
pub mod resolver;
pub mod types;

pub use decomposer::{DecomposeError, Decomposer};
pub use orchestrator::Orchestrator;
pub use types::Plan;
