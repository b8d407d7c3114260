use crate::ai::gemini;
use std::env;
use std::path::{Path, PathBuf};

/// Runtime configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub journal_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY environment variable is required".to_string())?;

        Ok(Self {
            api_key,
            endpoint: env::var("AGENT_ENDPOINT")
                .unwrap_or_else(|_| gemini::DEFAULT_ENDPOINT.to_string()),
            model: env::var("AGENT_MODEL").unwrap_or_else(|_| gemini::DEFAULT_MODEL.to_string()),
            journal_path: env::var("AGENT_JOURNAL")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("interactions.jsonl")),
        })
    }
}

/// Resolve the config directory, checking ./config then ../config (for
/// running from the member crate directory).
pub fn config_dir() -> Option<&'static Path> {
    if Path::new("./config").exists() {
        Some(Path::new("./config"))
    } else if Path::new("../config").exists() {
        Some(Path::new("../config"))
    } else {
        None
    }
}
