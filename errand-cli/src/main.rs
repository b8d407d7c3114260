use dotenv::dotenv;
use std::sync::Arc;

mod adapters;
mod ai;
mod config;
mod dispatcher;
mod journal;
mod plan;
mod repl;

use adapters::create_default_registry;
use ai::GeminiClient;
use config::Config;
use dispatcher::RequestDispatcher;
use journal::InteractionJournal;
use plan::{Decomposer, Orchestrator};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    // Load supported languages from the config directory
    let config_dir = match config::config_dir() {
        Some(dir) => dir,
        None => {
            eprintln!("Config directory not found in ./config or ../config");
            std::process::exit(1);
        }
    };
    log::info!("Using config directory: {:?}", config_dir);
    adapters::translator::load_languages(config_dir);

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Please set your GEMINI_API_KEY environment variable.");
            std::process::exit(1);
        }
    };

    let model: Arc<dyn ai::LanguageModel> =
        match GeminiClient::new(&config.api_key, Some(&config.endpoint), Some(&config.model)) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("Failed to create model client: {}", e);
                std::process::exit(1);
            }
        };
    log::info!("Model client ready (model={})", config.model);

    let registry = create_default_registry(model.clone());
    log::info!("Registered {} capability adapters", registry.len());

    let dispatcher = RequestDispatcher::new(Decomposer::new(model), Orchestrator::new(registry))
        .with_journal(InteractionJournal::new(&config.journal_path));
    log::info!("Journaling interactions to {:?}", config.journal_path);

    // One-shot mode for scripted runs; otherwise interactive
    if let Ok(query) = std::env::var("AGENT_QUERY") {
        let result = dispatcher.dispatch(query.trim()).await;
        repl::print_result(&result);
        if !result.success {
            std::process::exit(1);
        }
        return;
    }

    repl::run(&dispatcher).await;
}
