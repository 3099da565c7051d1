use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use kotoba_config::Config;
use kotoba_core::Dictionary;
use kotoba_core::preprocess::normalize_query;
use kotoba_lang_japanese::{GeminiModel, JapaneseProcessor, JapaneseTutor, SigureDictionary};
use kotoba_store::Storage;
use kotoba_translator::LanguageModel;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod cli;
mod controller;
mod error;
mod handlers;
mod profile;
mod state;
mod status;
mod watchdog;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Cmd};
use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, source) = profile::load_config(cli.config.as_deref())?;
    init_tracing(&config.log_filter, cli.json_logs);
    tracing::info!("Config: {}", source);

    match cli.cmd.unwrap_or(Cmd::Serve) {
        Cmd::Serve => serve(config).await,
        Cmd::Models => list_models(&config).await,
        Cmd::Probe { word } => probe(&config, &word).await,
    }
}

/// RUST_LOG wins over the configured filter; JSON lines when piped
fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json || !atty::is(atty::Stream::Stdout) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_tutor(config: &Config) -> anyhow::Result<Option<JapaneseTutor>> {
    let translator = &config.translator;

    if !translator.enabled {
        tracing::info!("LLM disabled. Fallbacks and enrichment off");
        return Ok(None);
    }
    if translator.provider != "gemini" {
        tracing::warn!("Unsupported LLM provider '{}'", translator.provider);
        return Ok(None);
    }

    let model = GeminiModel::from_config(translator)?;
    let meta = model.metadata();
    if meta.requires_api_key && !translator.is_usable() {
        tracing::warn!("No LLM API key configured. Fallbacks and enrichment disabled");
        return Ok(None);
    }

    tracing::info!("LLM: {} ({})", meta.name, meta.model);
    Ok(Some(JapaneseTutor::new(Arc::new(model))))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let storage = Arc::new(Storage::connect(&config.storage).await);
    tracing::info!("Storage mode: {}", storage.mode().as_str());

    let dictionary = Arc::new(SigureDictionary::new(&config.dictionary)?);
    let meta = dictionary.metadata();
    tracing::info!("Dictionary: {} at {}", meta.name, meta.base_url);

    let processor =
        JapaneseProcessor::new(dictionary, build_tutor(&config)?, config.translator.enrich_limit);

    let (heartbeat, watchdog) =
        watchdog::channel(Duration::from_millis(config.watchdog.timeout_ms));
    let state = Arc::new(AppState::new(processor, storage.clone(), heartbeat));

    let listener = TcpListener::bind(config.network.bind_addr()).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    let controller = AppController::new(
        state,
        storage,
        config.watchdog.enabled.then_some(watchdog),
        Duration::from_millis(config.storage.ping_interval_ms),
    );
    controller.run(listener).await
}

async fn list_models(config: &Config) -> anyhow::Result<()> {
    let model = GeminiModel::from_config(&config.translator)?;

    for info in model.list_models().await? {
        println!("{}\t{}", info.name, info.display_name);
    }
    Ok(())
}

async fn probe(config: &Config, word: &str) -> anyhow::Result<()> {
    let dictionary = SigureDictionary::new(&config.dictionary)?;
    let query = normalize_query(word);

    tracing::info!("Probing {}", dictionary.page_url(&query)?);
    let entries = dictionary.lookup(&query).await?;

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
