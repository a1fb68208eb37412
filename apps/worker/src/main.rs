mod board;
mod config;
mod db;
mod llm;
mod models;
mod pipeline;
mod scheduler;
mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::HttpJobBoard;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm::assistant::LlmAssistant;
use crate::llm::LlmClient;
use crate::pipeline::Pipeline;
use crate::store::pg::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting autoapply worker v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;

    // Initialize the board client and LLM-backed assistant
    let board = Arc::new(HttpJobBoard::new(
        config.board_api_url.clone(),
        config.board_token_url.clone(),
        config.board_client_id.clone(),
        config.board_client_secret.clone(),
    ));
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm::MODEL);
    let assistant = Arc::new(LlmAssistant::new(llm));
    let store = Arc::new(PgStore::new(pool));

    let pipeline = Arc::new(Pipeline::new(
        board,
        assistant,
        store,
        config.search_area.clone(),
    ));

    // The scheduler handle must outlive the wait below; dropping it stops jobs.
    let _scheduler = scheduler::start(&config, pipeline).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping");
    Ok(())
}
