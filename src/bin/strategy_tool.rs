//! # strategy-tool — `generate_strategy` over stdio
//!
//! Register with an assistant host as a stdio tool server:
//! ```bash
//! EXTRACTOR_MODE=rules cargo run --bin strategy-tool
//! ```

use anyhow::Context;
use tracing::info;

use strategist::{
    ai::http_client,
    config::Config,
    state::AppState,
    telemetry::{init_tracing, LogTarget},
    tool::{
        strategy::{strategy_prompt, GenerateStrategyTool, SERVER_NAME},
        ToolServer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(&["strategist=debug"], LogTarget::Stderr)?;

    let config = Config::from_env().context("Failed to load config")?;
    let http = http_client()?;
    let state = AppState::from_config(&config, &http);

    info!(extractor = state.service.extractor_mode(), "Strategy tool starting");

    let server = ToolServer::new(SERVER_NAME)
        .with_tool(GenerateStrategyTool::new(state.service.clone()))
        .with_prompt(strategy_prompt());

    server.serve_stdio().await
}
