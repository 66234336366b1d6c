//! # Weather — stdio tool server
//!
//! One tool, `get_weather(city)`, backed by the OpenWeatherMap current
//! conditions endpoint. Speaks the same line-delimited JSON-RPC protocol as
//! `strategy-tool`; logs go to stderr.
//!
//! ```bash
//! OPENWEATHER_API_KEY=... cargo run --manifest-path weather/Cargo.toml
//! ```

use anyhow::Context;
use tracing::info;

use strategist::{
    ai::http_client,
    telemetry::{init_tracing, LogTarget},
    tool::ToolServer,
};

mod config;
mod tool;
mod weather;

use config::WeatherConfig;
use tool::{weather_prompt, GetWeatherTool, SERVER_NAME};
use weather::WeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(&["weather_tool=debug", "reqwest=warn"], LogTarget::Stderr)?;

    let config = WeatherConfig::from_env().context("Failed to load config")?;
    info!(base_url = %config.base_url, "🌤️ Weather tool starting");

    let client = WeatherClient::new(http_client()?, config);

    ToolServer::new(SERVER_NAME)
        .with_tool(GetWeatherTool::new(client))
        .with_prompt(weather_prompt())
        .serve_stdio()
        .await
}
