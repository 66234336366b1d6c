//! # Strategist — HTTP front end
//!
//! ## Environment Variables
//!
//! | Variable         | Default        | Description                        |
//! |------------------|----------------|------------------------------------|
//! | `BIND_ADDR`      | `0.0.0.0:5000` | Address Axum listens on            |
//! | `EXTRACTOR_MODE` | `llm`          | `llm` or `rules`                   |
//! | `AI_PROVIDER`    | `claude`       | `claude` or `openai`               |
//! | `AI_API_KEY`     | —              | required in `llm` mode             |
//! | `RUST_LOG`       | `strategist=debug` | Tracing filter                 |

use anyhow::Context;
use tracing::info;

use strategist::{
    ai::http_client,
    config::Config,
    routes::build_router,
    state::build_state,
    telemetry::{init_tracing, LogTarget},
};

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    init_tracing(&["strategist=debug", "tower_http=info"], LogTarget::Stdout)?;

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        STRATEGIST — Prompt → DBot XML         ║
  ║        Rust + Axum  ·  Extract · Render       ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Config — fail now, not on the first request ───────────────────────
    let config = Config::from_env().context("Failed to load config")?;

    // ── 4. Build shared state ────────────────────────────────────────────────
    let http = http_client()?;
    let state = build_state(&config, &http);

    info!(
        extractor = state.service.extractor_mode(),
        provider  = ?config.ai.as_ref().map(|ai| ai.provider),
        "Pipeline ready"
    );

    // ── 5. Router ────────────────────────────────────────────────────────────
    let app = build_router(state);

    // ── 6. Start the server ──────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Strategist server starting");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
