//! # routes::strategy
//!
//! | Method | Path                 | Description                          |
//! |--------|----------------------|--------------------------------------|
//! | POST   | `/generate_strategy` | prompt → strategy XML                |
//! | GET    | `/health`            | liveness + which extractor is active |

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::{error::AppError, state::SharedState};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub strategy: String,
}

// ─── POST /generate_strategy ──────────────────────────────────────────────────

/// ### Request body
/// ```json
/// { "prompt": "5 tick duration, $10 stake, profit target $100, stop loss $50" }
/// ```
///
/// ### Responses
/// * `200 {"strategy": "<?xml ..."}`
/// * `400 {"error": "Missing prompt in request body"}`
/// * `400 {"error": "Could not extract valid parameters from prompt"}`
/// * `500 {"error": "Error generating strategy: ..."}`
pub async fn generate_strategy(
    State(state): State<SharedState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    // body ที่ parse ไม่ได้ ถือว่าไม่มี prompt
    let prompt = match body {
        Ok(Json(req)) => req.prompt.unwrap_or_default(),
        Err(rejection) => {
            debug!(reason = %rejection, "Unreadable request body");
            String::new()
        }
    };

    info!(chars = prompt.len(), "📝 Strategy requested");

    let strategy = state.service.generate_strategy(&prompt).await?;

    Ok(Json(GenerateResponse { strategy }))
}

// ─── GET /health ──────────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":        true,
        "extractor": state.service.extractor_mode(),
        "time":      chrono::Utc::now(),
    }))
}
