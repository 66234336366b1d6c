//! # service
//!
//! One request through the pipeline. Shared by the HTTP handler and the
//! stdio tool, so both front ends fail the same way.
//!
//! ```text
//! prompt → Extractor → ParameterMap → Validator ──false──▶ InvalidParameters
//!                                         │true
//!                                         ▼
//!                              StrategyParams → Generator → XML
//! ```

use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::engine::{generate, validate, ParameterExtractor};
use crate::models::{ParamsError, StrategyParams};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Blank or absent prompt.
    #[error("Missing prompt in request body")]
    MissingPrompt,

    /// Validator rejected the extracted map.
    #[error("Could not extract valid parameters from prompt")]
    InvalidParameters,

    /// Anything the pipeline did not expect.
    #[error("Error generating strategy: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ParamsError> for ServiceError {
    fn from(err: ParamsError) -> Self {
        ServiceError::Internal(err.into())
    }
}

pub struct StrategyService {
    extractor: ParameterExtractor,
}

impl StrategyService {
    pub fn new(extractor: ParameterExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor_mode(&self) -> &'static str {
        self.extractor.mode()
    }

    /// prompt → strategy XML. Either a whole document or an error.
    pub async fn generate_strategy(&self, prompt: &str) -> Result<String, ServiceError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("generate_strategy", %request_id);

        self.run(prompt).instrument(span).await
    }

    async fn run(&self, prompt: &str) -> Result<String, ServiceError> {
        if prompt.trim().is_empty() {
            warn!("Rejected blank prompt");
            return Err(ServiceError::MissingPrompt);
        }

        // extract ไม่มีวันพัง แย่สุดคือได้ค่า default
        let params = self.extractor.extract(prompt).await;

        if !validate(&params) {
            warn!(params = ?params, "Extracted parameters failed validation");
            return Err(ServiceError::InvalidParameters);
        }

        // ผ่าน validate แล้ว ตรงนี้ไม่ควร error
        let params = StrategyParams::from_map(&params)?;
        let xml = generate(&params);

        info!(
            duration = %params.duration,
            stake    = %params.stake,
            profit   = %params.profit_threshold,
            loss     = %params.loss_threshold,
            bytes    = xml.len(),
            "📄 Strategy document generated"
        );
        Ok(xml)
    }
}
