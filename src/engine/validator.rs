//! # engine::validator
//!
//! Boolean gate between the Extractor and the Generator. Only the numeric
//! keys are checked; `market` / `submarket` / `symbol` pass through as-is.

use tracing::debug;

use crate::models::{keys, Numeric, ParameterMap};

/// Keys that must be present and numeric before a document is generated.
pub const REQUIRED_KEYS: [&str; 5] = [
    keys::DURATION,
    keys::STAKE,
    keys::INITIAL_STAKE,
    keys::PROFIT_THRESHOLD,
    keys::LOSS_THRESHOLD,
];

/// `true` iff every required key is present and holds a JSON number.
pub fn validate(params: &ParameterMap) -> bool {
    REQUIRED_KEYS.iter().all(|key| match params.get(key) {
        None => {
            debug!(key, "Validation failed — missing key");
            false
        }
        // LLM ชอบส่งเป็น string เช่น "ten"
        Some(value) if Numeric::from_json(value).is_none() => {
            debug!(key, %value, "Validation failed — not a number");
            false
        }
        Some(_) => true,
    })
}
