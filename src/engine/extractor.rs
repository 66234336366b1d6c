//! # engine::extractor
//!
//! **Parameter Extractor** — free text → [`ParameterMap`].
//!
//! ## Flow
//! ```text
//! prompt ──▶ LLM configured? ──no──▶ rules::scan
//!                 │yes
//!                 ▼
//!          complete(prompt) ──err──┐
//!                 │                │
//!        find_json_object ──none───┤
//!                 │                ▼
//!          merge onto defaults   rules::scan (logged)
//! ```
//!
//! `extract` never fails: the worst case is the default map.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::ai::LlmClient;
use crate::engine::rules;
use crate::models::ParameterMap;
use crate::prompt::build_extraction_prompt;

pub struct ParameterExtractor {
    llm: Option<Arc<dyn LlmClient>>,
}

impl ParameterExtractor {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { llm }
    }

    /// Keyword scan only — no outbound calls.
    pub fn rules_only() -> Self {
        Self { llm: None }
    }

    pub fn with_llm(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm: Some(llm) }
    }

    /// `"llm"` or `"rules"`, for health output and logs.
    pub fn mode(&self) -> &'static str {
        if self.llm.is_some() { "llm" } else { "rules" }
    }

    /// Extract parameters from `prompt`, merged over the defaults.
    pub async fn extract(&self, prompt: &str) -> ParameterMap {
        let Some(llm) = &self.llm else {
            return rules::scan(prompt);
        };

        match extract_with_llm(llm.as_ref(), prompt).await {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    provider = %llm.label(),
                    error    = %format!("{e:#}"),
                    "LLM extraction failed — falling back to keyword scan"
                );
                rules::scan(prompt)
            }
        }
    }
}

async fn extract_with_llm(llm: &dyn LlmClient, prompt: &str) -> anyhow::Result<ParameterMap> {
    let reply = llm
        .complete(&build_extraction_prompt(prompt))
        .await
        .context("LLM completion failed")?;

    debug!(chars = reply.len(), "LLM reply received");

    // AI อาจตอบมีข้อความนำหน้า/ตามหลัง JSON
    let extracted = parse_json_object(&reply)?;
    let mut params = ParameterMap::defaults();
    let applied = params.merge(extracted);

    info!(provider = %llm.label(), applied, "Parameters extracted by LLM");
    Ok(params)
}

/// Locate and parse the first JSON object in `text`.
///
/// Every `{` is a candidate start; a balanced span that is not valid JSON
/// (`{as requested}`) is skipped and the scan resumes at the next brace.
pub fn parse_json_object(text: &str) -> anyhow::Result<Map<String, Value>> {
    let mut last_error = None;
    let mut from = 0;

    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(candidate) = balanced_object(&text[start..]) {
            match serde_json::from_str::<Map<String, Value>>(candidate) {
                Ok(map) => return Ok(map),
                Err(e) => {
                    debug!(candidate, error = %e, "Skipping non-JSON brace span");
                    last_error = Some(anyhow!(e).context(format!("LLM returned invalid JSON: {candidate}")));
                }
            }
        }
        from = start + 1;
    }

    match last_error {
        Some(err) => Err(err),
        None => bail!("LLM reply contains no JSON object: {text:?}"),
    }
}

/// The first balanced `{ ... }` substring, honouring JSON strings and escapes
/// so braces inside string values do not count. `None` if there is no opening
/// brace or it is never closed.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    balanced_object(&text[start..])
}

/// `text` starts with `{`; returns the span up to its matching `}`.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                // ปิดครบทุกวงเล็บแล้ว
                if depth == 0 {
                    return Some(&text[..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

// ─── Tests ────────────────────────────────────────────────────────────────────
