//! # ai — เรียก Claude หรือ OpenAI API
//!
//! [`LlmClient`] คือ seam ระหว่าง Extractor กับ provider จริง
//! production ใช้ [`HostedLlm`], test ใส่ client ที่คืนค่าตายตัวแทน

use std::time::Duration;

use anyhow::Context;
use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AiConfig, AiProvider};

const CLAUDE_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 1000;

// ─── Client Seam ──────────────────────────────────────────────────────────────

/// Text in, text out. May fail or return prose around the JSON.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>>;

    /// Short label for logs, e.g. `"claude"`.
    fn label(&self) -> String;
}

/// Real provider behind the shared `reqwest::Client`.
pub struct HostedLlm {
    http:   reqwest::Client,
    config: AiConfig,
}

impl HostedLlm {
    pub fn new(http: reqwest::Client, config: AiConfig) -> Self {
        Self { http, config }
    }
}

impl LlmClient for HostedLlm {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            match self.config.provider {
                AiProvider::Claude => call_claude(&self.http, &self.config, prompt).await,
                AiProvider::OpenAi => call_openai(&self.http, &self.config, prompt).await,
            }
        }
        .boxed()
    }

    fn label(&self) -> String {
        format!("{}:{}", self.config.provider, self.config.model)
    }
}

// ─── Anthropic Claude ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model:      &'a str,
    max_tokens: u32,
    messages:   Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: Option<String>,
}

async fn call_claude(
    client: &reqwest::Client,
    config: &AiConfig,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = ClaudeRequest {
        model:      &config.model,
        max_tokens: MAX_TOKENS,
        messages:   vec![ChatMessage { role: "user", content: prompt }],
    };

    debug!(model = %config.model, "Calling Claude API...");

    let resp = client
        .post(CLAUDE_URL)
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&body)
        .timeout(config.timeout)
        .send()
        .await
        .context("Claude API request failed")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("Claude API error {status}: {text}");
    }

    let data: ClaudeResponse = resp.json().await.context("Claude response parse error")?;

    data.content.into_iter()
        .find_map(|c| c.text)
        .context("Claude returned empty content")
}

// ─── OpenAI ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model:    &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMsg,
}

#[derive(Deserialize)]
struct OpenAiChoiceMsg {
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &AiConfig,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = OpenAiRequest {
        model:    &config.model,
        messages: vec![
            ChatMessage { role: "system", content: "You extract trading parameters. Always respond with valid JSON only." },
            ChatMessage { role: "user",   content: prompt },
        ],
    };

    debug!(model = %config.model, "Calling OpenAI API...");

    let resp = client
        .post(OPENAI_URL)
        .bearer_auth(&config.api_key)
        .json(&body)
        .timeout(config.timeout)
        .send()
        .await
        .context("OpenAI API request failed")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI API error {status}: {text}");
    }

    let data: OpenAiResponse = resp.json().await.context("OpenAI response parse error")?;

    data.choices.into_iter().next()
        .and_then(|c| c.message.content)
        .context("OpenAI returned empty content")
}

/// Build the client the config asks for. `None` in rules mode.
pub fn build_llm(http: &reqwest::Client, config: Option<&AiConfig>) -> Option<HostedLlm> {
    config.map(|ai| HostedLlm::new(http.clone(), ai.clone()))
}

/// Shared HTTP client for all outbound calls.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")
}
