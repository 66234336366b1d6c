//! # config — อ่าน Config จาก Environment Variables
//!
//! | Variable          | Default        | Description                          |
//! |-------------------|----------------|--------------------------------------|
//! | `EXTRACTOR_MODE`  | `llm`          | `llm` or `rules` (keyword scan only) |
//! | `AI_PROVIDER`     | `claude`       | `claude` or `openai`                 |
//! | `AI_API_KEY`      | —              | required when `EXTRACTOR_MODE=llm`   |
//! | `AI_MODEL`        | per provider   | model override                       |
//! | `AI_TIMEOUT_SECS` | `30`           | per-request timeout for the LLM call |
//! | `BIND_ADDR`       | `0.0.0.0:5000` | HTTP listen address                  |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};

/// AI Provider ที่รองรับ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Claude,   // Anthropic Messages API
    OpenAi,   // OpenAI Chat Completions
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude-3-5-sonnet-20241022",
            AiProvider::OpenAi => "gpt-4o",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "claude"),
            AiProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// วิธีดึง Parameter ออกจาก Prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorMode {
    /// เรียก LLM ก่อน ถ้าพังค่อย fallback ไป keyword scan
    Llm,
    /// keyword scan อย่างเดียว ไม่ต้องมี API key
    Rules,
}

/// Credentials + tuning for the hosted LLM.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key:  String,
    pub model:    String,
    pub timeout:  Duration,
}

/// Config ทั้งหมดที่ Strategy service ต้องการ
#[derive(Debug, Clone)]
pub struct Config {
    pub extractor_mode: ExtractorMode,
    /// `Some` iff `extractor_mode == Llm`
    pub ai:             Option<AiConfig>,
    pub bind_addr:      SocketAddr,
}

impl Config {
    /// Load from the process environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary lookup (tests pass a map).
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode_str = var("EXTRACTOR_MODE")
            .unwrap_or_else(|| "llm".to_string())
            .to_lowercase();

        let extractor_mode = match mode_str.as_str() {
            "llm" => ExtractorMode::Llm,
            "rules" => ExtractorMode::Rules,
            other => bail!("Unknown EXTRACTOR_MODE: '{other}'. Use 'llm' or 'rules'"),
        };

        let ai = match extractor_mode {
            ExtractorMode::Rules => None,
            ExtractorMode::Llm => Some(ai_config(&var)?),
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:5000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:5000")?;

        Ok(Self { extractor_mode, ai, bind_addr })
    }
}

fn ai_config<F>(var: &F) -> anyhow::Result<AiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider_str = var("AI_PROVIDER")
        .unwrap_or_else(|| "claude".to_string())
        .to_lowercase();

    let provider = match provider_str.as_str() {
        "claude" | "anthropic" => AiProvider::Claude,
        "openai" => AiProvider::OpenAi,
        other => bail!("Unknown AI_PROVIDER: '{other}'. Use 'claude' or 'openai'"),
    };

    let api_key = var("AI_API_KEY")
        .filter(|k| !k.trim().is_empty())
        .context("AI_API_KEY environment variable is required (or set EXTRACTOR_MODE=rules)")?;

    let timeout_secs: u64 = var("AI_TIMEOUT_SECS")
        .unwrap_or_else(|| "30".to_string())
        .parse()
        .context("AI_TIMEOUT_SECS must be a number")?;

    Ok(AiConfig {
        provider,
        api_key,
        model:   var("AI_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
        timeout: Duration::from_secs(timeout_secs),
    })
}
