//! # tool::strategy
//!
//! `generate_strategy(prompt)` exposed to assistant hosts. Same pipeline as
//! `POST /generate_strategy`; failures come back as plain text with
//! `isError: true` plus an error-level log notification.

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use tracing::error;

use super::{single_string_schema, string_arg, PromptTemplate, Tool, ToolOutput};
use crate::service::StrategyService;

pub const SERVER_NAME: &str = "Strategy";

pub struct GenerateStrategyTool {
    service: Arc<StrategyService>,
}

impl GenerateStrategyTool {
    pub fn new(service: Arc<StrategyService>) -> Self {
        Self { service }
    }
}

impl Tool for GenerateStrategyTool {
    fn name(&self) -> &'static str {
        "generate_strategy"
    }

    fn description(&self) -> &'static str {
        "Generate a trading strategy from description"
    }

    fn input_schema(&self) -> Value {
        single_string_schema("prompt", "Plain-English description of the trading strategy")
    }

    fn call<'a>(&'a self, arguments: &'a Map<String, Value>) -> BoxFuture<'a, ToolOutput> {
        async move {
            let prompt = string_arg(arguments, "prompt").unwrap_or_default();
            match self.service.generate_strategy(prompt).await {
                Ok(xml) => ToolOutput::text(xml),
                Err(e) => {
                    error!(error = %e, "generate_strategy tool failed");
                    ToolOutput::error(e.to_string())
                }
            }
        }
        .boxed()
    }
}

/// Conversation starter registered next to the tool.
pub fn strategy_prompt() -> PromptTemplate {
    PromptTemplate {
        name:        "strategy_prompt",
        description: "Handle strategy-related prompts",
        reply:       "I'll help you generate a trading strategy.",
    }
}
