//! # Strategist — natural language → DBot strategy XML
//!
//! ```text
//!  ┌─────────────┐  POST /generate_strategy   ┌──────────────────────────────┐
//!  │ HTTP client │ ─────────────────────────▶ │ StrategyService              │
//!  └─────────────┘                            │ ├─ ParameterExtractor        │
//!                                             │ │    ├─ LlmClient (Claude/…) │
//!  ┌─────────────┐  stdio JSON-RPC            │ │    └─ rules::scan          │
//!  │ Assistant   │ ─────────────────────────▶ │ ├─ validate                  │
//!  │ host (MCP)  │  tools/call                │ └─ generate → XML            │
//!  └─────────────┘  generate_strategy         └──────────────────────────────┘
//! ```

pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod tool;
