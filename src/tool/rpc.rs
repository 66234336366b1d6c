//! # tool::rpc
//!
//! JSON-RPC 2.0 framing: response/notification builders and error codes.

use serde_json::{json, Value};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Error, PartialEq)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => -32700,
            RpcError::InvalidRequest(_) => -32600,
            RpcError::MethodNotFound(_) => -32601,
            RpcError::InvalidParams(_) => -32602,
        }
    }
}

pub fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "id": id, "result": result })
}

pub fn failure(id: Value, err: &RpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id":      id,
        "error":   { "code": err.code(), "message": err.to_string() },
    })
}

pub fn notification(method: &str, params: Value) -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "method": method, "params": params })
}

/// Client-visible log line (`notifications/message`).
pub fn log_message(level: &str, logger: &str, data: &str) -> Value {
    notification("notifications/message", json!({ "level": level, "logger": logger, "data": data }))
}
