//! # tool — stdio tool server
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout, speaking the subset of the
//! Model Context Protocol that assistant hosts use to call tools:
//!
//! | Method                      | Reply                                   |
//! |-----------------------------|-----------------------------------------|
//! | `initialize`                | server info + capabilities              |
//! | `ping`                      | `{}`                                    |
//! | `tools/list`                | registered tools + input schemas        |
//! | `tools/call`                | `{content:[{type:"text"}], isError}`    |
//! | `prompts/list`              | registered conversation starters        |
//! | `prompts/get`               | user message + canned assistant reply   |
//! | `notifications/*`           | no reply                                |
//!
//! stdout carries protocol frames only. Logs go to stderr (see `telemetry`).

pub mod rpc;
pub mod strategy;

use anyhow::Context;
use futures_util::future::BoxFuture;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use rpc::RpcError;

/// Protocol revision reported when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ─── Tools & Prompts ──────────────────────────────────────────────────────────

/// Result of one tool invocation. Errors are still text, flagged `is_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text:     String,
    pub is_error: bool,
    /// Progress lines sent to the client as info-level log notifications,
    /// ahead of the response.
    pub notes:    Vec<String>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false, notes: Vec::new() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true, notes: Vec::new() }
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// A callable exposed through `tools/call`.
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema of the `arguments` object.
    fn input_schema(&self) -> Value;
    fn call<'a>(&'a self, arguments: &'a Map<String, Value>) -> BoxFuture<'a, ToolOutput>;
}

/// Canned conversation starter exposed through `prompts/get`: the caller's
/// `message` followed by a fixed assistant reply.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name:        &'static str,
    pub description: &'static str,
    pub reply:       &'static str,
}

/// Schema for a tool taking one required string argument.
pub fn single_string_schema(arg: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": { arg: { "type": "string", "description": description } },
        "required": [arg],
    })
}

// ─── Server ───────────────────────────────────────────────────────────────────

pub struct ToolServer {
    name:    String,
    version: String,
    tools:   Vec<Box<dyn Tool>>,
    prompts: Vec<PromptTemplate>,
}

impl ToolServer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tools:   Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompts.push(prompt);
        self
    }

    /// Serve stdin → stdout until EOF.
    pub async fn serve_stdio(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve any line-oriented transport until the reader hits EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = %self.name, tools = self.tools.len(), "🔧 Tool server ready");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("Failed to read request line")? {
            if line.trim().is_empty() {
                continue;
            }
            for frame in self.handle_line(&line).await {
                let mut out = serde_json::to_string(&frame).context("Failed to encode frame")?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await.context("Failed to write frame")?;
            }
            writer.flush().await.context("Failed to flush frame")?;
        }

        info!(server = %self.name, "Input closed — tool server stopping");
        Ok(())
    }

    /// Handle one incoming line. Returns the frames to write, in order:
    /// side-channel notifications first, then the response (if any).
    pub async fn handle_line(&self, line: &str) -> Vec<Value> {
        let message: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => return vec![rpc::failure(Value::Null, &RpcError::Parse(e.to_string()))],
        };

        let Value::Object(message) = message else {
            return vec![rpc::failure(
                Value::Null,
                &RpcError::InvalidRequest("expected a JSON object".into()),
            )];
        };

        let id = message.get("id").cloned();
        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return vec![rpc::failure(
                id.unwrap_or(Value::Null),
                &RpcError::InvalidRequest("missing method".into()),
            )];
        };

        let params = match message.get("params") {
            Some(Value::Object(p)) => p.clone(),
            _ => Map::new(),
        };

        // notification ไม่ต้องตอบ
        let Some(id) = id else {
            debug!(method, "Notification received");
            return Vec::new();
        };

        debug!(method, %id, "Request received");

        let mut frames = Vec::new();
        let response = match self.dispatch(method, &params, &mut frames).await {
            Ok(result) => rpc::success(id, result),
            Err(err) => {
                warn!(method, error = %err, "Request rejected");
                rpc::failure(id, &err)
            }
        };
        frames.push(response);
        frames
    }

    async fn dispatch(
        &self,
        method: &str,
        params: &Map<String, Value>,
        frames: &mut Vec<Value>,
    ) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize(params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(params, frames).await,
            "prompts/list" => Ok(self.list_prompts()),
            "prompts/get" => self.get_prompt(params),
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: &Map<String, Value>) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": version,
            "capabilities": { "tools": {}, "prompts": {}, "logging": {} },
            "serverInfo": { "name": self.name, "version": self.version },
        })
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|t| json!({
                "name":        t.name(),
                "description": t.description(),
                "inputSchema": t.input_schema(),
            }))
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(
        &self,
        params: &Map<String, Value>,
        frames: &mut Vec<Value>,
    ) -> Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::InvalidParams("missing tool name".into()))?;

        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| RpcError::InvalidParams(format!("unknown tool '{name}'")))?;

        let arguments = match params.get("arguments") {
            Some(Value::Object(args)) => args.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(_) => return Err(RpcError::InvalidParams("arguments must be an object".into())),
        };

        info!(tool = name, "Tool call");
        let output = tool.call(&arguments).await;

        // ส่ง progress ให้ client ก่อน แล้วค่อย error (ถ้ามี)
        for note in &output.notes {
            frames.push(rpc::log_message("info", &self.name, note));
        }
        if output.is_error {
            frames.push(rpc::log_message("error", &self.name, &output.text));
        }

        Ok(json!({
            "content": [{ "type": "text", "text": output.text }],
            "isError": output.is_error,
        }))
    }

    fn list_prompts(&self) -> Value {
        let prompts: Vec<Value> = self
            .prompts
            .iter()
            .map(|p| json!({
                "name":        p.name,
                "description": p.description,
                "arguments":   [{ "name": "message", "required": true }],
            }))
            .collect();
        json!({ "prompts": prompts })
    }

    fn get_prompt(&self, params: &Map<String, Value>) -> Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::InvalidParams("missing prompt name".into()))?;

        let prompt = self
            .prompts
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RpcError::InvalidParams(format!("unknown prompt '{name}'")))?;

        let message = params
            .get("arguments")
            .and_then(|a| a.get("message"))
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::InvalidParams("missing argument 'message'".into()))?;

        Ok(json!({
            "description": prompt.description,
            "messages": [
                { "role": "user",      "content": { "type": "text", "text": message } },
                { "role": "assistant", "content": { "type": "text", "text": prompt.reply } },
            ],
        }))
    }
}

/// Pull a required string argument out of a `tools/call` arguments object.
pub fn string_arg<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    struct Echo;

    impl Tool for Echo {
        fn name(&self) -> &'static str { "echo" }
        fn description(&self) -> &'static str { "Echo the text back" }
        fn input_schema(&self) -> Value { single_string_schema("text", "Text to echo") }

        fn call<'a>(&'a self, arguments: &'a Map<String, Value>) -> BoxFuture<'a, ToolOutput> {
            async move {
                match string_arg(arguments, "text") {
                    Some("") | None => ToolOutput::error("nothing to echo"),
                    Some(text) => ToolOutput::text(text),
                }
            }
            .boxed()
        }
    }

    fn server() -> ToolServer {
        ToolServer::new("Test")
            .with_tool(Echo)
            .with_prompt(PromptTemplate {
                name:        "test_prompt",
                description: "Say hi",
                reply:       "Hello there.",
            })
    }

    async fn one(server: &ToolServer, line: &str) -> Value {
        let mut frames = server.handle_line(line).await;
        assert_eq!(frames.len(), 1, "expected exactly one frame: {frames:?}");
        frames.remove(0)
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let reply = one(&server(), r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["serverInfo"]["name"], "Test");
        assert_eq!(reply["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert!(reply["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_reply() {
        let frames = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(frames.is_empty());
    }

    #[tokio::test]
    async fn test_tools_list_and_call() {
        let s = server();
        let list = one(&s, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        assert_eq!(list["result"]["tools"][0]["name"], "echo");
        assert_eq!(list["result"]["tools"][0]["inputSchema"]["required"][0], "text");

        let call = one(
            &s,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hi"}}}"#,
        )
        .await;
        assert_eq!(call["result"]["content"][0]["text"], "hi");
        assert_eq!(call["result"]["isError"], false);
    }

    #[tokio::test]
    async fn test_tool_error_emits_log_notification_first() {
        let frames = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"echo","arguments":{}}}"#)
            .await;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["method"], "notifications/message");
        assert_eq!(frames[0]["params"]["level"], "error");
        assert_eq!(frames[0]["params"]["data"], "nothing to echo");
        assert_eq!(frames[1]["result"]["isError"], true);
    }

    struct Narrated;

    impl Tool for Narrated {
        fn name(&self) -> &'static str { "narrated" }
        fn description(&self) -> &'static str { "Reports progress while working" }
        fn input_schema(&self) -> Value { json!({ "type": "object" }) }

        fn call<'a>(&'a self, _arguments: &'a Map<String, Value>) -> BoxFuture<'a, ToolOutput> {
            async move {
                ToolOutput::text("done").with_notes(vec!["starting".into(), "finished".into()])
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_tool_notes_become_info_notifications() {
        let frames = ToolServer::new("Test")
            .with_tool(Narrated)
            .handle_line(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"narrated"}}"#)
            .await;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0]["params"]["level"], "info");
        assert_eq!(frames[0]["params"]["data"], "starting");
        assert_eq!(frames[1]["params"]["data"], "finished");
        assert_eq!(frames[2]["result"]["content"][0]["text"], "done");
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let s = server();
        assert_eq!(one(&s, "not json").await["error"]["code"], -32700);
        assert_eq!(one(&s, "[1,2]").await["error"]["code"], -32600);
        assert_eq!(one(&s, r#"{"id":5}"#).await["error"]["code"], -32600);
        assert_eq!(one(&s, r#"{"id":6,"method":"resources/list"}"#).await["error"]["code"], -32601);
        assert_eq!(
            one(&s, r#"{"id":7,"method":"tools/call","params":{"name":"missing"}}"#).await["error"]["code"],
            -32602
        );
    }

    #[tokio::test]
    async fn test_prompts_get() {
        let reply = one(
            &server(),
            r#"{"jsonrpc":"2.0","id":8,"method":"prompts/get","params":{"name":"test_prompt","arguments":{"message":"yo"}}}"#,
        )
        .await;
        let messages = &reply["result"]["messages"];
        assert_eq!(messages[0]["content"]["text"], "yo");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"]["text"], "Hello there.");
    }

    #[tokio::test]
    async fn test_serve_over_byte_streams() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "\n",
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"x"}}}"#, "\n",
        );
        let mut output: Vec<u8> = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let frames: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["id"], 1);
        assert_eq!(frames[1]["result"]["content"][0]["text"], "x");
    }
}
