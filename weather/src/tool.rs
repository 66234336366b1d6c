//! # tool — `get_weather(city)` + `weather_prompt`

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use tracing::warn;

use strategist::tool::{single_string_schema, string_arg, PromptTemplate, Tool, ToolOutput};

use crate::weather::WeatherClient;

pub const SERVER_NAME: &str = "Weather";

pub struct GetWeatherTool {
    client: WeatherClient,
}

impl GetWeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

impl Tool for GetWeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get current weather for a city"
    }

    fn input_schema(&self) -> Value {
        single_string_schema("city", "City name, optionally with a country code, e.g. \"Paris,FR\"")
    }

    fn call<'a>(&'a self, arguments: &'a Map<String, Value>) -> BoxFuture<'a, ToolOutput> {
        async move {
            let Some(city) = string_arg(arguments, "city").filter(|c| !c.trim().is_empty()) else {
                return ToolOutput::error("Missing city");
            };
            let city = city.trim();
            let mut notes = vec![format!("Fetching weather data for {city}")];

            match self.client.get_weather(city).await {
                Ok(report) => {
                    notes.push("Weather data retrieved successfully".to_string());
                    ToolOutput::text(report).with_notes(notes)
                }
                Err(e) => {
                    warn!(city, error = %e, "get_weather failed");
                    ToolOutput::error(e.to_string()).with_notes(notes)
                }
            }
        }
        .boxed()
    }
}

pub fn weather_prompt() -> PromptTemplate {
    PromptTemplate {
        name:        "weather_prompt",
        description: "Handle weather-related prompts",
        reply:       "Let me check the weather conditions for you.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategist::tool::ToolServer;

    use crate::config::WeatherConfig;

    fn server_at(base_url: String) -> ToolServer {
        let config = WeatherConfig { api_key: "k".into(), base_url };
        ToolServer::new(SERVER_NAME)
            .with_tool(GetWeatherTool::new(WeatherClient::new(reqwest::Client::new(), config)))
            .with_prompt(weather_prompt())
    }

    fn server() -> ToolServer {
        // only for calls that never reach the network
        server_at("http://127.0.0.1:9".into())
    }

    #[tokio::test]
    async fn test_tools_list() {
        let frames = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
            .await;
        let tool = &frames[0]["result"]["tools"][0];
        assert_eq!(tool["name"], "get_weather");
        assert_eq!(tool["inputSchema"]["required"][0], "city");
    }

    #[tokio::test]
    async fn test_missing_city() {
        let frames = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_weather","arguments":{}}}"#)
            .await;
        let result = &frames.last().unwrap()["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Missing city");
    }

    #[tokio::test]
    async fn test_progress_notes_precede_failure() {
        // bind then release a port so nothing is listening on it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let frames = server_at(format!("http://{addr}"))
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_weather","arguments":{"city":" Oslo "}}}"#)
            .await;

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0]["params"]["level"], "info");
        assert_eq!(frames[0]["params"]["data"], "Fetching weather data for Oslo");
        assert_eq!(frames[1]["params"]["level"], "error");
        let text = frames[2]["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error connecting to weather service: "));
    }

    #[tokio::test]
    async fn test_weather_prompt_reply() {
        let frames = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"prompts/get","params":{"name":"weather_prompt","arguments":{"message":"Is it raining in Oslo?"}}}"#)
            .await;
        let messages = &frames[0]["result"]["messages"];
        assert_eq!(messages[0]["content"]["text"], "Is it raining in Oslo?");
        assert_eq!(messages[1]["content"]["text"], "Let me check the weather conditions for you.");
    }
}
