//! # weather — OpenWeatherMap current conditions
//!
//! `GET {base}/data/2.5/weather?q={city}&appid={key}&units=metric`, rendered
//! as a short plain-text report. Every failure also renders as one line of
//! text (see [`WeatherError`]) so the tool can hand it straight back.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::WeatherConfig;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Sorry, I couldn't find weather data for '{0}'. Please check the city name and try again.")]
    CityNotFound(String),

    #[error("Error fetching weather data: HTTP {0}")]
    Status(StatusCode),

    #[error("Error connecting to weather service: {0}")]
    Connect(#[from] reqwest::Error),

    #[error("Error parsing weather data: {0}")]
    Parse(String),
}

// ─── Response shape ───────────────────────────────────────────────────────────
// Numbers stay `serde_json::Number` so they print exactly as the API sent them.

#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub name:    String,
    /// บางเมืองไม่มี `sys.country` ให้ ก็แสดงเป็นค่าว่าง
    #[serde(default)]
    pub sys:     Sys,
    pub main:    MainReadings,
    pub weather: Vec<Condition>,
    pub wind:    Wind,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp:       Number,
    pub feels_like: Number,
    pub humidity:   Number,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: Number,
}

impl CurrentWeather {
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        let parsed: Self = serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        if parsed.weather.is_empty() {
            return Err(WeatherError::Parse("no weather condition in response".into()));
        }
        Ok(parsed)
    }

    /// Multi-line report returned to the caller.
    pub fn render(&self) -> String {
        let condition = self
            .weather
            .first()
            .map(|c| capitalize(&c.description))
            .unwrap_or_default();

        format!(
            "Weather in {}, {}:\n\
             Temperature: {}°C\n\
             Feels like: {}°C\n\
             Condition: {}\n\
             Humidity: {}%\n\
             Wind Speed: {} m/s",
            self.name,
            self.sys.country,
            self.main.temp,
            self.main.feels_like,
            condition,
            self.main.humidity,
            self.wind.speed,
        )
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct WeatherClient {
    http:   reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, config: WeatherConfig) -> Self {
        Self { http, config }
    }

    pub async fn get_weather(&self, city: &str) -> Result<String, WeatherError> {
        info!("Fetching weather data for {city}");

        let url = format!("{}/data/2.5/weather", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.config.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = resp.status();
        debug!(%status, "OpenWeatherMap responded");

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body = resp.text().await?;
        Ok(CurrentWeather::from_json(&body)?.render())
    }
}
