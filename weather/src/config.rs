//! # config — อ่าน Config จาก Environment Variables
//!
//! | Variable               | Default                         |
//! |------------------------|---------------------------------|
//! | `OPENWEATHER_API_KEY`  | — (required)                    |
//! | `OPENWEATHER_BASE_URL` | `http://api.openweathermap.org` |

use anyhow::Context;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";

/// Config ทั้งหมดที่ Weather tool ต้องการ
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap `appid`
    pub api_key:  String,
    /// No trailing slash
    pub base_url: String,
}

impl WeatherConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OPENWEATHER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .context("OPENWEATHER_API_KEY environment variable is required")?;

        let base_url = var("OPENWEATHER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { api_key, base_url })
    }
}
