use std::time::Duration;

use anyhow::Context;

use crate::api::fetch::FetchTimeouts;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub openweather_api_key: String,
    pub exchange_rates_api_key: String,
    pub pexels_api_key: String,

    /// Characters accepted in front of a command token, e.g. "!/"
    pub command_prefixes: Vec<char>,

    pub openweather_base_url: String,
    pub exchange_rates_base_url: String,
    pub pexels_base_url: String,

    pub fetch_timeouts: FetchTimeouts,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            openweather_api_key: required("OPENWEATHER_API_KEY")?,
            exchange_rates_api_key: required("EXCHANGE_RATES_API_KEY")?,
            pexels_api_key: required("PEXELS_API_KEY")?,
            command_prefixes: std::env::var("COMMAND_PREFIXES")
                .unwrap_or_else(|_| "!/".to_string())
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
            openweather_base_url: std::env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            exchange_rates_base_url: std::env::var("EXCHANGE_RATES_BASE_URL")
                .unwrap_or_else(|_| "https://api.apilayer.com/exchangerates_data".to_string()),
            pexels_base_url: std::env::var("PEXELS_BASE_URL")
                .unwrap_or_else(|_| "https://api.pexels.com/v1".to_string()),
            fetch_timeouts: FetchTimeouts {
                total: seconds("FETCH_TOTAL_TIMEOUT_SECS")?,
                connect: seconds("FETCH_CONNECT_TIMEOUT_SECS")?,
                read: seconds("FETCH_READ_TIMEOUT_SECS")?,
            },
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{name} is empty");
    }
    Ok(value)
}

/// Reads a timeout in whole seconds, 10 when unset.
fn seconds(name: &str) -> anyhow::Result<Duration> {
    match std::env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{name} must be a number of seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(10)),
    }
}
