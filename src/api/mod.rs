pub mod currency;
pub mod fetch;
pub mod images;
pub mod weather;

use reqwest::Url;
use thiserror::Error;

use crate::config::AppConfig;
use currency::CurrencyApi;
use fetch::{FetchClient, FetchFailure};
use images::ImageApi;
use weather::WeatherApi;

pub const CITY_NOT_FOUND_TEXT: &str = "Введите правильные данные";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),
    #[error("no place matches the requested city")]
    CityNotFound,
    #[error("unexpected payload, missing {0}")]
    Malformed(&'static str),
}

impl ApiError {
    /// Text shown to the user; empty means the failure is reported silently.
    pub fn reply_text(&self) -> &str {
        match self {
            Self::Fetch(failure) => failure.reply_text(),
            Self::CityNotFound => CITY_NOT_FOUND_TEXT,
            Self::Malformed(_) => "",
        }
    }
}

/// Upstream clients sharing one fetch layer.
pub struct Apis {
    pub weather: WeatherApi,
    pub currency: CurrencyApi,
    pub images: ImageApi,
}

impl Apis {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let fetch = FetchClient::new(config.fetch_timeouts)?;
        Ok(Self {
            weather: WeatherApi::new(
                fetch.clone(),
                &config.openweather_base_url,
                &config.openweather_api_key,
            )?,
            currency: CurrencyApi::new(
                fetch.clone(),
                &config.exchange_rates_base_url,
                &config.exchange_rates_api_key,
            )?,
            images: ImageApi::new(fetch, &config.pexels_base_url, &config.pexels_api_key)?,
        })
    }
}

/// Join `path` onto a configured base URL, keeping any base path segment.
fn endpoint(base: &str, path: &str) -> anyhow::Result<Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| anyhow::anyhow!("invalid API URL {joined:?}: {e}"))
}
