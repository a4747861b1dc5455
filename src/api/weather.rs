use reqwest::Url;
use serde::Deserialize;

use super::fetch::FetchClient;
use super::{endpoint, ApiError};

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Deserialize)]
struct Place {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: String,
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: f64,
    pub humidity: f64,
    pub description: String,
}

/// OpenWeather client: geocode the city, then look up weather by coordinates.
pub struct WeatherApi {
    fetch: FetchClient,
    geocode_url: Url,
    weather_url: Url,
    api_key: String,
}

impl WeatherApi {
    pub fn new(fetch: FetchClient, base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            fetch,
            geocode_url: endpoint(base_url, "geo/1.0/direct")?,
            weather_url: endpoint(base_url, "data/2.5/weather")?,
            api_key: api_key.to_string(),
        })
    }

    pub async fn current(&self, city: &str) -> Result<WeatherReport, ApiError> {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("limit", "1")
            .append_pair("appid", &self.api_key);

        let places = self.fetch.fetch(url, &[]).await.into_result()?;
        let places: Vec<Place> =
            serde_json::from_value(places).map_err(|_| ApiError::Malformed("geocoding result"))?;
        let place = places.first().ok_or(ApiError::CityNotFound)?;

        let (lat, lon) = (round2(place.lat), round2(place.lon));
        tracing::debug!("Geocoded {:?} to ({}, {})", city, lat, lon);

        let mut url = self.weather_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("lang", "ru");

        let body = self.fetch.fetch(url, &[]).await.into_result()?;
        let current: CurrentWeather =
            serde_json::from_value(body).map_err(|_| ApiError::Malformed("weather readings"))?;
        let description = current
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or(ApiError::Malformed("weather description"))?;

        Ok(WeatherReport {
            city: current.name,
            temperature_c: current.main.temp - KELVIN_OFFSET,
            humidity: current.main.humidity,
            description,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fetch::{FetchTimeouts, TIMEOUT_ERROR_TEXT};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer, timeouts: FetchTimeouts) -> WeatherApi {
        WeatherApi::new(FetchClient::new(timeouts).unwrap(), &server.uri(), "key").unwrap()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(51.507_322), 51.51);
        assert_eq!(round2(-0.127_647), -0.13);
        assert_eq!(round2(37.6), 37.6);
    }

    #[tokio::test]
    async fn test_two_step_lookup_uses_rounded_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Лондон"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"name":"London","lat":51.5073219,"lon":-0.1276474}]"#),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "51.51"))
            .and(query_param("lon", "-0.13"))
            .and(query_param("lang", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"name":"London","main":{"temp":288.15,"humidity":72},
                    "weather":[{"description":"пасмурно"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let report = api(&server, FetchTimeouts::default())
            .current("Лондон")
            .await
            .unwrap();

        assert_eq!(report.city, "London");
        assert!((report.temperature_c - 15.0).abs() < 1e-9);
        assert_eq!(report.humidity, 72.0);
        assert_eq!(report.description, "пасмурно");
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = api(&server, FetchTimeouts::default())
            .current("Nowhere")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::CityNotFound));
    }

    #[tokio::test]
    async fn test_geocode_timeout_maps_to_timeout_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_string("[]"),
            )
            .mount(&server)
            .await;

        let timeouts = FetchTimeouts {
            total: Duration::from_millis(200),
            ..FetchTimeouts::default()
        };
        let err = api(&server, timeouts).current("Moscow").await.unwrap_err();

        assert_eq!(err.reply_text(), TIMEOUT_ERROR_TEXT);
    }
}
