use reqwest::Url;

use super::fetch::FetchClient;
use super::{endpoint, ApiError};

/// Exchange-rate conversion via the apilayer `convert` endpoint.
pub struct CurrencyApi {
    fetch: FetchClient,
    convert_url: Url,
    api_key: String,
}

impl CurrencyApi {
    pub fn new(fetch: FetchClient, base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            fetch,
            convert_url: endpoint(base_url, "convert")?,
            api_key: api_key.to_string(),
        })
    }

    /// Convert `amount` of `from` into `to`. The amount is passed through
    /// as typed; the upstream validates it.
    pub async fn convert(&self, from: &str, to: &str, amount: &str) -> Result<f64, ApiError> {
        let mut url = self.convert_url.clone();
        url.query_pairs_mut()
            .append_pair("to", to)
            .append_pair("from", from)
            .append_pair("amount", amount);

        let body = self
            .fetch
            .fetch(url, &[("apikey", self.api_key.as_str())])
            .await
            .into_result()?;

        body.get("result")
            .and_then(|v| v.as_f64())
            .ok_or(ApiError::Malformed("result"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fetch::FetchTimeouts;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> CurrencyApi {
        let fetch = FetchClient::new(FetchTimeouts::default()).unwrap();
        CurrencyApi::new(fetch, &format!("{}/exchangerates_data", server.uri()), "key").unwrap()
    }

    #[tokio::test]
    async fn test_convert_returns_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exchangerates_data/convert"))
            .and(query_param("from", "RUB"))
            .and(query_param("to", "USD"))
            .and(query_param("amount", "100"))
            .and(header("apikey", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result": 1.08}"#))
            .expect(1)
            .mount(&server)
            .await;

        let result = api(&server).convert("RUB", "USD", "100").await.unwrap();
        assert_eq!(result, 1.08);
    }

    #[tokio::test]
    async fn test_convert_client_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":{"message":"invalid from"}}"#),
            )
            .mount(&server)
            .await;

        let err = api(&server).convert("XXX", "USD", "1").await.unwrap_err();
        assert_eq!(err.reply_text(), "invalid from");
    }

    #[tokio::test]
    async fn test_missing_result_is_silent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success": false}"#))
            .mount(&server)
            .await;

        let err = api(&server).convert("RUB", "USD", "100").await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed("result")));
        assert_eq!(err.reply_text(), "");
    }
}
