use reqwest::Url;
use serde_json::Value;

use super::fetch::FetchClient;
use super::{endpoint, ApiError};

/// Pexels photo search.
pub struct ImageApi {
    fetch: FetchClient,
    search_url: Url,
    api_key: String,
}

impl ImageApi {
    pub fn new(fetch: FetchClient, base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            fetch,
            search_url: endpoint(base_url, "search")?,
            api_key: api_key.to_string(),
        })
    }

    /// URL of the small rendition of the first photo matching `query`.
    pub async fn first_photo(&self, query: &str) -> Result<String, ApiError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("per_page", "1");

        let body = self
            .fetch
            .fetch(url, &[("Authorization", self.api_key.as_str())])
            .await
            .into_result()?;

        body.pointer("/photos/0/src/small")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ApiError::Malformed("photos[0].src.small"))
    }
}
