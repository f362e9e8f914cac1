pub mod text;
pub mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use types::{DocumentContent, DocumentPayload, SearchPayload, SearchQuery, SearchResult};

/// Shown when the API cannot be reached at all. The free-tier host sleeps
/// when idle, so the first request often fails while it wakes up.
pub const CONNECTION_FAILURE: &str =
    "API bağlantı hatası. Render uyandırılıyor (30-50sn bekleyin)...";
pub const DOCUMENT_FAILURE: &str = "Belge yüklenemedi";

/// Reachability of the remote API as shown in the header badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStatus {
    #[default]
    Checking,
    Live,
    Offline,
}

impl ApiStatus {
    /// Apply a health check result. It only resolves `Checking`; a search
    /// that already came back live is never downgraded.
    pub fn after_check(self, checked: ApiStatus) -> ApiStatus {
        match self {
            ApiStatus::Checking => checked,
            current => current,
        }
    }

    /// A search that reached the API proves it is live.
    pub fn after_search(self, reached_api: bool) -> ApiStatus {
        if reached_api {
            ApiStatus::Live
        } else {
            self
        }
    }
}

/// Everything the controller needs from the network.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Never fails: transport errors come back as `SearchResult::Unreachable`.
    async fn search(&self, query: &SearchQuery) -> SearchResult;
    async fn fetch_document(&self, id: &str) -> DocumentContent;
    async fn check(&self) -> ApiStatus;
}

/// HTTP client for the decision search API.
pub struct YargiClient {
    client: reqwest::Client,
    base_url: String,
}

impl YargiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body. HTTP status is ignored on purpose:
    /// the API reports its own errors in the JSON body, often with a 4xx/5xx.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        let text = resp.text().await.context("Failed to read response body")?;
        debug!(url = %url, status = status.as_u16(), len = text.len(), "response received");
        serde_json::from_str(&text).context("Failed to parse response JSON")
    }
}

#[async_trait]
impl DecisionSource for YargiClient {
    async fn search(&self, query: &SearchQuery) -> SearchResult {
        match self
            .get_json::<SearchPayload>("/search", &query.params())
            .await
        {
            Ok(payload) => {
                let result = SearchResult::from(payload);
                info!(
                    keyword = %query.keyword,
                    page = query.page,
                    decisions = result.decisions().len(),
                    "search answered"
                );
                result
            }
            Err(e) => {
                warn!(keyword = %query.keyword, "search failed: {:#}", e);
                SearchResult::Unreachable {
                    error: CONNECTION_FAILURE.to_string(),
                }
            }
        }
    }

    async fn fetch_document(&self, id: &str) -> DocumentContent {
        match self
            .get_json::<DocumentPayload>("/document", &[("id", id.to_string())])
            .await
        {
            Ok(payload) => match DocumentContent::from(payload) {
                DocumentContent::Ready(content) => DocumentContent::Ready(text::plain_text(&content)),
                other => other,
            },
            Err(e) => {
                warn!(doc_id = id, "document fetch failed: {:#}", e);
                DocumentContent::Failed(DOCUMENT_FAILURE.to_string())
            }
        }
    }

    async fn check(&self) -> ApiStatus {
        match self.client.get(&self.base_url).send().await {
            Ok(resp) if resp.status().is_success() => ApiStatus::Live,
            Ok(resp) => {
                warn!(status = resp.status().as_u16(), "API health check got non-success status");
                ApiStatus::Offline
            }
            Err(e) => {
                warn!("API health check failed: {}", e);
                ApiStatus::Offline
            }
        }
    }
}
