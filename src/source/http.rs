use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{
    errors::{SourceError, SourceResult},
    provider::PageSource,
    types::{CountQuery, CountResponse, FirstPageQuery, NextPageQuery, Record, RecordId},
};
use crate::config::Config;

const USER_AGENT: &str = concat!("boardlist/", env!("CARGO_PKG_VERSION"));

/// Page source backed by the board's REST endpoints
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base_url: String,
    count_path: String,
    list_path: String,
}

impl HttpPageSource {
    /// Create a new HTTP source from configuration
    pub fn new(config: &Config) -> SourceResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(SourceError::Config("base_url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            count_path: config.count_path.clone(),
            list_path: config.list_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<Q, R>(&self, path: &str, query: &Q) -> SourceResult<R>
    where
        Q: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = extract_error_message(response).await;
            return Err(SourceError::Api { status, message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn count(&self) -> SourceResult<u64> {
        let response: CountResponse = self.get_json(&self.count_path, &CountQuery::default()).await?;
        Ok(response.total_items)
    }

    async fn first_page(&self, size: usize) -> SourceResult<Vec<Record>> {
        self.get_json(&self.list_path, &FirstPageQuery { size }).await
    }

    async fn next_page(&self, last_id: RecordId, size: usize) -> SourceResult<Vec<Record>> {
        self.get_json(&self.list_path, &NextPageQuery { last_id, size }).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Extract error message from HTTP response
async fn extract_error_message(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => error_message_from_body(&text),
        Err(_) => "Failed to read error response".to_string(),
    }
}

fn error_message_from_body(text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        let message = json
            .get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| json.get("message"))
            .and_then(|m| m.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    text.to_string()
}
