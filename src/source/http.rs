//! HTTP joke source.
//!
//! Speaks the icanhazdadjoke.com API: `GET /` with `Accept: application/json`
//! answers `{"id": "...", "joke": "...", "status": 200}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use super::JokeSource;
use crate::config::ApiConfig;
use crate::error::FetchError;

/// Body returned by the joke API
#[derive(Debug, Clone, Deserialize)]
pub struct JokeResponse {
    /// The API's own joke id; not used as our identity
    #[serde(default)]
    pub id: Option<String>,
    pub joke: String,
    #[serde(default)]
    pub status: Option<u16>,
}

/// Joke source backed by an HTTP endpoint
pub struct HttpJokeSource {
    client: Client,
    endpoint: String,
}

impl HttpJokeSource {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl JokeSource for HttpJokeSource {
    async fn next_joke(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: JokeResponse = serde_json::from_str(&body)?;
        debug!(api_id = ?parsed.id, status = ?parsed.status, "Joke received");

        Ok(parsed.joke)
    }
}
