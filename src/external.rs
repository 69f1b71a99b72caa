//! HTTP reader for externally hosted playlists.

use async_trait::async_trait;
use playout_common::{Error, Result};
use playout_smil::ExternalContentReader;
use reqwest::Client;
use std::time::Duration;

/// Fetches item fragments with a bounded request time.
#[derive(Clone)]
pub struct HttpExternalReader {
    client: Client,
}

impl HttpExternalReader {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("playout/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl ExternalContentReader for HttpExternalReader {
    async fn load_items(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "Fetching external playlist");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::external(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::external(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::external(format!("{}: {}", url, e)))
    }
}
