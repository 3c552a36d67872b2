// Source image fetching

use crate::config::FetchConfig;
use crate::error::{CaptionError, Result};
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for retrieving source images.
///
/// Issues exactly one outbound GET per render; there is no retry logic.
/// Responses are bounded by `max_bytes` so a hostile origin cannot force an
/// arbitrarily large decode.
pub struct SourceFetcher {
    http_client: Client,
    max_bytes: usize,
}

impl SourceFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| CaptionError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            max_bytes: config.max_bytes,
        })
    }

    /// Fetch the raw bytes behind `url`.
    ///
    /// Transport failures, unparsable URLs, and non-2xx answers all surface
    /// as `CaptionError::Fetch`; an oversized body as `TooLarge`.
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let result = self.fetch_inner(url).await;
        crate::metrics::record_fetch(result.is_ok());
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<Bytes> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "source fetch failed");
            CaptionError::Fetch(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "source origin answered non-success");
            return Err(CaptionError::Fetch(format!("origin answered {}", status)));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(CaptionError::TooLarge(format!(
                    "declared response length {} exceeds limit {}",
                    len, self.max_bytes
                )));
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(url, error = %e, "source body read failed");
            CaptionError::Fetch(e.to_string())
        })?;

        if bytes.len() > self.max_bytes {
            return Err(CaptionError::TooLarge(format!(
                "response body {} bytes exceeds limit {}",
                bytes.len(),
                self.max_bytes
            )));
        }

        debug!(url, len = bytes.len(), "source fetched");
        Ok(bytes)
    }
}
