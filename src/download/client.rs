//! HTTP client wrapper for digest lookups and artifact streams.
//!
//! This module provides the `HttpClient` struct, which owns the connection
//! pool, timeout configuration and status-to-error mapping shared by the
//! digest resolver and the streaming fetcher.

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::{debug, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// Maximum redirects followed from the mirror-selection endpoint.
const MAX_REDIRECTS: usize = 10;

/// HTTP client for digest and artifact requests.
///
/// Created once and reused, taking advantage of connection pooling. Holds no
/// per-download state, so concurrent downloads can share one client.
///
/// # Example
///
/// ```no_run
/// use apache_downloader::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let digest_file = client
///     .get_text("https://downloads.apache.org/dist/kafka/KEYS")
///     .await?;
/// println!("{} bytes", digest_file.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes between body reads
    /// - Redirects: followed, up to 10 hops
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_timeouts(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(READ_TIMEOUT_SECS),
        )
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// The read timeout bounds each body read, not the whole transfer, so
    /// large artifacts are not cut off.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the TLS backend cannot be initialized.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| DownloadError::Client { source })?;
        Ok(Self { client })
    }

    /// Fetches a small text resource with a plain GET.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NotFound`] on 404, [`DownloadError::HttpStatus`]
    /// for other non-success statuses, and [`DownloadError::Network`] /
    /// [`DownloadError::Timeout`] when the request or body read fails.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send_get(url).await?;
        response
            .text()
            .await
            .map_err(|e| DownloadError::network(url, e))
    }

    /// Opens a GET whose body is consumed as a stream by the caller.
    ///
    /// Redirects are followed before this returns; the status checked is the
    /// status of the final response.
    ///
    /// # Errors
    ///
    /// Same as [`get_text`](Self::get_text).
    #[instrument(level = "debug", skip(self))]
    pub async fn open_stream(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        self.send_get(url).await
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), final_url = %response.url(), "request failed");
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        if response.url().as_str() != url {
            debug!(final_url = %response.url(), "followed redirect");
        }
        Ok(response)
    }
}
