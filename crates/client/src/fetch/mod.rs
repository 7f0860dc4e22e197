//! HTTP fetch pipeline for site pages.
//!
//! ### Page Fetcher
//! - [`PageFetcher`] is the only way the extraction engine reaches the network,
//!   so queries can run against in-memory fixtures.
//! - [`FetchClient`] is the reqwest-backed implementation.
//!
//! ### Safety Gates
//! - Per-request timeout (default: 20s)
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//!
//! ### Retry
//! - Timeouts, connection failures, `429` and `5xx` are retried with
//!   exponential backoff; everything else fails the query immediately.

pub mod retry;
pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use retry::{RetryPolicy, with_retry};
pub use url::{UrlError, canonicalize, same_site};

use lboxd_core::{AppConfig, Error};

/// Source of raw page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// Any network failure, timeout or non-2xx status is an error.
    async fn fetch(&self, url: &Url) -> Result<String, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "lboxd/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "lboxd/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            retry: RetryPolicy { max_retries: config.max_retries, backoff: config.retry_backoff() },
            ..Default::default()
        }
    }
}

/// Response from a single fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// Response body bytes
    pub bytes: Bytes,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// HTTP fetch client with size limits and retry.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL once, returning raw bytes and metadata.
    ///
    /// Enforces the byte limit and maps non-2xx statuses to [`Error::HttpStatus`].
    pub async fn fetch_once(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();

        let bytes = response.bytes().await.map_err(|e| request_error(url, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.clone(), final_url, bytes })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn fetch(&self, url: &Url) -> Result<String, Error> {
        let response = with_retry(&self.config.retry, url, || self.fetch_once(url)).await?;
        Ok(response.text())
    }
}

fn request_error(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "lboxd/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "tester/1".into(), max_retries: 1, retry_backoff_ms: 50, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "tester/1");
        assert_eq!(config.timeout, app.timeout());
        assert_eq!(config.retry, RetryPolicy { max_retries: 1, backoff: Duration::from_millis(50) });
    }

    #[test]
    fn test_fetch_response_text_is_lossy() {
        let response = FetchResponse {
            url: Url::parse("https://letterboxd.com/").unwrap(),
            final_url: Url::parse("https://letterboxd.com/").unwrap(),
            bytes: Bytes::from_static(b"<p>caf\xff</p>"),
        };

        assert_eq!(response.text(), "<p>caf\u{fffd}</p>");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_fetch_live_page() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let url = Url::parse("https://letterboxd.com/film/parasite-2019/").unwrap();
        let html = client.fetch(&url).await.unwrap();
        assert!(html.contains("application/ld+json"));
    }
}
