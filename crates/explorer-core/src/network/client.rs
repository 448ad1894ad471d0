//! Thin HTTP client shared by the storage REST clients.
//!
//! Wraps reqwest with:
//! - A configurable request timeout
//! - A fixed user-agent
//! - Mapping of transport errors and HTTP status codes to `ExplorerError`

use crate::config::NetworkConfig;
use crate::error::{ExplorerError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP client for read-only storage requests.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| ExplorerError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make a GET request with custom headers.
    ///
    /// Transport failures become `Network`/`Timeout`. Non-success statuses are
    /// returned as-is for the caller to interpret.
    pub async fn get_with_headers(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        debug!("GET {}", redact_query(url));

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplorerError::Timeout
                } else {
                    // The URL may carry a SAS signature
                    ExplorerError::Network {
                        message: format!(
                            "GET {} failed: {}",
                            extract_domain(url),
                            e.without_url()
                        ),
                    }
                }
            })?;

        Ok(response)
    }

    /// Check if an HTTP status code means the resource does not exist.
    pub fn is_not_found(status: StatusCode) -> bool {
        status == StatusCode::NOT_FOUND
    }

    /// Check if an HTTP status code means the credential was rejected.
    pub fn is_access_denied(status: StatusCode) -> bool {
        matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    }
}

/// Short description of a failed response: status plus storage error code.
pub async fn describe_failure(response: Response) -> String {
    let status = response.status();
    let error_code = response
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match error_code {
        Some(code) => format!("HTTP {} ({})", status.as_u16(), code),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Strip the query string so SAS signatures never reach the logs.
pub fn redact_query(url: &str) -> &str {
    match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    }
}
