//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Single GET requests, classified into success, HTTP error or transport error
//!
//! There are no retries. A failed fetch is reported once and the caller treats
//! it as "no data for this URL".

use crate::config::Config;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Server answered 200 and the body decoded as text
    Success {
        /// Page body content
        body: String,
    },

    /// Server answered with any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Request never produced a usable response (timeout, DNS, reset, decode failure)
    TransportError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body when the fetch succeeded
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    /// Consumes the result, returning the body when the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value of the User-Agent header
/// * `request_timeout` - Bound on a whole request, body included
/// * `connect_timeout` - Bound on establishing the connection
///
/// # Example
///
/// ```no_run
/// use listing_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(
///     "listing-harvest/1.0",
///     Duration::from_secs(30),
///     Duration::from_secs(10),
/// )
/// .unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    request_timeout: Duration,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single GET requests and classifies their outcome
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the user agent and timeouts in `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent.header_value(),
            Duration::from_secs(config.crawler.request_timeout_secs),
            Duration::from_secs(config.crawler.connect_timeout_secs),
        )?;
        Ok(Self::new(client))
    }

    /// Fetches a URL once
    ///
    /// | Outcome | Result |
    /// |---------|--------|
    /// | HTTP 200 | `Success` with the decoded body |
    /// | Any other status | `HttpError`, no body |
    /// | Timeout / connect / body read failure | `TransportError`, no body |
    ///
    /// Every attempt is logged at INFO and every failure at ERROR. This never
    /// panics and never returns an error to the caller.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        tracing::info!("scraping {}...", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = classify_transport_error(&e);
                tracing::error!("error occurred while scraping {}: {}", url, error);
                return FetchResult::TransportError { error };
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                "get invalid status code {} while scraping {}",
                status.as_u16(),
                url
            );
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success { body },
            Err(e) => {
                let error = classify_transport_error(&e);
                tracing::error!("error occurred while reading {}: {}", url, error);
                FetchResult::TransportError { error }
            }
        }
    }
}

fn classify_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
