// src/services/paginate.rs

//! Paginated fetch engine with retry and backoff.
//!
//! Follows the upstream API's `Link` header `rel="next"` convention until the
//! result set is exhausted. Transient failures (429, 5xx, connection errors,
//! timeouts) are retried with exponential backoff; anything else fails the
//! fetch immediately. A failed fetch never yields partial results.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::report::Reporter;

/// Outcome of a single page attempt, before retry accounting.
enum PageFailure {
    Retryable(String),
    Fatal(String),
}

/// Fetches complete result sets from paginated endpoints.
///
/// Purely functional with respect to in-memory state; safe to clone and share
/// across workers (the underlying client pools connections).
#[derive(Clone)]
pub struct PaginatedFetcher {
    client: Client,
    config: Arc<Config>,
    reporter: Arc<dyn Reporter>,
}

impl PaginatedFetcher {
    pub fn new(client: Client, config: Arc<Config>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            config,
            reporter,
        }
    }

    /// Fetch every page starting at `endpoint`, concatenated in page order.
    pub async fn fetch_all<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut current = Some(endpoint.to_string());

        while let Some(url) = current {
            let (page, next) = self.fetch_page(&url).await?;
            results.extend(page);
            current = next;
        }

        Ok(results)
    }

    /// Fetch one page with retries, returning the records and the next link.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(Vec<T>, Option<String>)> {
        let max_attempts = self.config.fetcher.max_retries;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_page(url).await {
                Ok(page) => return Ok(page),
                Err(PageFailure::Retryable(_)) if attempt < max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    self.reporter.retrying(url, attempt, max_attempts, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(PageFailure::Retryable(message)) => {
                    return Err(AppError::fetch(url, attempt, message));
                }
                Err(PageFailure::Fatal(message)) => {
                    return Err(AppError::fetch(url, attempt, message));
                }
            }
        }
    }

    /// Issue a single page request and classify any failure.
    async fn try_page<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> std::result::Result<(Vec<T>, Option<String>), PageFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if is_retryable_status(status) {
            return Err(PageFailure::Retryable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(PageFailure::Fatal(format!("HTTP {status}")));
        }

        // The next link must be read before the body consumes the response.
        let next = match next_link(response.headers()) {
            Some(link) => {
                url::Url::parse(&link)
                    .map_err(|e| PageFailure::Fatal(format!("bad next link '{link}': {e}")))?;
                Some(link)
            }
            None => None,
        };
        let page = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| PageFailure::Fatal(format!("invalid response body: {e}")))?;

        Ok((page, next))
    }

    /// Delay before the attempt after `attempt`: base × factor^(attempt-1).
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let fetcher = &self.config.fetcher;
        let ms =
            fetcher.backoff_base_ms as f64 * fetcher.backoff_factor.powi(attempt as i32 - 1);
        Duration::from_millis(ms as u64)
    }
}

/// Statuses worth retrying: rate limiting and transient server failures.
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Connection-level errors are transient; everything else is not.
fn classify_transport(error: reqwest::Error) -> PageFailure {
    if error.is_timeout() || error.is_connect() {
        PageFailure::Retryable(error.to_string())
    } else {
        PageFailure::Fatal(error.to_string())
    }
}

/// Find the `rel="next"` target across all `Link` header values.
fn next_link(headers: &header::HeaderMap) -> Option<String> {
    headers
        .get_all(header::LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

/// Parse one `Link` header value, e.g.
/// `<https://host/x?page=2>; rel="next", <https://host/x?page=9>; rel="last"`.
pub(crate) fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut sections = part.trim().split(';');
        let target = sections.next().unwrap_or("").trim();
        if !(target.starts_with('<') && target.ends_with('>')) {
            continue;
        }
        let is_next = sections.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if is_next {
            return Some(target[1..target.len() - 1].to_string());
        }
    }
    None
}
