// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::Config;

/// Create the shared HTTP client.
///
/// Carries the bearer token as a default header and the per-request timeout
/// from configuration. The client (and its connection pool) is cheap to
/// clone and safe to share across workers.
pub fn create_client(config: &Config) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api.token))
        .map_err(|e| AppError::config(format!("api.token is not a valid header value: {e}")))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let client = reqwest::Client::builder()
        .user_agent(&config.fetcher.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.fetcher.timeout_secs))
        .build()?;
    Ok(client)
}
