//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Pagination and retry behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Worker pool and progress reporting
    #[serde(default)]
    pub runner: RunnerConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.domain.trim().is_empty() {
            return Err(AppError::validation("api.domain is empty"));
        }
        if self.api.token.trim().is_empty() {
            return Err(AppError::validation("api.token is empty"));
        }
        if self.api.role.trim().is_empty() {
            return Err(AppError::validation("api.role is empty"));
        }
        if self.api.per_page == 0 {
            return Err(AppError::validation("api.per_page must be > 0"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_retries == 0 {
            return Err(AppError::validation("fetcher.max_retries must be > 0"));
        }
        if self.fetcher.backoff_factor < 1.0 {
            return Err(AppError::validation("fetcher.backoff_factor must be >= 1"));
        }
        if self.runner.max_concurrent == 0 {
            return Err(AppError::validation("runner.max_concurrent must be > 0"));
        }
        if self.runner.progress_interval == 0 {
            return Err(AppError::validation("runner.progress_interval must be > 0"));
        }
        if self.paths.checkpoint_file.trim().is_empty() {
            return Err(AppError::validation("paths.checkpoint_file is empty"));
        }
        if self.paths.export_file.trim().is_empty() {
            return Err(AppError::validation("paths.export_file is empty"));
        }
        Ok(())
    }
}

/// Upstream LMS API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API host, e.g. "school.instructure.com"
    #[serde(default)]
    pub domain: String,

    /// Bearer token for the Authorization header
    #[serde(default)]
    pub token: String,

    /// Account whose courses are enumerated
    #[serde(default = "defaults::account_id")]
    pub account_id: u64,

    /// Enrollment role to filter on
    #[serde(default = "defaults::role")]
    pub role: String,

    /// Page size requested from paginated endpoints
    #[serde(default = "defaults::per_page")]
    pub per_page: u32,
}

impl ApiConfig {
    /// Base URL for API requests.
    ///
    /// A bare host gets the https scheme; an explicit scheme is kept as-is
    /// (local test servers speak plain http).
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.contains("://") {
            format!("{domain}/api/v1")
        } else {
            format!("https://{domain}/api/v1")
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            token: String::new(),
            account_id: defaults::account_id(),
            role: defaults::role(),
            per_page: defaults::per_page(),
        }
    }
}

/// Pagination and retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Total attempts per page request before giving up
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Base retry delay in milliseconds
    #[serde(default = "defaults::backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Multiplier applied to the delay for each further attempt
    #[serde(default = "defaults::backoff_factor")]
    pub backoff_factor: f64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            backoff_base_ms: defaults::backoff_base_ms(),
            backoff_factor: defaults::backoff_factor(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Worker pool and progress reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of courses processed concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Emit a progress line every N completed courses
    #[serde(default = "defaults::progress_interval")]
    pub progress_interval: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
            progress_interval: defaults::progress_interval(),
        }
    }
}

/// File locations for checkpoint and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Durable progress checkpoint
    #[serde(default = "defaults::checkpoint_file")]
    pub checkpoint_file: String,

    /// Final CSV artifact
    #[serde(default = "defaults::export_file")]
    pub export_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            checkpoint_file: defaults::checkpoint_file(),
            export_file: defaults::export_file(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn account_id() -> u64 {
        1
    }
    pub fn role() -> String {
        "TeacherEnrollment".into()
    }
    pub fn per_page() -> u32 {
        100
    }

    // Fetcher defaults
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        5
    }
    pub fn backoff_base_ms() -> u64 {
        300
    }
    pub fn backoff_factor() -> f64 {
        2.0
    }
    pub fn user_agent() -> String {
        "roster/0.1 (teacher enrollment export)".into()
    }

    // Runner defaults
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn progress_interval() -> usize {
        500
    }

    // Path defaults
    pub fn checkpoint_file() -> String {
        "canvas_progress.json".into()
    }
    pub fn export_file() -> String {
        "all_teachers.csv".into()
    }
}
