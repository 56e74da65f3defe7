//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_pages` is 0
    /// - `page_size` or `sound_page_size` is outside 1..=100
    /// - `max_concurrency` is outside 1..=16
    /// - `user_agent` is empty
    /// - `api_base` is not an http(s) URL
    ///
    /// Returns `ConfigError::Missing` if `output_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_pages == 0 {
            return Err(ConfigError::Invalid { field: "max_pages".into(), reason: "must be greater than 0".into() });
        }

        for (field, value) in [("page_size", self.page_size), ("sound_page_size", self.sound_page_size)] {
            if value == 0 || value > 100 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be between 1 and 100".into() });
            }
        }

        if self.max_concurrency == 0 || self.max_concurrency > 16 {
            return Err(ConfigError::Invalid {
                field: "max_concurrency".into(),
                reason: "must be between 1 and 16".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "api_base".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => return Err(ConfigError::Invalid { field: "api_base".into(), reason: e.to_string() }),
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "output_path".into(),
                hint: "Set JIDANJIA_OUTPUT_PATH environment variable".into(),
            });
        }

        if self.page_delay_ms == 0 || self.item_delay_ms == 0 {
            tracing::warn!(
                page_delay_ms = self.page_delay_ms,
                item_delay_ms = self.item_delay_ms,
                "Crawl delays are disabled; upstream rate limits may reject requests"
            );
        }

        Ok(())
    }
}
