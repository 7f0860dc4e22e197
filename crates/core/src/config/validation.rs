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
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `base_url` is not an absolute http(s) URL ending in `/`
    /// - `user_agent` is empty
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `deadline_ms` is shorter than `timeout_ms` or exceeds 1 hour
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `max_retries` exceeds 10 or `retry_backoff_ms` exceeds 1 minute
    /// - `max_pages` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && self.base_url.ends_with('/') => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "base_url".into(),
                    reason: "must be an absolute http(s) URL ending in '/'".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.deadline_ms < self.timeout_ms {
            return Err(ConfigError::Invalid {
                field: "deadline_ms".into(),
                reason: "must not be shorter than timeout_ms".into(),
            });
        }
        if self.deadline_ms > 3_600_000 {
            return Err(ConfigError::Invalid {
                field: "deadline_ms".into(),
                reason: "must not exceed 1 hour (3600000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.max_retries > 10 {
            return Err(ConfigError::Invalid { field: "max_retries".into(), reason: "must not exceed 10".into() });
        }
        if self.retry_backoff_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "retry_backoff_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.max_pages == 0 {
            return Err(ConfigError::Invalid { field: "max_pages".into(), reason: "must be at least 1".into() });
        }

        if self.max_retries > 0 && self.retry_backoff_ms == 0 {
            tracing::warn!(
                max_retries = self.max_retries,
                "retry_backoff_ms is 0; transient failures will be retried without delay"
            );
        }

        Ok(())
    }
}
