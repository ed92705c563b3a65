//! Layered configuration for the Plexus host.
//!
//! Values are merged from defaults, configuration files, `PLEXUS_*`
//! environment variables and command-line flags, with later sources taking
//! precedence. Only ambient host concerns live here: how long repository
//! metadata stays fresh and how log output is filtered and rendered.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CACHE_TTL_MS, DEFAULT_LOG_FILTER, default_cache_ttl, default_cache_ttl_ms,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PLEXUS")]
pub struct Config {
    /// Lifetime of metadata pulled from a repository, in milliseconds.
    #[ortho_config(default = DEFAULT_CACHE_TTL_MS)]
    #[serde(default = "default_cache_ttl_ms")]
    cache_ttl_ms: u64,
    /// `tracing` filter directive applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    /// Rendering of log events.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Config {
    /// Returns the cache lifetime in milliseconds.
    #[must_use]
    pub const fn cache_ttl_ms(&self) -> u64 {
        self.cache_ttl_ms
    }

    /// Returns the cache lifetime.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Returns the log filter directive.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Overrides the cache lifetime, saturating at `u64::MAX` milliseconds.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Overrides the log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests;
