//! Default configuration values.

use std::time::Duration;

use crate::logging::LogFormat;

/// Default lifetime of cached repository metadata, in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 60 * 60 * 1000;

/// Default log filter: Plexus crates at `info`, dependencies at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,plexus=info";

/// Default lifetime of cached repository metadata, in milliseconds.
#[must_use]
pub const fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

/// Default lifetime of cached repository metadata.
#[must_use]
pub const fn default_cache_ttl() -> Duration {
    Duration::from_millis(DEFAULT_CACHE_TTL_MS)
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
