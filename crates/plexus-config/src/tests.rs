//! Unit tests for configuration loading.

use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use once_cell::sync::Lazy;
use rstest::rstest;

use super::*;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serialises tests that read or mutate `PLEXUS_*` variables and restores
/// the previous value on drop.
struct EnvGuard {
    key: &'static str,
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn lock() -> MutexGuard<'static, ()> {
        ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set(key: &'static str, value: &str) -> Self {
        let lock = Self::lock();
        let previous = std::env::var_os(key);
        // Environment mutation is unsafe in edition 2024; the mutex keeps
        // other tests in this crate from observing the override.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("plexus-host")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn defaults_match_documented_values() {
    let config = Config::default();
    assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    assert_eq!(config.cache_ttl_ms(), DEFAULT_CACHE_TTL_MS);
    assert_eq!(config.log_filter(), "warn,plexus=info");
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[test]
fn builders_override_fields() {
    let config = Config::default()
        .with_cache_ttl(Duration::from_millis(250))
        .with_log_filter("plexus_repository=debug")
        .with_log_format(LogFormat::Compact);

    assert_eq!(config.cache_ttl_ms(), 250);
    assert_eq!(config.log_filter(), "plexus_repository=debug");
    assert!(!config.log_format().is_structured());
}

#[rstest]
#[case("json", LogFormat::Json)]
#[case("COMPACT", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(text.parse::<LogFormat>().expect("known format"), expected);
}

#[test]
fn log_format_rejects_unknown_names() {
    let result: Result<LogFormat, LogFormatParseError> = "pretty".parse();
    assert!(result.is_err());
}

#[test]
fn cli_flags_override_defaults() {
    let _lock = EnvGuard::lock();
    let config = Config::load_from_iter(args(&[
        "--cache-ttl-ms",
        "5000",
        "--log-format",
        "compact",
    ]))
    .expect("load configuration");

    assert_eq!(config.cache_ttl(), Duration::from_secs(5));
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[test]
fn environment_overrides_defaults() {
    let _env = EnvGuard::set("PLEXUS_CACHE_TTL_MS", "1234");
    let config = Config::load_from_iter(args(&[])).expect("load configuration");
    assert_eq!(config.cache_ttl_ms(), 1234);
}

#[test]
fn cli_flags_take_precedence_over_environment() {
    let _env = EnvGuard::set("PLEXUS_LOG_FILTER", "warn");
    let config = Config::load_from_iter(args(&["--log-filter", "debug"]))
        .expect("load configuration");
    assert_eq!(config.log_filter(), "debug");
}
