//! Log output for the plugin host.
//!
//! Every Plexus crate logs under its module path, so a `plexus` directive
//! in the configured filter selects all of them. Work done through a
//! [`PluginHost`](crate::PluginHost) runs inside a `plexus.host` span that
//! records the cache lifetime and log format, and structured output copies
//! that span onto each cache and composition event.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use plexus_config::{Config, LogFormat};
use tracing::{Span, info, info_span, subscriber::SetGlobalDefaultError};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// A global subscriber was already installed elsewhere.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls return a [`TelemetryHandle`] without touching global state.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber was
/// installed outside this function.
///
/// # Examples
///
/// ```rust
/// use plexus_config::Config;
/// use plexus_host::telemetry;
///
/// # fn main() -> Result<(), plexus_host::TelemetryError> {
/// let config = Config::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// assert_eq!(first, second);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Opens the span that host operations run in.
#[must_use]
pub fn host_span(config: &Config) -> Span {
    info_span!(
        target: "plexus_host",
        "plexus.host",
        cache_ttl_ms = config.cache_ttl_ms(),
        log_format = %config.log_format(),
    )
}

/// Parses the configured filter directive.
pub(crate) fn filter_for(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

/// Builds the formatting layer for `format`, writing to `writer`.
///
/// Structured events are flattened and carry the innermost span, which
/// inside a host is `plexus.host`.
pub(crate) fn output_layer<W>(
    format: LogFormat,
    writer: W,
    ansi: bool,
) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    if format.is_structured() {
        layer
            .with_ansi(false)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed()
    } else {
        layer.with_ansi(ansi).compact().boxed()
    }
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter = filter_for(config)?;
    let output = output_layer(config.log_format(), io::stderr, io::stderr().is_terminal());
    let subscriber = tracing_subscriber::registry().with(output).with(filter);

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    info!(
        target: "plexus_host",
        filter = config.log_filter(),
        log_format = %config.log_format(),
        "telemetry installed"
    );
    Ok(())
}
