//! Host bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use plexus_config::Config;
use plexus_repository::RepositoryTransport;
use thiserror::Error;
use tracing::{error, info};

use crate::host::PluginHost;
use crate::telemetry::{self, TelemetryError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the host configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader error when no valid configuration can be built.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Loads configuration, installs telemetry and builds a host over
/// `transport`.
///
/// # Errors
///
/// Returns [`BootstrapError::Configuration`] when the loader fails and
/// [`BootstrapError::Telemetry`] when the subscriber cannot be installed.
pub fn bootstrap_with<T: RepositoryTransport>(
    loader: &dyn ConfigLoader,
    transport: T,
) -> Result<PluginHost<T>, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let handle = telemetry::initialise(&config).map_err(|source| {
        error!(%source, "telemetry initialisation failed");
        BootstrapError::Telemetry { source }
    })?;

    info!(
        cache_ttl_ms = config.cache_ttl_ms(),
        log_format = %config.log_format(),
        "plugin host bootstrapped"
    );
    Ok(PluginHost::new(config, transport).with_telemetry(handle))
}
