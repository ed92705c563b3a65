//! The facade tying configuration, repository cache and composition together.

use std::sync::Arc;

use plexus_composition::{GroupDefinitionBuilder, GroupImportEngine, GroupSelector};
use plexus_config::Config;
use plexus_repository::{Clock, RepositoryCache, RepositoryEvent, RepositoryTransport, SystemClock};
use plexus_types::GroupDefinition;
use tracing::{Span, debug};

use crate::telemetry::{self, TelemetryHandle};

/// Repository cache shared between the host and the composition components.
pub type SharedCache<T, C = SystemClock> = Arc<RepositoryCache<T, C>>;

/// Builder whose parts and wiring checks come from the host cache.
pub type HostGroupBuilder<T, S, C = SystemClock> = GroupDefinitionBuilder<SharedCache<T, C>, S>;

/// Selector reading groups and part compatibility from the host cache.
pub type HostGroupSelector<T, C = SystemClock> =
    GroupSelector<SharedCache<T, C>, SharedCache<T, C>>;

/// Entry point for hosts composing plugins from remote repositories.
pub struct PluginHost<T, C = SystemClock> {
    config: Config,
    cache: SharedCache<T, C>,
    telemetry: Option<TelemetryHandle>,
    span: Span,
}

impl<T: RepositoryTransport> PluginHost<T> {
    /// Creates a host whose cache keeps snapshots for the configured
    /// lifetime.
    #[must_use]
    pub fn new(config: Config, transport: T) -> Self {
        Self::with_clock(config, transport, SystemClock)
    }
}

impl<T: RepositoryTransport, C: Clock> PluginHost<T, C> {
    /// Creates a host whose cache reads time from `clock`.
    #[must_use]
    pub fn with_clock(config: Config, transport: T, clock: C) -> Self {
        let span = telemetry::host_span(&config);
        let cache = span.in_scope(|| {
            debug!("created repository cache");
            RepositoryCache::with_clock(transport, config.cache_ttl(), clock)
        });
        Self {
            config,
            cache: Arc::new(cache),
            telemetry: None,
            span,
        }
    }

    #[must_use]
    pub(crate) const fn with_telemetry(mut self, handle: TelemetryHandle) -> Self {
        self.telemetry = Some(handle);
        self
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the telemetry handle when the host was bootstrapped.
    #[must_use]
    pub const fn telemetry(&self) -> Option<TelemetryHandle> {
        self.telemetry
    }

    /// Returns the span host operations run in.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Returns the repository cache.
    #[must_use]
    pub const fn cache(&self) -> &SharedCache<T, C> {
        &self.cache
    }

    /// Forwards a transport notification to the cache.
    pub fn handle(&self, event: &RepositoryEvent) {
        let _entered = self.span.enter();
        self.cache.handle(event);
    }

    /// Creates a group builder over every part currently offered by the
    /// connected repositories.
    ///
    /// Registered groups are passed to `storage`.
    #[must_use]
    pub fn group_builder<S>(&self, storage: S) -> HostGroupBuilder<T, S, C>
    where
        S: FnMut(GroupDefinition),
    {
        let parts = self.span.in_scope(|| self.cache.parts());
        GroupDefinitionBuilder::new(parts, Arc::clone(&self.cache), storage)
    }

    /// Creates a selector with an empty composition graph over the groups
    /// offered by the connected repositories.
    #[must_use]
    pub fn group_selector(&self) -> HostGroupSelector<T, C> {
        GroupSelector::new(GroupImportEngine::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.cache),
        ))
    }
}

impl<T, C> std::fmt::Debug for PluginHost<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("config", &self.config)
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}
