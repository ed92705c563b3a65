//! Repository cache with per-repository expiry.
//!
//! The cache mirrors the types, parts and groups held by every connected
//! repository. Each repository snapshot stays fresh for the configured
//! lifetime. Lookups that hit stale data reload the repositories backing
//! it, and lookups that miss pull stale or unknown repositories until the
//! item shows up.
//!
//! All state, including the transport, sits behind one mutex that every
//! public method holds for its whole duration.

mod state;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use plexus_catalog::{CompatibilityResolver, ConnectParts, WrapperKinds};
use plexus_types::{
    ExportDefinition, GroupDefinition, GroupRegistrationId, ImportDefinition, PartDefinition,
    RepositoryId, TypeDescriptor, TypeIdentity,
};
use tracing::{debug, warn};

use self::state::CacheState;
use crate::clock::{Clock, SystemClock};
use crate::error::RepositoryError;
use crate::transport::{RepositoryEvent, RepositoryTransport};

struct Guarded<T> {
    transport: T,
    state: CacheState,
}

/// Thread-safe cache of repository metadata.
pub struct RepositoryCache<T, C = SystemClock> {
    guarded: Mutex<Guarded<T>>,
    clock: C,
    ttl: Duration,
    wrappers: WrapperKinds,
}

impl<T: RepositoryTransport> RepositoryCache<T> {
    /// Creates a cache over `transport` whose snapshots stay fresh for `ttl`.
    #[must_use]
    pub fn new(transport: T, ttl: Duration) -> Self {
        Self::with_clock(transport, ttl, SystemClock)
    }
}

impl<T: RepositoryTransport, C: Clock> RepositoryCache<T, C> {
    /// Creates a cache that reads time from `clock`.
    #[must_use]
    pub fn with_clock(transport: T, ttl: Duration, clock: C) -> Self {
        Self {
            guarded: Mutex::new(Guarded {
                transport,
                state: CacheState::default(),
            }),
            clock,
            ttl,
            wrappers: WrapperKinds::default(),
        }
    }

    /// Replaces the wrapper definitions used by [`Self::accepts`].
    #[must_use]
    pub fn with_wrappers(mut self, wrappers: WrapperKinds) -> Self {
        self.wrappers = wrappers;
        self
    }

    /// Returns how long a repository snapshot stays fresh.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the wrapper definitions used by [`Self::accepts`].
    #[must_use]
    pub const fn wrappers(&self) -> &WrapperKinds {
        &self.wrappers
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Reloads a repository that just became reachable.
    pub fn on_repository_connected(&self, repository: &RepositoryId) {
        let mut guarded = self.lock();
        self.reload(&mut guarded, repository);
    }

    /// Reloads a repository whose contents changed.
    pub fn on_repository_updated(&self, repository: &RepositoryId) {
        let mut guarded = self.lock();
        self.reload(&mut guarded, repository);
    }

    /// Drops everything a repository contributed.
    pub fn on_repository_disconnected(&self, repository: &RepositoryId) {
        let mut guarded = self.lock();
        if guarded.state.forget(repository) {
            debug!(%repository, "dropped disconnected repository");
        }
    }

    /// Dispatches a transport notification.
    pub fn handle(&self, event: &RepositoryEvent) {
        match event {
            RepositoryEvent::Connected(repository) => self.on_repository_connected(repository),
            RepositoryEvent::Updated(repository) => self.on_repository_updated(repository),
            RepositoryEvent::Disconnected(repository) => {
                self.on_repository_disconnected(repository);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Returns the descriptor of a type.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownTypeDefinition`] when no connected
    /// repository provides the type.
    pub fn type_by_identity(
        &self,
        identity: &TypeIdentity,
    ) -> Result<TypeDescriptor, RepositoryError> {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| state.type_sources(identity));
        guarded
            .state
            .catalog()
            .lookup(identity)
            .cloned()
            .map_err(|_| RepositoryError::unknown_type_definition(identity))
    }

    /// Returns the descriptor of the type with the given assembly-qualified
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownTypeDefinition`] when no connected
    /// repository provides the type.
    pub fn type_by_name(&self, name: &str) -> Result<TypeDescriptor, RepositoryError> {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| {
            state
                .type_named(name)
                .and_then(|identity| state.type_sources(identity))
        });
        guarded
            .state
            .catalog()
            .lookup_by_name(name)
            .cloned()
            .map_err(|_| RepositoryError::unknown_type_definition(name))
    }

    /// Returns the part defined for a type.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownPartDefinition`] when no connected
    /// repository provides the part.
    pub fn part(&self, identity: &TypeIdentity) -> Result<PartDefinition, RepositoryError> {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| state.part_sources(identity));
        guarded
            .state
            .part(identity)
            .cloned()
            .ok_or_else(|| RepositoryError::unknown_part_definition(identity))
    }

    /// Returns the part whose type has the given assembly-qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownPartDefinition`] when no connected
    /// repository provides the part.
    pub fn part_by_name(&self, name: &str) -> Result<PartDefinition, RepositoryError> {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| {
            state
                .part_named(name)
                .and_then(|part| state.part_sources(part.identity()))
        });
        guarded
            .state
            .part_named(name)
            .cloned()
            .ok_or_else(|| RepositoryError::unknown_part_definition(name))
    }

    /// Returns a group.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownGroupDefinition`] when no connected
    /// repository provides the group.
    pub fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError> {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| state.group_sources(id));
        guarded
            .state
            .group(id)
            .cloned()
            .ok_or_else(|| RepositoryError::unknown_group_definition(id))
    }

    /// Returns every cached part after reloading expired repositories.
    #[must_use]
    pub fn parts(&self) -> Vec<PartDefinition> {
        let mut guarded = self.lock();
        self.reload_expired(&mut guarded);
        guarded.state.parts().cloned().collect()
    }

    /// Returns every cached group after reloading expired repositories.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupDefinition> {
        let mut guarded = self.lock();
        self.reload_expired(&mut guarded);
        guarded.state.groups().cloned().collect()
    }

    /// Returns `true` when some connected repository describes the type.
    #[must_use]
    pub fn contains_definition_for_type(&self, identity: &TypeIdentity) -> bool {
        self.type_by_identity(identity).is_ok()
    }

    /// Returns `true` when `child` is a proper subtype of `parent`.
    ///
    /// Both types are looked up first, so stale or missing descriptors are
    /// reloaded before the subtype graph is consulted.
    #[must_use]
    pub fn is_subtype_of(&self, parent: &TypeIdentity, child: &TypeIdentity) -> bool {
        let mut guarded = self.lock();
        self.refresh_for(&mut guarded, |state| state.type_sources(parent));
        self.refresh_for(&mut guarded, |state| state.type_sources(child));
        guarded.state.catalog().is_subtype_of(parent, child)
    }

    /// Returns `true` when `export` satisfies `import`.
    ///
    /// Expired repositories are reloaded first, and the required and
    /// produced types are loaded when missing, so the answer never rests on
    /// a stale subtype graph.
    #[must_use]
    pub fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        let mut guarded = self.lock();
        self.reload_expired(&mut guarded);
        let required = import.required_type();
        if !required.is_blank() {
            self.refresh_for(&mut guarded, |state| state.type_sources(required));
        }
        if let Some(produced) = export.produced_type() {
            self.refresh_for(&mut guarded, |state| state.type_sources(produced));
        }
        CompatibilityResolver::new(guarded.state.catalog(), &self.wrappers).accepts(import, export)
    }

    /// Lists the repositories currently holding cached data, sorted by id.
    #[must_use]
    pub fn known_repositories(&self) -> Vec<RepositoryId> {
        let guarded = self.lock();
        let mut repositories: Vec<RepositoryId> = guarded.state.repositories().cloned().collect();
        repositories.sort();
        repositories
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Acquires the cache lock.
    ///
    /// A panic while the lock was held leaves the state structurally valid,
    /// so a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Guarded<T>> {
        self.guarded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reload(&self, guarded: &mut Guarded<T>, repository: &RepositoryId) {
        guarded.state.forget(repository);
        if !guarded.transport.is_connected_to_repository(repository) {
            debug!(%repository, "repository not connected; nothing to load");
            return;
        }

        match guarded.transport.plugin_information_from(repository) {
            Ok(information) => {
                let expires_at = self.clock.now().checked_add(self.ttl);
                debug!(
                    %repository,
                    types = information.types().len(),
                    parts = information.parts().len(),
                    groups = information.groups().len(),
                    "loaded repository"
                );
                guarded.state.absorb(repository, information, expires_at);
            }
            Err(error) => {
                warn!(%repository, %error, "failed to load repository; treating it as empty");
            }
        }
    }

    fn reload_expired(&self, guarded: &mut Guarded<T>) {
        let now = self.clock.now();
        for repository in guarded.state.expired(now) {
            self.reload(guarded, &repository);
        }
    }

    /// Makes sure the item described by `sources` is backed by fresh data.
    ///
    /// `sources` returns the repositories providing the item, or `None` when
    /// the item is not cached.
    fn refresh_for(
        &self,
        guarded: &mut Guarded<T>,
        sources: impl Fn(&CacheState) -> Option<Vec<RepositoryId>>,
    ) {
        let now = self.clock.now();
        if let Some(backing) = sources(&guarded.state) {
            let stale: Vec<RepositoryId> = backing
                .into_iter()
                .filter(|repository| !guarded.state.is_fresh(repository, now))
                .collect();
            for repository in &stale {
                self.reload(guarded, repository);
            }
            return;
        }

        let candidates: Vec<RepositoryId> = guarded
            .transport
            .repositories()
            .into_iter()
            .filter(|repository| {
                !guarded.state.is_fresh(repository, now)
                    && guarded.transport.is_connected_to_repository(repository)
            })
            .collect();
        for repository in &candidates {
            self.reload(guarded, repository);
            if sources(&guarded.state).is_some() {
                break;
            }
        }
    }
}

impl<T: RepositoryTransport, C: Clock> ConnectParts for RepositoryCache<T, C> {
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        Self::accepts(self, import, export)
    }
}

impl<T, C> std::fmt::Debug for RepositoryCache<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
