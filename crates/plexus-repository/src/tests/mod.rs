//! Unit tests for the plexus-repository crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mockall::mock;
use plexus_types::{
    AssemblyName, GroupContents, GroupDefinition, GroupRegistrationId, PartDefinition,
    RepositoryId, RepositoryPluginInformation, TypeDescriptor, TypeIdentity,
};

use crate::{ManualClock, RepositoryCache, RepositoryTransport, TransportError};


const TTL: Duration = Duration::from_secs(60);

mock! {
    Transport {}
    impl RepositoryTransport for Transport {
        fn repositories(&self) -> Vec<RepositoryId>;
        fn is_connected_to_repository(&self, repository: &RepositoryId) -> bool;
        fn plugin_information_from(
            &self,
            repository: &RepositoryId,
        ) -> Result<RepositoryPluginInformation, TransportError>;
    }
}

// ---------------------------------------------------------------------------
// Simulated remote side
// ---------------------------------------------------------------------------

/// What the repositories behind the mocked transport currently hold.
#[derive(Debug, Default)]
struct Remote {
    contents: BTreeMap<RepositoryId, RepositoryPluginInformation>,
    connected: BTreeSet<RepositoryId>,
    failing: BTreeSet<RepositoryId>,
    fetches: usize,
}

#[derive(Debug, Clone, Default)]
struct SharedRemote(Arc<Mutex<Remote>>);

impl SharedRemote {
    fn lock(&self) -> MutexGuard<'_, Remote> {
        self.0.lock().expect("remote lock")
    }

    fn publish(&self, repository: &str, information: RepositoryPluginInformation) {
        let id = RepositoryId::new(repository);
        let mut remote = self.lock();
        remote.contents.insert(id.clone(), information);
        remote.connected.insert(id);
    }

    fn disconnect(&self, repository: &str) {
        self.lock().connected.remove(&RepositoryId::new(repository));
    }

    fn fail(&self, repository: &str) {
        self.lock().failing.insert(RepositoryId::new(repository));
    }

    fn fetches(&self) -> usize {
        self.lock().fetches
    }

    /// Builds a transport answering from the shared remote state.
    fn transport(&self) -> MockTransport {
        let mut transport = MockTransport::new();

        let listed = self.clone();
        transport
            .expect_repositories()
            .returning(move || listed.lock().contents.keys().cloned().collect());

        let connected = self.clone();
        transport
            .expect_is_connected_to_repository()
            .returning(move |repository| connected.lock().connected.contains(repository));

        let fetched = self.clone();
        transport
            .expect_plugin_information_from()
            .returning(move |repository| {
                let mut remote = fetched.lock();
                remote.fetches += 1;
                if remote.failing.contains(repository) {
                    return Err(TransportError::unreachable(repository, "connection refused"));
                }
                Ok(remote.contents.get(repository).cloned().unwrap_or_default())
            });

        transport
    }
}

struct Harness {
    remote: SharedRemote,
    clock: ManualClock,
    cache: RepositoryCache<MockTransport, ManualClock>,
}

impl Harness {
    fn with_ttl(ttl: Duration) -> Self {
        let remote = SharedRemote::default();
        let clock = ManualClock::new();
        let cache = RepositoryCache::with_clock(remote.transport(), ttl, clock.clone());
        Self {
            remote,
            clock,
            cache,
        }
    }

    fn new() -> Self {
        Self::with_ttl(TTL)
    }

    fn expire(&self) {
        self.clock.advance(TTL + Duration::from_secs(1));
    }
}

// ---------------------------------------------------------------------------
// Metadata builders
// ---------------------------------------------------------------------------

fn plugin_type(name: &str) -> TypeIdentity {
    TypeIdentity::new(name, "Plugins", AssemblyName::new("plugins", "1.0.0.0"))
}

fn types(names: &[&str]) -> RepositoryPluginInformation {
    RepositoryPluginInformation::new(
        names
            .iter()
            .map(|name| TypeDescriptor::class(plugin_type(name)))
            .collect(),
        Vec::new(),
        Vec::new(),
    )
}

fn parts(names: &[&str]) -> RepositoryPluginInformation {
    RepositoryPluginInformation::new(
        Vec::new(),
        names
            .iter()
            .map(|name| PartDefinition::new(plugin_type(name)))
            .collect(),
        Vec::new(),
    )
}

fn typed_parts(names: &[&str]) -> RepositoryPluginInformation {
    let (descriptors, _, _) = types(names).into_parts();
    let (_, definitions, _) = parts(names).into_parts();
    RepositoryPluginInformation::new(descriptors, definitions, Vec::new())
}

fn groups(ids: &[&str]) -> RepositoryPluginInformation {
    RepositoryPluginInformation::new(
        Vec::new(),
        Vec::new(),
        ids.iter()
            .map(|id| GroupDefinition::new(GroupRegistrationId::new(*id), GroupContents::default()))
            .collect(),
    )
}
