//! Unit tests for the plexus-host crate.

use std::sync::{Arc, Mutex, MutexGuard};

use mockall::mock;
use plexus_repository::{RepositoryTransport, TransportError};
use plexus_types::{
    AssemblyName, ExportDefinition, GroupDefinition, ImportDefinition, PartDefinition,
    PropertyDescriptor, RepositoryId, RepositoryPluginInformation, TypeDescriptor, TypeIdentity,
};


const REPOSITORY: &str = "local";
const SERVICE: &str = "service";

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

fn plugin_type(name: &str) -> TypeIdentity {
    TypeIdentity::new(name, "Plugins", AssemblyName::new("plugins", "1.0.0.0"))
}

/// `Provider` exports itself under [`SERVICE`].
fn provider_part() -> PartDefinition {
    let identity = plugin_type("Provider");
    let export = ExportDefinition::on_type(SERVICE, identity.clone()).expect("valid export");
    PartDefinition::new(identity)
        .with_export(export)
        .expect("unique export")
}

/// `Consumer` imports [`SERVICE`] through a property typed as `Provider`.
fn consumer_part() -> PartDefinition {
    let identity = plugin_type("Consumer");
    let property = PropertyDescriptor::new("Service", identity.clone(), plugin_type("Provider"));
    let import = ImportDefinition::on_property(SERVICE, property).expect("valid import");
    PartDefinition::new(identity)
        .with_import(import)
        .expect("unique import")
}

// ---------------------------------------------------------------------------
// Simulated repository
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Contents {
    parts: Vec<PartDefinition>,
    groups: Vec<GroupDefinition>,
    fetches: usize,
}

/// A single connected repository whose contents tests can change.
#[derive(Debug, Clone, Default)]
struct Remote(Arc<Mutex<Contents>>);

impl Remote {
    /// A repository offering the `Provider` and `Consumer` parts.
    fn with_parts() -> Self {
        let remote = Self::default();
        remote.lock().parts = vec![provider_part(), consumer_part()];
        remote
    }

    fn lock(&self) -> MutexGuard<'_, Contents> {
        self.0.lock().expect("remote lock")
    }

    fn publish_group(&self, group: GroupDefinition) {
        self.lock().groups.push(group);
    }

    fn fetches(&self) -> usize {
        self.lock().fetches
    }

    fn transport(&self) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_repositories()
            .returning(|| vec![RepositoryId::new(REPOSITORY)]);
        transport
            .expect_is_connected_to_repository()
            .returning(|repository| repository.as_str() == REPOSITORY);

        let served = self.clone();
        transport
            .expect_plugin_information_from()
            .returning(move |_| {
                let mut contents = served.lock();
                contents.fetches += 1;
                let types = contents
                    .parts
                    .iter()
                    .map(|part| TypeDescriptor::class(part.identity().clone()))
                    .collect();
                Ok(RepositoryPluginInformation::new(
                    types,
                    contents.parts.clone(),
                    contents.groups.clone(),
                ))
            });
        transport
    }
}
