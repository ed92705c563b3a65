//! Unit tests for the plexus-composition crate.

use std::collections::BTreeMap;

use mockall::mock;
use plexus_catalog::ConnectParts;
use plexus_repository::RepositoryError;
use plexus_types::{
    AssemblyName, ExportDefinition, GroupDefinition, GroupImportDefinition, GroupRegistrationId,
    ImportDefinition, PartDefinition, PropertyDescriptor, TypeIdentity, contract_names_match,
};

use crate::{GroupDefinitionBuilder, GroupSource, SelectionCriteria};

mod engine_tests;

/// Contract shared by the provider export and the consumer import.
const SERVICE: &str = "service";

mock! {
    Connector {}
    impl ConnectParts for Connector {
        fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool;
    }
}

/// A connector accepting any export whose contract name matches the import.
fn matching_connector() -> MockConnector {
    let mut connector = MockConnector::new();
    connector.expect_accepts().returning(|import, export| {
        contract_names_match(import.contract_name(), export.contract_name())
    });
    connector
}

/// A connector that accepts nothing.
fn rejecting_connector() -> MockConnector {
    let mut connector = MockConnector::new();
    connector.expect_accepts().return_const(false);
    connector
}

// ---------------------------------------------------------------------------
// Part builders
// ---------------------------------------------------------------------------

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

fn known_parts() -> Vec<PartDefinition> {
    vec![provider_part(), consumer_part()]
}

// ---------------------------------------------------------------------------
// Group builders
// ---------------------------------------------------------------------------

type TestBuilder<'a> = GroupDefinitionBuilder<MockConnector, &'a mut dyn FnMut(GroupDefinition)>;

/// Runs `build` against a fresh builder and returns the stored groups.
fn build_groups(build: impl FnOnce(&mut TestBuilder<'_>)) -> Vec<GroupDefinition> {
    let mut stored = Vec::new();
    let mut store = |group: GroupDefinition| stored.push(group);
    {
        let storage: &mut dyn FnMut(GroupDefinition) = &mut store;
        let mut builder = GroupDefinitionBuilder::new(known_parts(), matching_connector(), storage);
        build(&mut builder);
    }
    stored
}

fn single_group(build: impl FnOnce(&mut TestBuilder<'_>)) -> GroupDefinition {
    build_groups(build)
        .pop()
        .expect("the build should register a group")
}

fn metadata(pairs: &[(&str, &str)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), serde_json::Value::from(*value)))
        .collect()
}

fn criteria(pairs: &[(&str, &str)]) -> SelectionCriteria {
    metadata(pairs)
}

/// A group whose single `Provider` is offered under `contract`.
fn exporting_group(name: &str, contract: &str, tags: &[(&str, &str)]) -> GroupDefinition {
    single_group(|builder| {
        builder
            .register_object(&plugin_type("Provider"))
            .expect("known part");
        builder
            .define_export_with_metadata(contract, metadata(tags))
            .expect("first export");
        builder.register(name);
    })
}

/// A group whose single `Consumer` needs `contract` from outside.
fn importing_group(name: &str, contract: &str) -> GroupDefinition {
    single_group(|builder| {
        let consumer = builder
            .register_object(&plugin_type("Consumer"))
            .expect("known part");
        builder
            .define_import(contract, None, consumer.imports().to_vec())
            .expect("first import");
        builder.register(name);
    })
}

/// A group that both imports and exports `contract`.
fn relay_group(name: &str, contract: &str) -> GroupDefinition {
    single_group(|builder| {
        let consumer = builder
            .register_object(&plugin_type("Consumer"))
            .expect("known part");
        builder
            .register_object(&plugin_type("Provider"))
            .expect("known part");
        builder
            .define_import(contract, None, consumer.imports().to_vec())
            .expect("first import");
        builder.define_export(contract).expect("first export");
        builder.register(name);
    })
}

fn first_import(group: &GroupDefinition) -> GroupImportDefinition {
    group
        .imports()
        .first()
        .cloned()
        .expect("group should declare an import")
}

// ---------------------------------------------------------------------------
// Group source
// ---------------------------------------------------------------------------

/// In-memory group source keyed by group id.
#[derive(Debug, Default)]
struct Groups(BTreeMap<GroupRegistrationId, GroupDefinition>);

impl Groups {
    fn of(groups: impl IntoIterator<Item = GroupDefinition>) -> Self {
        Self(
            groups
                .into_iter()
                .map(|group| (group.id().clone(), group))
                .collect(),
        )
    }
}

impl GroupSource for Groups {
    fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError> {
        self.0
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::unknown_group_definition(id))
    }

    fn groups(&self) -> Vec<GroupDefinition> {
        self.0.values().cloned().collect()
    }
}
