//! Tests for group-level matching.

use plexus_types::{
    GroupDefinition, GroupExportDefinition, GroupImportDefinition, GroupRegistrationId,
    InsertPoint, ScheduleElementId, ScheduleId,
};
use rstest::{fixture, rstest};

use super::{
    Groups, MockConnector, SERVICE, criteria, exporting_group, first_import, importing_group,
    matching_connector, metadata, rejecting_connector, relay_group,
};
use crate::{GroupImportEngine, export_passes_selection_criteria};

fn bare_import(contract: &str, insert_point: Option<InsertPoint>) -> GroupImportDefinition {
    GroupImportDefinition::new(
        contract.to_owned(),
        GroupRegistrationId::new("importer"),
        insert_point,
        Vec::new(),
    )
}

fn bare_export(contract: &str, schedule: Option<ScheduleId>) -> GroupExportDefinition {
    GroupExportDefinition::new(
        contract.to_owned(),
        GroupRegistrationId::new("exporter"),
        schedule,
        Vec::new(),
    )
}

fn insert_point() -> InsertPoint {
    InsertPoint::new(ScheduleElementId::new(3))
}

struct Catalogue {
    importer: GroupDefinition,
    prod: GroupDefinition,
    dev: GroupDefinition,
    other: GroupDefinition,
}

#[fixture]
fn catalogue() -> Catalogue {
    Catalogue {
        importer: importing_group("importer", "storage"),
        prod: exporting_group("storage-prod", "storage", &[("env", "prod")]),
        dev: exporting_group("storage-dev", "storage", &[("env", "dev")]),
        other: exporting_group("metrics", "metrics", &[("env", "prod")]),
    }
}

fn engine_over(
    groups: &Catalogue,
    connector: MockConnector,
) -> GroupImportEngine<Groups, MockConnector> {
    let source = Groups::of([
        groups.importer.clone(),
        groups.prod.clone(),
        groups.dev.clone(),
        groups.other.clone(),
    ]);
    GroupImportEngine::new(source, connector)
}

fn ids(groups: &[GroupDefinition]) -> Vec<&str> {
    groups.iter().map(|group| group.id().as_str()).collect()
}

// ---------------------------------------------------------------------------
// Acceptance
// ---------------------------------------------------------------------------

#[rstest]
#[case::matching_names("storage", "storage", true)]
#[case::names_ignore_case("storage", "Storage", true)]
#[case::different_names("storage", "metrics", false)]
fn contract_names_decide_bare_matches(
    #[case] import: &str,
    #[case] export: &str,
    #[case] expected: bool,
) {
    let engine = GroupImportEngine::new(Groups::default(), matching_connector());
    assert_eq!(
        engine.accepts(&bare_import(import, None), &bare_export(export, None)),
        expected
    );
}

#[rstest]
#[case::without_schedule(None, false)]
#[case::with_schedule(Some(ScheduleId::new(0)), true)]
fn insert_point_requires_exported_schedule(
    #[case] schedule: Option<ScheduleId>,
    #[case] expected: bool,
) {
    let engine = GroupImportEngine::new(Groups::default(), matching_connector());
    let import = bare_import(SERVICE, Some(insert_point()));
    assert_eq!(
        engine.accepts(&import, &bare_export(SERVICE, schedule)),
        expected
    );
}

#[rstest]
fn part_imports_are_matched_against_provided_exports(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, matching_connector());
    let import = first_import(&catalogue.importer);
    let export = catalogue.prod.export().expect("prod export");

    assert!(engine.accepts(&import, export));
}

#[rstest]
fn rejected_part_imports_fail_the_group_match(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, rejecting_connector());
    let import = first_import(&catalogue.importer);
    let export = catalogue.prod.export().expect("prod export");

    assert!(!engine.accepts(&import, export));
}

#[rstest]
fn groups_missing_from_the_source_never_match(catalogue: Catalogue) {
    let engine = GroupImportEngine::new(
        Groups::of([catalogue.importer.clone()]),
        matching_connector(),
    );
    let import = first_import(&catalogue.importer);
    let export = catalogue.prod.export().expect("prod export");

    assert!(!engine.accepts(&import, export));
}

// ---------------------------------------------------------------------------
// Part-level wiring
// ---------------------------------------------------------------------------

#[rstest]
fn connection_maps_each_part_import_to_provided_exports(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, matching_connector());
    let import = first_import(&catalogue.importer);
    let provided = catalogue
        .prod
        .export()
        .expect("prod export")
        .provided_exports()
        .to_vec();

    let mappings = engine.generate_connection_for(&catalogue.importer, &import, &catalogue.prod);

    assert_eq!(mappings.len(), 1);
    let mapping = mappings.first().expect("one mapping");
    assert_eq!(Some(mapping.import()), import.imports().first());
    assert_eq!(mapping.exports(), provided.as_slice());
}

#[rstest]
fn unsatisfied_part_imports_map_to_nothing(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, rejecting_connector());
    let import = first_import(&catalogue.importer);

    let mappings = engine.generate_connection_for(&catalogue.importer, &import, &catalogue.prod);

    assert!(mappings.iter().all(|mapping| mapping.exports().is_empty()));
    assert_eq!(mappings.len(), import.imports().len());
}

#[rstest]
fn groups_without_an_export_map_nothing(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, matching_connector());
    let import = first_import(&catalogue.importer);

    let mappings =
        engine.generate_connection_for(&catalogue.importer, &import, &catalogue.importer);

    assert!(mappings.is_empty());
}

// ---------------------------------------------------------------------------
// Selection criteria
// ---------------------------------------------------------------------------

#[rstest]
#[case::empty(&[], true)]
#[case::equal(&[("env", "prod")], true)]
#[case::different_value(&[("env", "dev")], false)]
#[case::missing_key(&[("region", "eu")], false)]
fn criteria_match_export_metadata_exactly(
    #[case] wanted: &[(&str, &str)],
    #[case] expected: bool,
) {
    let export = bare_export(SERVICE, None).with_metadata(metadata(&[("env", "prod")]));
    assert_eq!(
        export_passes_selection_criteria(&export, &criteria(wanted)),
        expected
    );
}

#[rstest]
fn matching_groups_filters_by_criteria_alone(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, matching_connector());

    let found = engine.matching_groups(None, &criteria(&[("env", "prod")]));

    assert_eq!(ids(&found), vec!["metrics", "storage-prod"]);
}

#[rstest]
fn matching_groups_filters_by_import_and_criteria(catalogue: Catalogue) {
    let engine = engine_over(&catalogue, matching_connector());
    let import = first_import(&catalogue.importer);

    let any = engine.matching_groups(Some(&import), &criteria(&[]));
    let prod = engine.matching_groups(Some(&import), &criteria(&[("env", "prod")]));
    let staging = engine.matching_groups(Some(&import), &criteria(&[("env", "staging")]));

    assert_eq!(ids(&any), vec!["storage-dev", "storage-prod"]);
    assert_eq!(ids(&prod), vec!["storage-prod"]);
    assert!(staging.is_empty());
}

#[rstest]
fn importing_group_is_never_offered_to_itself() {
    let relay = relay_group("relay", "storage");
    let engine = GroupImportEngine::new(Groups::of([relay.clone()]), matching_connector());
    let import = first_import(&relay);

    assert!(engine.matching_groups(Some(&import), &criteria(&[])).is_empty());
}
