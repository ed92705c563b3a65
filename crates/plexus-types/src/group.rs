//! Group definitions: registered, immutable aggregates of parts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::{ExportDefinition, ImportDefinition};
use crate::part::PartDefinition;
use crate::registration::{
    ExportRegistrationId, GroupRegistrationId, ImportRegistrationId,
    ScheduleActionRegistrationId, ScheduleConditionRegistrationId,
};
use crate::schedule::{InsertPoint, ScheduleDefinition, ScheduleElementId, ScheduleId};

/// One object registered in a group: a part plus its index among objects of
/// the same type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupObject {
    part: PartDefinition,
    index: usize,
}

impl GroupObject {
    /// Creates a group object.
    #[must_use]
    pub const fn new(part: PartDefinition, index: usize) -> Self {
        Self { part, index }
    }

    /// Returns the part the object instantiates.
    #[must_use]
    pub const fn part(&self) -> &PartDefinition {
        &self.part
    }

    /// Returns the object index among same-typed objects in the group.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Iterates over the object's imports and their ids.
    pub fn imports(&self) -> impl Iterator<Item = (ImportRegistrationId, &ImportDefinition)> {
        self.part.import_ids(self.index)
    }

    /// Iterates over the object's exports and their ids.
    pub fn exports(&self) -> impl Iterator<Item = (ExportRegistrationId, &ExportDefinition)> {
        self.part.export_ids(self.index)
    }
}

/// Internal wiring of a group.
///
/// Either end may sit in a sub-group; an end without a group belongs to the
/// group's own objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartConnection {
    import: ImportRegistrationId,
    export: ExportRegistrationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    import_group: Option<GroupRegistrationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export_group: Option<GroupRegistrationId>,
}

impl PartConnection {
    /// Creates a connection from `export` into `import`, both on the
    /// group's own objects.
    #[must_use]
    pub const fn new(import: ImportRegistrationId, export: ExportRegistrationId) -> Self {
        Self {
            import,
            export,
            import_group: None,
            export_group: None,
        }
    }

    /// Places the import in a sub-group.
    #[must_use]
    pub fn with_import_group(mut self, group: Option<GroupRegistrationId>) -> Self {
        self.import_group = group;
        self
    }

    /// Places the export in a sub-group.
    #[must_use]
    pub fn with_export_group(mut self, group: Option<GroupRegistrationId>) -> Self {
        self.export_group = group;
        self
    }

    /// Returns the satisfied import.
    #[must_use]
    pub const fn import(&self) -> &ImportRegistrationId {
        &self.import
    }

    /// Returns the export feeding the import.
    #[must_use]
    pub const fn export(&self) -> &ExportRegistrationId {
        &self.export
    }

    /// Returns the sub-group owning the import, if any.
    #[must_use]
    pub const fn import_group(&self) -> Option<&GroupRegistrationId> {
        self.import_group.as_ref()
    }

    /// Returns the sub-group owning the export, if any.
    #[must_use]
    pub const fn export_group(&self) -> Option<&GroupRegistrationId> {
        self.export_group.as_ref()
    }

    /// Returns `true` when both ends are the group's own objects.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.import_group.is_none() && self.export_group.is_none()
    }
}

/// Maps a registered schedule action to the schedule element invoking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleActionBinding {
    /// The registered action.
    pub action: ScheduleActionRegistrationId,
    /// The schedule element that invokes the action.
    pub element: ScheduleElementId,
}

/// Maps a registered schedule condition to the schedule element using it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleConditionBinding {
    /// The registered condition.
    pub condition: ScheduleConditionRegistrationId,
    /// The schedule element guarded by the condition.
    pub element: ScheduleElementId,
}

/// A schedule stored with a group, along with its action and condition maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSchedule {
    id: ScheduleId,
    definition: ScheduleDefinition,
    #[serde(default)]
    actions: Vec<ScheduleActionBinding>,
    #[serde(default)]
    conditions: Vec<ScheduleConditionBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_schedules: Vec<ScheduleId>,
}

impl GroupSchedule {
    /// Creates a stored schedule.
    #[must_use]
    pub const fn new(
        id: ScheduleId,
        definition: ScheduleDefinition,
        actions: Vec<ScheduleActionBinding>,
        conditions: Vec<ScheduleConditionBinding>,
    ) -> Self {
        Self {
            id,
            definition,
            actions,
            conditions,
            sub_schedules: Vec::new(),
        }
    }

    /// Records the schedules linked directly from this one.
    #[must_use]
    pub fn with_sub_schedules(mut self, sub_schedules: Vec<ScheduleId>) -> Self {
        self.sub_schedules = sub_schedules;
        self
    }

    /// Returns the schedule id.
    #[must_use]
    pub const fn id(&self) -> ScheduleId {
        self.id
    }

    /// Returns the opaque schedule.
    #[must_use]
    pub const fn definition(&self) -> &ScheduleDefinition {
        &self.definition
    }

    /// Returns the action bindings.
    #[must_use]
    pub fn actions(&self) -> &[ScheduleActionBinding] {
        &self.actions
    }

    /// Returns the condition bindings.
    #[must_use]
    pub fn conditions(&self) -> &[ScheduleConditionBinding] {
        &self.conditions
    }

    /// Returns the schedules linked directly from this one.
    #[must_use]
    pub fn sub_schedules(&self) -> &[ScheduleId] {
        &self.sub_schedules
    }
}

/// The single export a group offers to other groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupExportDefinition {
    contract_name: String,
    containing_group: GroupRegistrationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<ScheduleId>,
    #[serde(default)]
    provided_exports: Vec<ExportRegistrationId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl GroupExportDefinition {
    /// Creates a group export.
    #[must_use]
    pub const fn new(
        contract_name: String,
        containing_group: GroupRegistrationId,
        schedule: Option<ScheduleId>,
        provided_exports: Vec<ExportRegistrationId>,
    ) -> Self {
        Self {
            contract_name,
            containing_group,
            schedule,
            provided_exports,
            metadata: BTreeMap::new(),
        }
    }

    /// Attaches metadata used by selection criteria.
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the group that owns the export.
    #[must_use]
    pub const fn containing_group(&self) -> &GroupRegistrationId {
        &self.containing_group
    }

    /// Returns the exported schedule, if any.
    #[must_use]
    pub const fn schedule(&self) -> Option<ScheduleId> {
        self.schedule
    }

    /// Returns the part exports made available to importing groups.
    #[must_use]
    pub fn provided_exports(&self) -> &[ExportRegistrationId] {
        &self.provided_exports
    }

    /// Returns the metadata declared on the export.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }
}

/// A named import through which a group consumes another group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupImportDefinition {
    contract_name: String,
    containing_group: GroupRegistrationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insert_point: Option<InsertPoint>,
    #[serde(default)]
    imports: Vec<ImportRegistrationId>,
}

impl GroupImportDefinition {
    /// Creates a group import.
    #[must_use]
    pub const fn new(
        contract_name: String,
        containing_group: GroupRegistrationId,
        insert_point: Option<InsertPoint>,
        imports: Vec<ImportRegistrationId>,
    ) -> Self {
        Self {
            contract_name,
            containing_group,
            insert_point,
            imports,
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the group that owns the import.
    #[must_use]
    pub const fn containing_group(&self) -> &GroupRegistrationId {
        &self.containing_group
    }

    /// Returns where the exporting group's schedule is inserted.
    #[must_use]
    pub const fn insert_point(&self) -> Option<&InsertPoint> {
        self.insert_point.as_ref()
    }

    /// Returns the part imports the exporting group must satisfy.
    #[must_use]
    pub fn imports(&self) -> &[ImportRegistrationId] {
        &self.imports
    }
}

/// Everything a group is made of, handed over when it is frozen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupContents {
    /// Registered objects, in registration order.
    pub objects: Vec<GroupObject>,
    /// Groups whose parts this group wires into its own.
    pub sub_groups: Vec<GroupRegistrationId>,
    /// Wiring resolved inside the group.
    pub connections: Vec<PartConnection>,
    /// Stored schedules.
    pub schedules: Vec<GroupSchedule>,
    /// The group export, if one was defined.
    pub export: Option<GroupExportDefinition>,
    /// The group imports.
    pub imports: Vec<GroupImportDefinition>,
}

/// An immutable group of parts with its internal wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    id: GroupRegistrationId,
    #[serde(default)]
    objects: Vec<GroupObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_groups: Vec<GroupRegistrationId>,
    #[serde(default)]
    connections: Vec<PartConnection>,
    #[serde(default)]
    schedules: Vec<GroupSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export: Option<GroupExportDefinition>,
    #[serde(default)]
    imports: Vec<GroupImportDefinition>,
}

impl GroupDefinition {
    /// Freezes the given contents into a group.
    #[must_use]
    pub fn new(id: GroupRegistrationId, contents: GroupContents) -> Self {
        let GroupContents {
            objects,
            sub_groups,
            connections,
            schedules,
            export,
            imports,
        } = contents;
        Self {
            id,
            objects,
            sub_groups,
            connections,
            schedules,
            export,
            imports,
        }
    }

    /// Returns the group id.
    #[must_use]
    pub const fn id(&self) -> &GroupRegistrationId {
        &self.id
    }

    /// Returns the registered objects in registration order.
    #[must_use]
    pub fn objects(&self) -> &[GroupObject] {
        &self.objects
    }

    /// Returns the sub-groups available to the group's wiring.
    #[must_use]
    pub fn sub_groups(&self) -> &[GroupRegistrationId] {
        &self.sub_groups
    }

    /// Returns the internal wiring.
    #[must_use]
    pub fn connections(&self) -> &[PartConnection] {
        &self.connections
    }

    /// Returns the stored schedules.
    #[must_use]
    pub fn schedules(&self) -> &[GroupSchedule] {
        &self.schedules
    }

    /// Returns the group export.
    #[must_use]
    pub const fn export(&self) -> Option<&GroupExportDefinition> {
        self.export.as_ref()
    }

    /// Returns the group imports.
    #[must_use]
    pub fn imports(&self) -> &[GroupImportDefinition] {
        &self.imports
    }

    /// Returns the export wired into `import` of one of the group's own
    /// objects.
    #[must_use]
    pub fn connected_export(&self, import: &ImportRegistrationId) -> Option<&ExportRegistrationId> {
        self.connections
            .iter()
            .find(|connection| connection.import_group().is_none() && connection.import() == import)
            .map(PartConnection::export)
    }

    /// Looks up the definition behind an import id.
    #[must_use]
    pub fn import_definition(&self, id: &ImportRegistrationId) -> Option<&ImportDefinition> {
        self.objects
            .iter()
            .flat_map(GroupObject::imports)
            .find(|(candidate, _)| candidate == id)
            .map(|(_, definition)| definition)
    }

    /// Looks up the definition behind an export id.
    #[must_use]
    pub fn export_definition(&self, id: &ExportRegistrationId) -> Option<&ExportDefinition> {
        self.objects
            .iter()
            .flat_map(GroupObject::exports)
            .find(|(candidate, _)| candidate == id)
            .map(|(_, definition)| definition)
    }
}
