//! Incremental construction of group definitions.

use std::collections::{BTreeMap, HashMap};

use plexus_catalog::ConnectParts;
use plexus_types::{
    ExportDefinition, ExportRegistrationId, GroupContents, GroupDefinition,
    GroupExportDefinition, GroupImportDefinition, GroupObject, GroupRegistrationId, GroupSchedule,
    ImportDefinition, ImportRegistrationId, InsertPoint, PartConnection, PartDefinition,
    ScheduleActionBinding, ScheduleActionRegistrationId, ScheduleConditionBinding,
    ScheduleConditionRegistrationId, ScheduleDefinition, ScheduleElementId, ScheduleId,
    TypeIdentity, contract_names_match,
};
use tracing::{debug, warn};

use crate::error::CompositionError;

/// Ids assigned to one object registered with a [`GroupDefinitionBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRegistration {
    identity: TypeIdentity,
    index: usize,
    imports: Vec<ImportRegistrationId>,
    exports: Vec<ExportRegistrationId>,
    actions: Vec<ScheduleActionRegistrationId>,
    conditions: Vec<ScheduleConditionRegistrationId>,
}

impl ObjectRegistration {
    fn for_object(object: &GroupObject) -> Self {
        let part = object.part();
        let index = object.index();
        Self {
            identity: part.identity().clone(),
            index,
            imports: part.import_ids(index).map(|(id, _)| id).collect(),
            exports: part.export_ids(index).map(|(id, _)| id).collect(),
            actions: part.action_ids(index).map(|(id, _)| id).collect(),
            conditions: part.condition_ids(index).map(|(id, _)| id).collect(),
        }
    }

    /// Returns the type of the registered object.
    #[must_use]
    pub const fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Returns the object index among same-typed objects in the group.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the ids of the object's imports.
    #[must_use]
    pub fn imports(&self) -> &[ImportRegistrationId] {
        &self.imports
    }

    /// Returns the ids of the object's exports.
    #[must_use]
    pub fn exports(&self) -> &[ExportRegistrationId] {
        &self.exports
    }

    /// Returns the ids of the object's schedule actions.
    #[must_use]
    pub fn actions(&self) -> &[ScheduleActionRegistrationId] {
        &self.actions
    }

    /// Returns the ids of the object's schedule conditions.
    #[must_use]
    pub fn conditions(&self) -> &[ScheduleConditionRegistrationId] {
        &self.conditions
    }

    /// Finds the import id with the given contract name.
    #[must_use]
    pub fn import(&self, contract_name: &str) -> Option<&ImportRegistrationId> {
        self.imports
            .iter()
            .find(|id| contract_names_match(id.contract_name(), contract_name))
    }

    /// Finds the export id with the given contract name.
    #[must_use]
    pub fn export(&self, contract_name: &str) -> Option<&ExportRegistrationId> {
        self.exports
            .iter()
            .find(|id| contract_names_match(id.contract_name(), contract_name))
    }
}

#[derive(Debug)]
struct PendingExport {
    contract_name: String,
    metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug)]
struct PendingImport {
    contract_name: String,
    insert_point: Option<InsertPoint>,
    imports: Vec<ImportRegistrationId>,
}

/// Collects objects, wiring, schedules, an export and imports, then freezes
/// them into a [`GroupDefinition`].
///
/// Registered groups are handed to the storage callback. The builder is
/// cleared after each registration and can be reused.
pub struct GroupDefinitionBuilder<C, S> {
    known_parts: HashMap<TypeIdentity, PartDefinition>,
    connector: C,
    storage: S,
    objects: Vec<GroupObject>,
    sub_groups: Vec<GroupDefinition>,
    connections: Vec<PartConnection>,
    schedules: Vec<GroupSchedule>,
    next_schedule: u64,
    export: Option<PendingExport>,
    imports: Vec<PendingImport>,
}

impl<C, S> GroupDefinitionBuilder<C, S>
where
    C: ConnectParts,
    S: FnMut(GroupDefinition),
{
    /// Creates a builder that accepts objects of the given parts.
    #[must_use]
    pub fn new(
        known_parts: impl IntoIterator<Item = PartDefinition>,
        connector: C,
        storage: S,
    ) -> Self {
        Self {
            known_parts: known_parts
                .into_iter()
                .map(|part| (part.identity().clone(), part))
                .collect(),
            connector,
            storage,
            objects: Vec::new(),
            sub_groups: Vec::new(),
            connections: Vec::new(),
            schedules: Vec::new(),
            next_schedule: 0,
            export: None,
            imports: Vec::new(),
        }
    }

    /// Adds an object of the given type to the group.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownPluginType`] when no part was
    /// scanned for the type.
    pub fn register_object(
        &mut self,
        identity: &TypeIdentity,
    ) -> Result<ObjectRegistration, CompositionError> {
        let part = self
            .known_parts
            .get(identity)
            .ok_or_else(|| CompositionError::unknown_plugin_type(identity))?;
        let index = self
            .objects
            .iter()
            .filter(|object| object.part().identity() == identity)
            .count();

        let object = GroupObject::new(part.clone(), index);
        let registration = ObjectRegistration::for_object(&object);
        debug!(%identity, index, "registered group object");
        self.objects.push(object);
        Ok(registration)
    }

    /// Makes the parts of a registered group available to this group's
    /// wiring. Registering the same group twice has no effect.
    pub fn register_sub_group(&mut self, group: &GroupDefinition) {
        if self.sub_groups.iter().any(|known| known.id() == group.id()) {
            return;
        }
        debug!(sub_group = %group.id(), "registered sub-group");
        self.sub_groups.push(group.clone());
    }

    /// Wires an export of one registered object into an import of another.
    ///
    /// Connecting an import a second time replaces the earlier wiring.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownExportDefinition`] or
    /// [`CompositionError::UnknownImportDefinition`] when an id does not
    /// belong to a registered object, and
    /// [`CompositionError::CannotMapExportToImport`] when the export does not
    /// satisfy the import.
    pub fn connect(
        &mut self,
        export: &ExportRegistrationId,
        import: &ImportRegistrationId,
    ) -> Result<(), CompositionError> {
        self.connect_between(None, export, None, import)
    }

    /// Wires an export of a sub-group into an import of a registered object.
    ///
    /// # Errors
    ///
    /// As [`connect_between`](Self::connect_between).
    pub fn connect_from_sub_group(
        &mut self,
        export_group: &GroupRegistrationId,
        export: &ExportRegistrationId,
        import: &ImportRegistrationId,
    ) -> Result<(), CompositionError> {
        self.connect_between(Some(export_group), export, None, import)
    }

    /// Wires an export of a registered object into an import of a sub-group.
    ///
    /// # Errors
    ///
    /// As [`connect_between`](Self::connect_between).
    pub fn connect_into_sub_group(
        &mut self,
        export: &ExportRegistrationId,
        import_group: &GroupRegistrationId,
        import: &ImportRegistrationId,
    ) -> Result<(), CompositionError> {
        self.connect_between(None, export, Some(import_group), import)
    }

    /// Wires `export` into `import`, each resolved against the named
    /// sub-group or, without one, against the registered objects.
    ///
    /// Connecting an import a second time replaces the earlier wiring.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownSubGroup`] when a named group was
    /// not registered as a sub-group,
    /// [`CompositionError::UnknownExportDefinition`] or
    /// [`CompositionError::UnknownImportDefinition`] when an id does not
    /// belong to its group, and [`CompositionError::CannotMapExportToImport`]
    /// when the export does not satisfy the import.
    pub fn connect_between(
        &mut self,
        export_group: Option<&GroupRegistrationId>,
        export: &ExportRegistrationId,
        import_group: Option<&GroupRegistrationId>,
        import: &ImportRegistrationId,
    ) -> Result<(), CompositionError> {
        let export_definition = match export_group {
            Some(group) => self.sub_group(group)?.export_definition(export),
            None => self.export_definition(export),
        }
        .ok_or_else(|| CompositionError::unknown_export(export))?;
        let import_definition = match import_group {
            Some(group) => self.sub_group(group)?.import_definition(import),
            None => self.import_definition(import),
        }
        .ok_or_else(|| CompositionError::unknown_import(import))?;

        if !self.connector.accepts(import_definition, export_definition) {
            warn!(%import, %export, "rejected wiring inside group");
            return Err(CompositionError::cannot_map(import, export));
        }

        self.connections.retain(|connection| {
            !(connection.import() == import && connection.import_group() == import_group)
        });
        self.connections.push(
            PartConnection::new(import.clone(), export.clone())
                .with_import_group(import_group.cloned())
                .with_export_group(export_group.cloned()),
        );
        debug!(%import, %export, "connected group objects");
        Ok(())
    }

    /// Declares the group export.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::DuplicateGroupExport`] when an export was
    /// already defined.
    pub fn define_export(&mut self, contract_name: &str) -> Result<(), CompositionError> {
        self.define_export_with_metadata(contract_name, BTreeMap::new())
    }

    /// Declares the group export along with metadata matched by selection
    /// criteria.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::DuplicateGroupExport`] when an export was
    /// already defined.
    pub fn define_export_with_metadata(
        &mut self,
        contract_name: &str,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Result<(), CompositionError> {
        if let Some(existing) = &self.export {
            return Err(CompositionError::duplicate_group_export(
                existing.contract_name.as_str(),
            ));
        }
        self.export = Some(PendingExport {
            contract_name: contract_name.to_owned(),
            metadata,
        });
        Ok(())
    }

    /// Declares a group import satisfied through the given part imports.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::DuplicateContractName`] when an import
    /// with the same contract name exists, and
    /// [`CompositionError::UnknownImportDefinition`] when one of the ids does
    /// not belong to a registered object.
    pub fn define_import(
        &mut self,
        contract_name: &str,
        insert_point: Option<InsertPoint>,
        imports: Vec<ImportRegistrationId>,
    ) -> Result<(), CompositionError> {
        if self
            .imports
            .iter()
            .any(|pending| contract_names_match(&pending.contract_name, contract_name))
        {
            return Err(CompositionError::duplicate_contract_name(contract_name));
        }
        if let Some(unknown) = imports
            .iter()
            .find(|id| self.import_definition(id).is_none())
        {
            return Err(CompositionError::unknown_import(unknown));
        }

        self.imports.push(PendingImport {
            contract_name: contract_name.to_owned(),
            insert_point,
            imports,
        });
        Ok(())
    }

    /// Stores a schedule with its action and condition maps and the
    /// schedules it links to directly.
    ///
    /// The last stored schedule is the one offered through the group
    /// export.
    pub fn store_schedule(
        &mut self,
        definition: ScheduleDefinition,
        actions: impl IntoIterator<Item = (ScheduleActionRegistrationId, ScheduleElementId)>,
        conditions: impl IntoIterator<Item = (ScheduleConditionRegistrationId, ScheduleElementId)>,
        sub_schedules: impl IntoIterator<Item = ScheduleId>,
    ) -> ScheduleId {
        let id = ScheduleId::new(self.next_schedule);
        self.next_schedule += 1;

        let action_bindings = actions
            .into_iter()
            .map(|(action, element)| ScheduleActionBinding { action, element })
            .collect();
        let condition_bindings = conditions
            .into_iter()
            .map(|(condition, element)| ScheduleConditionBinding { condition, element })
            .collect();
        self.schedules.push(
            GroupSchedule::new(id, definition, action_bindings, condition_bindings)
                .with_sub_schedules(sub_schedules.into_iter().collect()),
        );
        id
    }

    /// Freezes the collected state into a group, stores it and clears the
    /// builder.
    ///
    /// The group export offers every export of the group's own objects that
    /// is not already wired inside the group.
    pub fn register(&mut self, name: &str) -> GroupRegistrationId {
        let id = GroupRegistrationId::new(name);
        let objects = std::mem::take(&mut self.objects);
        let sub_groups = std::mem::take(&mut self.sub_groups)
            .iter()
            .map(|group| group.id().clone())
            .collect();
        let connections = std::mem::take(&mut self.connections);
        let schedules = std::mem::take(&mut self.schedules);

        let export = self.export.take().map(|pending| {
            let provided = objects
                .iter()
                .flat_map(GroupObject::exports)
                .map(|(export, _)| export)
                .filter(|export| {
                    !connections.iter().any(|connection| {
                        connection.export_group().is_none() && connection.export() == export
                    })
                })
                .collect();
            GroupExportDefinition::new(
                pending.contract_name,
                id.clone(),
                schedules.last().map(GroupSchedule::id),
                provided,
            )
            .with_metadata(pending.metadata)
        });
        let imports = std::mem::take(&mut self.imports)
            .into_iter()
            .map(|pending| {
                GroupImportDefinition::new(
                    pending.contract_name,
                    id.clone(),
                    pending.insert_point,
                    pending.imports,
                )
            })
            .collect();

        let definition = GroupDefinition::new(
            id.clone(),
            GroupContents {
                objects,
                sub_groups,
                connections,
                schedules,
                export,
                imports,
            },
        );
        debug!(group = %id, objects = definition.objects().len(), "registered group");
        (self.storage)(definition);
        id
    }

    /// Discards everything collected since the last registration.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.sub_groups.clear();
        self.connections.clear();
        self.schedules.clear();
        self.export = None;
        self.imports.clear();
    }

    fn sub_group(&self, id: &GroupRegistrationId) -> Result<&GroupDefinition, CompositionError> {
        self.sub_groups
            .iter()
            .find(|group| group.id() == id)
            .ok_or_else(|| CompositionError::unknown_sub_group(id))
    }

    fn import_definition(&self, id: &ImportRegistrationId) -> Option<&ImportDefinition> {
        self.objects
            .iter()
            .flat_map(GroupObject::imports)
            .find(|(candidate, _)| candidate == id)
            .map(|(_, definition)| definition)
    }

    fn export_definition(&self, id: &ExportRegistrationId) -> Option<&ExportDefinition> {
        self.objects
            .iter()
            .flat_map(GroupObject::exports)
            .find(|(candidate, _)| candidate == id)
            .map(|(_, definition)| definition)
    }
}

impl<C, S> std::fmt::Debug for GroupDefinitionBuilder<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupDefinitionBuilder")
            .field("known_parts", &self.known_parts.len())
            .field("objects", &self.objects.len())
            .field("sub_groups", &self.sub_groups.len())
            .field("connections", &self.connections.len())
            .finish_non_exhaustive()
    }
}
