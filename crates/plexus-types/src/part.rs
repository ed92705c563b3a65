//! Part definitions: a plugin type with its imports, exports and schedule
//! hooks.

use serde::{Deserialize, Serialize};

use crate::contract::{ExportDefinition, ImportDefinition, contract_names_match};
use crate::error::DefinitionError;
use crate::identity::TypeIdentity;
use crate::member::{MethodDescriptor, PropertyDescriptor};
use crate::registration::{
    ExportRegistrationId, ImportRegistrationId, RegistrationId, ScheduleActionRegistrationId,
    ScheduleConditionRegistrationId,
};

/// A method that a schedule may invoke as an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleActionDefinition {
    contract_name: String,
    method: MethodDescriptor,
}

impl ScheduleActionDefinition {
    /// Creates an action definition.
    #[must_use]
    pub fn new(contract_name: impl Into<String>, method: MethodDescriptor) -> Self {
        Self {
            contract_name: contract_name.into(),
            method,
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the action method.
    #[must_use]
    pub const fn method(&self) -> &MethodDescriptor {
        &self.method
    }
}

/// Member that evaluates a schedule condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionSite {
    /// A boolean property.
    Property {
        /// Property evaluated as the condition.
        property: PropertyDescriptor,
    },
    /// A method returning a boolean.
    Method {
        /// Method evaluated as the condition.
        method: MethodDescriptor,
    },
}

/// A member that a schedule may evaluate as a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleConditionDefinition {
    contract_name: String,
    site: ConditionSite,
}

impl ScheduleConditionDefinition {
    /// Creates a condition definition.
    #[must_use]
    pub fn new(contract_name: impl Into<String>, site: ConditionSite) -> Self {
        Self {
            contract_name: contract_name.into(),
            site,
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the evaluated member.
    #[must_use]
    pub const fn site(&self) -> &ConditionSite {
        &self.site
    }
}

/// A scanned plugin type with everything it declares.
///
/// Registration ids are derived on demand for a given object index; within
/// one part every `(declaring type, contract name)` pair is unique per member
/// kind, so the ids of one object never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDefinition {
    identity: TypeIdentity,
    #[serde(default)]
    imports: Vec<ImportDefinition>,
    #[serde(default)]
    exports: Vec<ExportDefinition>,
    #[serde(default)]
    actions: Vec<ScheduleActionDefinition>,
    #[serde(default)]
    conditions: Vec<ScheduleConditionDefinition>,
}

impl PartDefinition {
    /// Creates a part without members.
    #[must_use]
    pub const fn new(identity: TypeIdentity) -> Self {
        Self {
            identity,
            imports: Vec::new(),
            exports: Vec::new(),
            actions: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Adds an import.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateRegistration`] when the import
    /// would share a registration id with an existing import.
    pub fn with_import(mut self, import: ImportDefinition) -> Result<Self, DefinitionError> {
        self.ensure_unique(
            self.imports.iter().map(ImportDefinition::contract_name),
            import.contract_name(),
        )?;
        self.imports.push(import);
        Ok(self)
    }

    /// Adds an export.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateRegistration`] when the export
    /// would share a registration id with an existing export.
    pub fn with_export(mut self, export: ExportDefinition) -> Result<Self, DefinitionError> {
        self.ensure_unique(
            self.exports.iter().map(ExportDefinition::contract_name),
            export.contract_name(),
        )?;
        self.exports.push(export);
        Ok(self)
    }

    /// Adds a schedule action.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateRegistration`] for duplicate
    /// action contract names.
    pub fn with_action(
        mut self,
        action: ScheduleActionDefinition,
    ) -> Result<Self, DefinitionError> {
        self.ensure_unique(
            self.actions.iter().map(ScheduleActionDefinition::contract_name),
            action.contract_name(),
        )?;
        self.actions.push(action);
        Ok(self)
    }

    /// Adds a schedule condition.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateRegistration`] for duplicate
    /// condition contract names.
    pub fn with_condition(
        mut self,
        condition: ScheduleConditionDefinition,
    ) -> Result<Self, DefinitionError> {
        self.ensure_unique(
            self.conditions
                .iter()
                .map(ScheduleConditionDefinition::contract_name),
            condition.contract_name(),
        )?;
        self.conditions.push(condition);
        Ok(self)
    }

    fn ensure_unique<'a>(
        &self,
        mut existing: impl Iterator<Item = &'a str>,
        candidate: &str,
    ) -> Result<(), DefinitionError> {
        if existing.any(|name| contract_names_match(name, candidate)) {
            return Err(DefinitionError::duplicate_registration(
                &self.identity,
                candidate,
            ));
        }
        Ok(())
    }

    /// Returns the part type.
    #[must_use]
    pub const fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Returns the declared imports.
    #[must_use]
    pub fn imports(&self) -> &[ImportDefinition] {
        &self.imports
    }

    /// Returns the declared exports.
    #[must_use]
    pub fn exports(&self) -> &[ExportDefinition] {
        &self.exports
    }

    /// Returns the declared schedule actions.
    #[must_use]
    pub fn actions(&self) -> &[ScheduleActionDefinition] {
        &self.actions
    }

    /// Returns the declared schedule conditions.
    #[must_use]
    pub fn conditions(&self) -> &[ScheduleConditionDefinition] {
        &self.conditions
    }

    /// Pairs every import with its id for the object at `index`.
    pub fn import_ids(
        &self,
        index: usize,
    ) -> impl Iterator<Item = (ImportRegistrationId, &ImportDefinition)> {
        self.imports.iter().map(move |import| {
            (
                RegistrationId::new(self.identity.clone(), index, import.contract_name()),
                import,
            )
        })
    }

    /// Pairs every export with its id for the object at `index`.
    pub fn export_ids(
        &self,
        index: usize,
    ) -> impl Iterator<Item = (ExportRegistrationId, &ExportDefinition)> {
        self.exports.iter().map(move |export| {
            (
                RegistrationId::new(self.identity.clone(), index, export.contract_name()),
                export,
            )
        })
    }

    /// Pairs every schedule action with its id for the object at `index`.
    pub fn action_ids(
        &self,
        index: usize,
    ) -> impl Iterator<Item = (ScheduleActionRegistrationId, &ScheduleActionDefinition)> {
        self.actions.iter().map(move |action| {
            (
                RegistrationId::new(self.identity.clone(), index, action.contract_name()),
                action,
            )
        })
    }

    /// Pairs every schedule condition with its id for the object at `index`.
    pub fn condition_ids(
        &self,
        index: usize,
    ) -> impl Iterator<Item = (ScheduleConditionRegistrationId, &ScheduleConditionDefinition)> {
        self.conditions.iter().map(move |condition| {
            (
                RegistrationId::new(self.identity.clone(), index, condition.contract_name()),
                condition,
            )
        })
    }
}
