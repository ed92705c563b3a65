//! Error types for group construction and composition.

use plexus_repository::RepositoryError;
use thiserror::Error;

use crate::graph::GroupCompositionId;

/// Errors returned while building or wiring groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// A group import with the same contract name was already defined.
    #[error("duplicate group import contract name '{contract_name}'")]
    DuplicateContractName {
        /// The repeated contract name.
        contract_name: String,
    },

    /// The group already has an export.
    #[error("group already exports '{existing}'")]
    DuplicateGroupExport {
        /// Contract name of the export defined first.
        existing: String,
    },

    /// The export cannot be wired into the import.
    #[error("cannot map export '{export}' to import '{import}'")]
    CannotMapExportToImport {
        /// The import that was to be satisfied.
        import: String,
        /// The export that was offered.
        export: String,
    },

    /// The type was never scanned as a part.
    #[error("unknown plugin type: {identity}")]
    UnknownPluginType {
        /// The requested type.
        identity: String,
    },

    /// The export id does not belong to a registered object.
    #[error("unknown export definition: {export}")]
    UnknownExportDefinition {
        /// The unmatched export id.
        export: String,
    },

    /// The import id does not belong to a registered object.
    #[error("unknown import definition: {import}")]
    UnknownImportDefinition {
        /// The unmatched import id.
        import: String,
    },

    /// The group was not registered as a sub-group of the group being built.
    #[error("unknown sub-group: {group}")]
    UnknownSubGroup {
        /// The unregistered group.
        group: String,
    },

    /// The composition graph has no node with the given id.
    #[error("unknown composition node: {id}")]
    UnknownCompositionNode {
        /// The missing node.
        id: GroupCompositionId,
    },

    /// A repository lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CompositionError {
    /// Creates a new `DuplicateContractName` error.
    #[must_use]
    pub fn duplicate_contract_name(contract_name: impl Into<String>) -> Self {
        Self::DuplicateContractName {
            contract_name: contract_name.into(),
        }
    }

    /// Creates a new `DuplicateGroupExport` error.
    #[must_use]
    pub fn duplicate_group_export(existing: impl Into<String>) -> Self {
        Self::DuplicateGroupExport {
            existing: existing.into(),
        }
    }

    /// Creates a new `CannotMapExportToImport` error.
    #[must_use]
    pub fn cannot_map(import: impl ToString, export: impl ToString) -> Self {
        Self::CannotMapExportToImport {
            import: import.to_string(),
            export: export.to_string(),
        }
    }

    /// Creates a new `UnknownPluginType` error.
    #[must_use]
    pub fn unknown_plugin_type(identity: impl ToString) -> Self {
        Self::UnknownPluginType {
            identity: identity.to_string(),
        }
    }

    /// Creates a new `UnknownExportDefinition` error.
    #[must_use]
    pub fn unknown_export(export: impl ToString) -> Self {
        Self::UnknownExportDefinition {
            export: export.to_string(),
        }
    }

    /// Creates a new `UnknownImportDefinition` error.
    #[must_use]
    pub fn unknown_import(import: impl ToString) -> Self {
        Self::UnknownImportDefinition {
            import: import.to_string(),
        }
    }

    /// Creates a new `UnknownSubGroup` error.
    #[must_use]
    pub fn unknown_sub_group(group: impl ToString) -> Self {
        Self::UnknownSubGroup {
            group: group.to_string(),
        }
    }

    /// Creates a new `UnknownCompositionNode` error.
    #[must_use]
    pub const fn unknown_node(id: GroupCompositionId) -> Self {
        Self::UnknownCompositionNode { id }
    }
}
