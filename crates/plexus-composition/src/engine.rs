//! Group-level import/export matching.

use std::collections::BTreeMap;
use std::sync::Arc;

use plexus_catalog::ConnectParts;
use plexus_repository::{Clock, RepositoryCache, RepositoryError, RepositoryTransport};
use plexus_types::{
    ExportRegistrationId, GroupDefinition, GroupExportDefinition, GroupImportDefinition,
    GroupRegistrationId, ImportRegistrationId, contract_names_match,
};
use tracing::debug;

/// Exact-match filter over the metadata declared on a group export.
pub type SelectionCriteria = BTreeMap<String, serde_json::Value>;

/// Returns `true` when every criterion equals the metadata value stored under
/// its key. Empty criteria match every export.
#[must_use]
pub fn export_passes_selection_criteria(
    export: &GroupExportDefinition,
    criteria: &SelectionCriteria,
) -> bool {
    criteria
        .iter()
        .all(|(key, expected)| export.metadata().get(key) == Some(expected))
}

/// The part exports of an exporting group that can feed one part import of
/// the importing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartImportMapping {
    import: ImportRegistrationId,
    exports: Vec<ExportRegistrationId>,
}

impl PartImportMapping {
    /// Creates a mapping from `import` to the exports that satisfy it.
    #[must_use]
    pub const fn new(import: ImportRegistrationId, exports: Vec<ExportRegistrationId>) -> Self {
        Self { import, exports }
    }

    /// Returns the part import of the importing group.
    #[must_use]
    pub const fn import(&self) -> &ImportRegistrationId {
        &self.import
    }

    /// Returns the provided exports that satisfy the import, in the order the
    /// exporting group provides them.
    #[must_use]
    pub fn exports(&self) -> &[ExportRegistrationId] {
        &self.exports
    }
}

/// Where registered groups are looked up.
pub trait GroupSource {
    /// Returns the group with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownGroupDefinition`] when the group is
    /// not known.
    fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError>;

    /// Returns every known group.
    fn groups(&self) -> Vec<GroupDefinition>;
}

impl<T: GroupSource + ?Sized> GroupSource for &T {
    fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError> {
        (**self).group(id)
    }

    fn groups(&self) -> Vec<GroupDefinition> {
        (**self).groups()
    }
}

impl<T: GroupSource + ?Sized> GroupSource for Arc<T> {
    fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError> {
        (**self).group(id)
    }

    fn groups(&self) -> Vec<GroupDefinition> {
        (**self).groups()
    }
}

impl<T: RepositoryTransport, C: Clock> GroupSource for RepositoryCache<T, C> {
    fn group(&self, id: &GroupRegistrationId) -> Result<GroupDefinition, RepositoryError> {
        Self::group(self, id)
    }

    fn groups(&self) -> Vec<GroupDefinition> {
        Self::groups(self)
    }
}

/// Decides whether one group can satisfy the import of another.
#[derive(Debug)]
pub struct GroupImportEngine<S, C> {
    source: S,
    connector: C,
}

impl<S: GroupSource, C: ConnectParts> GroupImportEngine<S, C> {
    /// Creates an engine reading groups from `source` and matching part
    /// imports through `connector`.
    #[must_use]
    pub const fn new(source: S, connector: C) -> Self {
        Self { source, connector }
    }

    /// Returns `true` when `export` satisfies `import`.
    ///
    /// The contract names must match. An import with an insertion point
    /// requires an exported schedule. Every part import listed by the group
    /// import must be accepted by at least one part export the exporting
    /// group provides.
    #[must_use]
    pub fn accepts(&self, import: &GroupImportDefinition, export: &GroupExportDefinition) -> bool {
        if !contract_names_match(import.contract_name(), export.contract_name()) {
            return false;
        }
        if import.insert_point().is_some() && export.schedule().is_none() {
            return false;
        }
        if import.imports().is_empty() {
            return true;
        }

        let (importing, exporting) = match (
            self.source.group(import.containing_group()),
            self.source.group(export.containing_group()),
        ) {
            (Ok(importing), Ok(exporting)) => (importing, exporting),
            (Err(error), _) | (_, Err(error)) => {
                debug!(%error, "group lookup failed while matching");
                return false;
            }
        };

        self.part_mappings(&importing, import, &exporting, export)
            .iter()
            .all(|mapping| !mapping.exports.is_empty())
    }

    /// Maps every part import listed by `import` to the part exports of
    /// `exporting` that satisfy it.
    ///
    /// Only exports provided through the group export are considered. A
    /// part import nothing satisfies maps to an empty list, and a group
    /// without an export yields no mappings.
    #[must_use]
    pub fn generate_connection_for(
        &self,
        importing: &GroupDefinition,
        import: &GroupImportDefinition,
        exporting: &GroupDefinition,
    ) -> Vec<PartImportMapping> {
        exporting
            .export()
            .map(|export| self.part_mappings(importing, import, exporting, export))
            .unwrap_or_default()
    }

    fn part_mappings(
        &self,
        importing: &GroupDefinition,
        import: &GroupImportDefinition,
        exporting: &GroupDefinition,
        export: &GroupExportDefinition,
    ) -> Vec<PartImportMapping> {
        import
            .imports()
            .iter()
            .map(|id| {
                let exports = importing
                    .import_definition(id)
                    .map(|part_import| {
                        export
                            .provided_exports()
                            .iter()
                            .filter(|provided| {
                                exporting.export_definition(provided).is_some_and(|part_export| {
                                    self.connector.accepts(part_import, part_export)
                                })
                            })
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                PartImportMapping::new(id.clone(), exports)
            })
            .collect()
    }

    /// Lists the groups whose export passes `criteria` and, when given,
    /// satisfies `import`.
    ///
    /// The group owning `import` is never offered to itself. Results are
    /// ordered by group id.
    #[must_use]
    pub fn matching_groups(
        &self,
        import: Option<&GroupImportDefinition>,
        criteria: &SelectionCriteria,
    ) -> Vec<GroupDefinition> {
        let mut matches: Vec<GroupDefinition> = self
            .source
            .groups()
            .into_iter()
            .filter(|group| {
                group.export().is_some_and(|export| {
                    export_passes_selection_criteria(export, criteria)
                        && import.is_none_or(|wanted| {
                            wanted.containing_group() != group.id() && self.accepts(wanted, export)
                        })
                })
            })
            .collect();
        matches.sort_by(|left, right| left.id().cmp(right.id()));
        matches
    }
}
