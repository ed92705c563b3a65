//! Selection and wiring of groups into the composition graph.

use plexus_catalog::ConnectParts;
use plexus_types::{GroupDefinition, GroupExportDefinition, GroupImportDefinition};
use tracing::warn;

use crate::engine::{
    GroupImportEngine, GroupSource, SelectionCriteria, export_passes_selection_criteria,
};
use crate::error::CompositionError;
use crate::graph::{GroupCompositionGraph, GroupCompositionId};

/// A group offered by [`GroupSelector::matching_groups`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescriptor {
    group: GroupDefinition,
}

impl GroupDescriptor {
    /// Wraps a group definition.
    #[must_use]
    pub const fn new(group: GroupDefinition) -> Self {
        Self { group }
    }

    /// Returns the described group.
    #[must_use]
    pub const fn group(&self) -> &GroupDefinition {
        &self.group
    }

    /// Returns the export of the described group.
    #[must_use]
    pub const fn export(&self) -> Option<&GroupExportDefinition> {
        self.group.export()
    }
}

/// Finds groups that satisfy imports and keeps the composition graph in
/// step with the choices made.
#[derive(Debug)]
pub struct GroupSelector<S, C> {
    engine: GroupImportEngine<S, C>,
    graph: GroupCompositionGraph,
}

impl<S: GroupSource, C: ConnectParts> GroupSelector<S, C> {
    /// Creates a selector with an empty composition graph.
    #[must_use]
    pub fn new(engine: GroupImportEngine<S, C>) -> Self {
        Self::with_graph(engine, GroupCompositionGraph::new())
    }

    /// Creates a selector over an existing composition graph.
    #[must_use]
    pub const fn with_graph(
        engine: GroupImportEngine<S, C>,
        graph: GroupCompositionGraph,
    ) -> Self {
        Self { engine, graph }
    }

    /// Returns the composition graph.
    #[must_use]
    pub const fn graph(&self) -> &GroupCompositionGraph {
        &self.graph
    }

    /// Returns the group matching engine.
    #[must_use]
    pub const fn engine(&self) -> &GroupImportEngine<S, C> {
        &self.engine
    }

    /// Describes every group that passes `criteria` and, when given,
    /// satisfies `import`.
    #[must_use]
    pub fn matching_groups(
        &self,
        import: Option<&GroupImportDefinition>,
        criteria: &SelectionCriteria,
    ) -> Vec<GroupDescriptor> {
        self.engine
            .matching_groups(import, criteria)
            .into_iter()
            .map(GroupDescriptor::new)
            .collect()
    }

    /// Adds an instance of the described group to the composition.
    pub fn select(&mut self, descriptor: &GroupDescriptor) -> GroupCompositionId {
        self.graph.add(descriptor.group.clone())
    }

    /// Removes a group instance and its links from the composition.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownCompositionNode`] when the instance
    /// is not part of the composition.
    pub fn deselect(&mut self, id: GroupCompositionId) -> Result<(), CompositionError> {
        self.graph
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CompositionError::unknown_node(id))
    }

    /// Satisfies `import` of `importing` with the export of `exporting` and
    /// records the part-level wiring on the new edge.
    ///
    /// Acceptance is checked again against the current export of the
    /// exporting group, since repository contents may have changed since
    /// the group was offered.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownCompositionNode`] when a node is
    /// missing and [`CompositionError::CannotMapExportToImport`] when the
    /// exporting group has no export that satisfies `import` or the graph
    /// rejects the link.
    pub fn connect(
        &mut self,
        importing: GroupCompositionId,
        import: &GroupImportDefinition,
        exporting: GroupCompositionId,
    ) -> Result<(), CompositionError> {
        let exporting_group = self
            .graph
            .group(exporting)
            .ok_or_else(|| CompositionError::unknown_node(exporting))?;
        let Some(export) = exporting_group.export().cloned() else {
            warn!(%exporting, "exporting group has no export");
            return Err(CompositionError::cannot_map(
                import.contract_name(),
                exporting_group.id(),
            ));
        };

        if !self.engine.accepts(import, &export) {
            warn!(
                %importing,
                %exporting,
                import = import.contract_name(),
                "group export no longer satisfies import"
            );
            return Err(CompositionError::cannot_map(
                import.contract_name(),
                export.contract_name(),
            ));
        }

        let importing_group = self
            .graph
            .group(importing)
            .ok_or_else(|| CompositionError::unknown_node(importing))?;
        let parts = self
            .engine
            .generate_connection_for(importing_group, import, exporting_group);
        self.graph
            .connect(importing, import.clone(), exporting, export, parts)
    }

    /// Removes the links from `importing` to `exporting`.
    ///
    /// Returns `true` when a link was removed.
    pub fn disconnect(
        &mut self,
        importing: GroupCompositionId,
        exporting: GroupCompositionId,
    ) -> bool {
        self.graph.disconnect(importing, exporting)
    }

    /// Returns `true` when the import slot of `importing` is free and the
    /// export of `exporting` both satisfies `import` and passes `criteria`.
    #[must_use]
    pub fn can_connect_to(
        &self,
        importing: GroupCompositionId,
        import: &GroupImportDefinition,
        criteria: &SelectionCriteria,
        exporting: GroupCompositionId,
    ) -> bool {
        if importing == exporting
            || !self.graph.contains(importing)
            || self.graph.is_connected(importing, import)
        {
            return false;
        }
        self.graph
            .group(exporting)
            .and_then(GroupDefinition::export)
            .is_some_and(|export| {
                self.engine.accepts(import, export)
                    && export_passes_selection_criteria(export, criteria)
            })
    }
}
