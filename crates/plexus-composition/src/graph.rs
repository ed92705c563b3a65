//! The live composition of selected groups.
//!
//! Nodes are group instances; an edge runs from the group whose import is
//! satisfied to the group whose export satisfies it. The graph stays acyclic
//! and every import slot of a node is connected at most once.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use plexus_types::{GroupDefinition, GroupExportDefinition, GroupImportDefinition};
use tracing::{debug, warn};

use crate::engine::PartImportMapping;
use crate::error::CompositionError;

/// Id of a group instance in the composition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupCompositionId(u64);

impl GroupCompositionId {
    /// Returns the raw node number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupCompositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "composition-{}", self.0)
    }
}

/// A satisfied group import.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionEdge {
    importing: GroupCompositionId,
    import: GroupImportDefinition,
    exporting: GroupCompositionId,
    export: GroupExportDefinition,
    parts: Vec<PartImportMapping>,
}

impl CompositionEdge {
    /// Returns the node whose import is satisfied.
    #[must_use]
    pub const fn importing(&self) -> GroupCompositionId {
        self.importing
    }

    /// Returns the satisfied import.
    #[must_use]
    pub const fn import(&self) -> &GroupImportDefinition {
        &self.import
    }

    /// Returns the node providing the export.
    #[must_use]
    pub const fn exporting(&self) -> GroupCompositionId {
        self.exporting
    }

    /// Returns the export wired into the import.
    #[must_use]
    pub const fn export(&self) -> &GroupExportDefinition {
        &self.export
    }

    /// Returns the part-level wiring generated for the link.
    #[must_use]
    pub fn parts(&self) -> &[PartImportMapping] {
        &self.parts
    }
}

/// Directed acyclic graph of group instances.
#[derive(Debug, Clone, Default)]
pub struct GroupCompositionGraph {
    next_id: u64,
    groups: BTreeMap<GroupCompositionId, GroupDefinition>,
    edges: Vec<CompositionEdge>,
}

impl GroupCompositionGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance of `group` and returns its fresh id.
    pub fn add(&mut self, group: GroupDefinition) -> GroupCompositionId {
        let id = GroupCompositionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        debug!(%id, group = %group.id(), "added group to composition");
        self.groups.insert(id, group);
        id
    }

    /// Removes a node together with every edge touching it.
    ///
    /// Returns the removed group, or `None` when the node was not present.
    pub fn remove(&mut self, id: GroupCompositionId) -> Option<GroupDefinition> {
        let group = self.groups.remove(&id)?;
        self.disconnect_all(id);
        debug!(%id, "removed group from composition");
        Some(group)
    }

    /// Wires `export` of `exporting` into `import` of `importing`, recording
    /// the part-level wiring `parts` on the new edge.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownCompositionNode`] when either node
    /// is absent, [`CompositionError::UnknownImportDefinition`] or
    /// [`CompositionError::UnknownExportDefinition`] when the definitions do
    /// not belong to the nodes, and
    /// [`CompositionError::CannotMapExportToImport`] for a self link, a link
    /// that would close a cycle, or an import slot that is already
    /// connected.
    pub fn connect(
        &mut self,
        importing: GroupCompositionId,
        import: GroupImportDefinition,
        exporting: GroupCompositionId,
        export: GroupExportDefinition,
        parts: Vec<PartImportMapping>,
    ) -> Result<(), CompositionError> {
        let importing_group = self
            .groups
            .get(&importing)
            .ok_or_else(|| CompositionError::unknown_node(importing))?;
        let exporting_group = self
            .groups
            .get(&exporting)
            .ok_or_else(|| CompositionError::unknown_node(exporting))?;

        if !importing_group.imports().contains(&import) {
            return Err(CompositionError::unknown_import(import.contract_name()));
        }
        if exporting_group.export() != Some(&export) {
            return Err(CompositionError::unknown_export(export.contract_name()));
        }

        let rejection = if importing == exporting {
            Some("self link")
        } else if self.is_connected(importing, &import) {
            Some("import already connected")
        } else if self.reaches(exporting, importing) {
            Some("cycle")
        } else {
            None
        };
        if let Some(reason) = rejection {
            warn!(
                %importing,
                %exporting,
                import = import.contract_name(),
                reason,
                "rejected composition link"
            );
            return Err(CompositionError::cannot_map(
                format!("{importing}:{}", import.contract_name()),
                format!("{exporting}:{}", export.contract_name()),
            ));
        }

        debug!(%importing, %exporting, import = import.contract_name(), "connected groups");
        self.edges.push(CompositionEdge {
            importing,
            import,
            exporting,
            export,
            parts,
        });
        Ok(())
    }

    /// Removes every edge from `importing` to `exporting`.
    ///
    /// Returns `true` when at least one edge was removed.
    pub fn disconnect(
        &mut self,
        importing: GroupCompositionId,
        exporting: GroupCompositionId,
    ) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|edge| !(edge.importing == importing && edge.exporting == exporting));
        let removed = self.edges.len() != before;
        if removed {
            debug!(%importing, %exporting, "disconnected groups");
        }
        removed
    }

    /// Removes every edge touching `id`.
    pub fn disconnect_all(&mut self, id: GroupCompositionId) {
        self.edges
            .retain(|edge| edge.importing != id && edge.exporting != id);
    }

    /// Returns `true` when the node is present.
    #[must_use]
    pub fn contains(&self, id: GroupCompositionId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Returns the group behind a node.
    #[must_use]
    pub fn group(&self, id: GroupCompositionId) -> Option<&GroupDefinition> {
        self.groups.get(&id)
    }

    /// Iterates over the nodes in id order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupCompositionId, &GroupDefinition)> {
        self.groups.iter().map(|(id, group)| (*id, group))
    }

    /// Returns `true` when the import slot of `importing` is connected.
    #[must_use]
    pub fn is_connected(
        &self,
        importing: GroupCompositionId,
        import: &GroupImportDefinition,
    ) -> bool {
        self.connected_to(importing, import).is_some()
    }

    /// Returns the node wired into the import slot of `importing`.
    #[must_use]
    pub fn connected_to(
        &self,
        importing: GroupCompositionId,
        import: &GroupImportDefinition,
    ) -> Option<GroupCompositionId> {
        self.edges
            .iter()
            .find(|edge| edge.importing == importing && &edge.import == import)
            .map(|edge| edge.exporting)
    }

    /// Lists the imports of `id` that are connected, each with the node
    /// exporting into it.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownCompositionNode`] when the node is
    /// absent.
    pub fn satisfied_imports(
        &self,
        id: GroupCompositionId,
    ) -> Result<Vec<(&GroupImportDefinition, GroupCompositionId)>, CompositionError> {
        if !self.contains(id) {
            return Err(CompositionError::unknown_node(id));
        }
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.importing == id)
            .map(|edge| (&edge.import, edge.exporting))
            .collect())
    }

    /// Lists the imports of `id` that nothing is connected to, in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::UnknownCompositionNode`] when the node is
    /// absent.
    pub fn unsatisfied_imports(
        &self,
        id: GroupCompositionId,
    ) -> Result<Vec<&GroupImportDefinition>, CompositionError> {
        let group = self
            .groups
            .get(&id)
            .ok_or_else(|| CompositionError::unknown_node(id))?;
        Ok(group
            .imports()
            .iter()
            .filter(|import| !self.is_connected(id, import))
            .collect())
    }

    /// Iterates over the edges in connection order.
    pub fn edges(&self) -> impl Iterator<Item = &CompositionEdge> {
        self.edges.iter()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `true` when `to` is reachable from `from` along edges.
    fn reaches(&self, from: GroupCompositionId, to: GroupCompositionId) -> bool {
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for edge in self.edges.iter().filter(|edge| edge.importing == current) {
                if visited.insert(edge.exporting) {
                    queue.push_back(edge.exporting);
                }
            }
        }
        false
    }
}
