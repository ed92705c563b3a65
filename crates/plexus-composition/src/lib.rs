//! Group construction and composition for Plexus.
//!
//! Groups bundle parts with their internal wiring, an optional export and a
//! set of named imports. This crate builds them, decides which registered
//! groups can satisfy the import of another, and tracks the live graph of
//! connected group instances.
//!
//! # Core Types
//!
//! - [`GroupDefinitionBuilder`] - collects objects and wiring, then freezes
//!   them into a `GroupDefinition`
//! - [`GroupImportEngine`] - group-level acceptance and selection criteria
//! - [`GroupCompositionGraph`] - acyclic graph of selected group instances
//! - [`GroupSelector`] - offers matching groups and keeps the graph in step
//!
//! # Example
//!
//! ```
//! use plexus_catalog::ConnectParts;
//! use plexus_composition::GroupDefinitionBuilder;
//! use plexus_types::{ExportDefinition, GroupDefinition, ImportDefinition};
//!
//! struct AcceptAll;
//!
//! impl ConnectParts for AcceptAll {
//!     fn accepts(&self, _: &ImportDefinition, _: &ExportDefinition) -> bool {
//!         true
//!     }
//! }
//!
//! let mut stored: Vec<GroupDefinition> = Vec::new();
//! let mut builder =
//!     GroupDefinitionBuilder::new(Vec::new(), AcceptAll, |group| stored.push(group));
//! builder.define_export("logging").expect("first export");
//! let id = builder.register("logging-group");
//! drop(builder);
//!
//! assert_eq!(stored.len(), 1);
//! assert_eq!(stored.first().map(GroupDefinition::id), Some(&id));
//! ```

mod builder;
mod engine;
mod error;
mod graph;
mod selector;

pub use builder::{GroupDefinitionBuilder, ObjectRegistration};
pub use engine::{
    GroupImportEngine, GroupSource, PartImportMapping, SelectionCriteria,
    export_passes_selection_criteria,
};
pub use error::CompositionError;
pub use graph::{CompositionEdge, GroupCompositionGraph, GroupCompositionId};
pub use selector::{GroupDescriptor, GroupSelector};

#[cfg(test)]
mod tests;
