//! Plugin repository identifiers and the metadata a repository reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::group::GroupDefinition;
use crate::part::PartDefinition;

/// Id of a remote plugin repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryId(String);

impl RepositoryId {
    /// Creates a repository id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a repository currently holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryPluginInformation {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
    #[serde(default)]
    parts: Vec<PartDefinition>,
    #[serde(default)]
    groups: Vec<GroupDefinition>,
}

impl RepositoryPluginInformation {
    /// Bundles a repository snapshot.
    #[must_use]
    pub const fn new(
        types: Vec<TypeDescriptor>,
        parts: Vec<PartDefinition>,
        groups: Vec<GroupDefinition>,
    ) -> Self {
        Self {
            types,
            parts,
            groups,
        }
    }

    /// Returns the reported types.
    #[must_use]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Returns the reported parts.
    #[must_use]
    pub fn parts(&self) -> &[PartDefinition] {
        &self.parts
    }

    /// Returns the reported groups.
    #[must_use]
    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    /// Splits the snapshot into its types, parts and groups.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TypeDescriptor>, Vec<PartDefinition>, Vec<GroupDefinition>) {
        (self.types, self.parts, self.groups)
    }
}
