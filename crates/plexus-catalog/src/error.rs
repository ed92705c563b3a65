//! Error types for type catalog lookups.

use thiserror::Error;

/// Errors returned by the type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No descriptor is registered for the requested type.
    #[error("unknown type definition: {identity}")]
    UnknownTypeDefinition {
        /// Display form of the requested type.
        identity: String,
    },
}

impl CatalogError {
    /// Creates a new `UnknownTypeDefinition` error.
    #[must_use]
    pub fn unknown_type_definition(identity: impl ToString) -> Self {
        Self::UnknownTypeDefinition {
            identity: identity.to_string(),
        }
    }
}
