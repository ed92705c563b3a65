//! Error types for repository lookups and transport failures.

use thiserror::Error;

/// Errors returned by cache lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No connected repository provides the requested type.
    #[error("unknown type definition: {identity}")]
    UnknownTypeDefinition {
        /// Display or assembly-qualified form of the requested type.
        identity: String,
    },

    /// No connected repository provides a part for the requested type.
    #[error("unknown part definition: {identity}")]
    UnknownPartDefinition {
        /// Display or assembly-qualified form of the part type.
        identity: String,
    },

    /// No connected repository provides the requested group.
    #[error("unknown group definition: {group}")]
    UnknownGroupDefinition {
        /// Id of the requested group.
        group: String,
    },
}

impl RepositoryError {
    /// Creates a new `UnknownTypeDefinition` error.
    #[must_use]
    pub fn unknown_type_definition(identity: impl ToString) -> Self {
        Self::UnknownTypeDefinition {
            identity: identity.to_string(),
        }
    }

    /// Creates a new `UnknownPartDefinition` error.
    #[must_use]
    pub fn unknown_part_definition(identity: impl ToString) -> Self {
        Self::UnknownPartDefinition {
            identity: identity.to_string(),
        }
    }

    /// Creates a new `UnknownGroupDefinition` error.
    #[must_use]
    pub fn unknown_group_definition(group: impl ToString) -> Self {
        Self::UnknownGroupDefinition {
            group: group.to_string(),
        }
    }
}

/// Failures reported by a [`RepositoryTransport`](crate::RepositoryTransport).
///
/// The cache never surfaces these to callers. A repository whose snapshot
/// cannot be fetched is treated as holding nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The repository could not be reached.
    #[error("repository '{repository}' is unreachable: {message}")]
    Unreachable {
        /// Repository that failed.
        repository: String,
        /// Transport-specific description.
        message: String,
    },

    /// The repository answered with data that could not be decoded.
    #[error("repository '{repository}' sent malformed plugin information: {message}")]
    Malformed {
        /// Repository that failed.
        repository: String,
        /// Decoder-specific description.
        message: String,
    },
}

impl TransportError {
    /// Creates a new `Unreachable` error.
    #[must_use]
    pub fn unreachable(repository: impl ToString, message: impl Into<String>) -> Self {
        Self::Unreachable {
            repository: repository.to_string(),
            message: message.into(),
        }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(repository: impl ToString, message: impl Into<String>) -> Self {
        Self::Malformed {
            repository: repository.to_string(),
            message: message.into(),
        }
    }
}
