//! Access to remote plugin repositories.

use plexus_types::{RepositoryId, RepositoryPluginInformation};

use crate::error::TransportError;

/// Connection to the set of known plugin repositories.
///
/// The cache calls the transport while holding its lock, so a transport that
/// blocks stalls every cache operation until it returns.
pub trait RepositoryTransport: Send {
    /// Lists every repository the transport knows about.
    fn repositories(&self) -> Vec<RepositoryId>;

    /// Returns `true` while the repository can be queried.
    fn is_connected_to_repository(&self, repository: &RepositoryId) -> bool;

    /// Fetches the current snapshot held by a repository.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the repository cannot be reached or
    /// answers with unusable data.
    fn plugin_information_from(
        &self,
        repository: &RepositoryId,
    ) -> Result<RepositoryPluginInformation, TransportError>;
}

/// Notifications raised by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryEvent {
    /// A repository became reachable.
    Connected(RepositoryId),
    /// A repository changed its contents.
    Updated(RepositoryId),
    /// A repository went away.
    Disconnected(RepositoryId),
}

impl RepositoryEvent {
    /// Returns the repository the event concerns.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryId {
        match self {
            Self::Connected(repository)
            | Self::Updated(repository)
            | Self::Disconnected(repository) => repository,
        }
    }
}
