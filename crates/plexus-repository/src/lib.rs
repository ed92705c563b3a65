//! Cached view over remote plugin repositories.
//!
//! Repositories report the types, parts and groups they hold through a
//! [`RepositoryTransport`]. The [`RepositoryCache`] keeps a copy of that
//! metadata, registers every type with a subtype catalog, and expires each
//! repository's snapshot after a configurable lifetime.
//!
//! # Core Types
//!
//! - [`RepositoryCache`] - the thread-safe cache
//! - [`RepositoryTransport`] - how snapshots are fetched
//! - [`RepositoryEvent`] - connection and update notifications
//! - [`Clock`] - time source used for expiry
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use plexus_repository::{RepositoryCache, RepositoryTransport, TransportError};
//! use plexus_types::{
//!     AssemblyName, RepositoryId, RepositoryPluginInformation, TypeDescriptor, TypeIdentity,
//! };
//!
//! struct Local(RepositoryPluginInformation);
//!
//! impl RepositoryTransport for Local {
//!     fn repositories(&self) -> Vec<RepositoryId> {
//!         vec![RepositoryId::new("local")]
//!     }
//!
//!     fn is_connected_to_repository(&self, _: &RepositoryId) -> bool {
//!         true
//!     }
//!
//!     fn plugin_information_from(
//!         &self,
//!         _: &RepositoryId,
//!     ) -> Result<RepositoryPluginInformation, TransportError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let logger = TypeIdentity::new("FileLogger", "Plugins", AssemblyName::new("plugins", "1.0"));
//! let information = RepositoryPluginInformation::new(
//!     vec![TypeDescriptor::class(logger.clone())],
//!     Vec::new(),
//!     Vec::new(),
//! );
//!
//! let cache = RepositoryCache::new(Local(information), Duration::from_secs(60));
//! assert!(cache.contains_definition_for_type(&logger));
//! ```

mod cache;
mod clock;
mod error;
mod transport;

pub use cache::RepositoryCache;
#[cfg(any(test, feature = "test-support"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use error::{RepositoryError, TransportError};
pub use transport::{RepositoryEvent, RepositoryTransport};

#[cfg(test)]
mod tests;
