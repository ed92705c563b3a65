//! Host facade for the Plexus plugin composition core.
//!
//! A host loads its [`plexus_config::Config`], installs structured telemetry
//! and builds a repository cache over the transport it was given. The
//! [`PluginHost`] then hands out group builders and selectors that read
//! parts, groups and type compatibility from that shared cache.
//!
//! Telemetry is installed once per process. Later bootstraps reuse the
//! subscriber installed by the first.
//!
//! # Example
//!
//! ```
//! use plexus_config::Config;
//! use plexus_host::PluginHost;
//! use plexus_repository::{RepositoryTransport, TransportError};
//! use plexus_types::{RepositoryId, RepositoryPluginInformation};
//!
//! struct Offline;
//!
//! impl RepositoryTransport for Offline {
//!     fn repositories(&self) -> Vec<RepositoryId> {
//!         Vec::new()
//!     }
//!
//!     fn is_connected_to_repository(&self, _: &RepositoryId) -> bool {
//!         false
//!     }
//!
//!     fn plugin_information_from(
//!         &self,
//!         _: &RepositoryId,
//!     ) -> Result<RepositoryPluginInformation, TransportError> {
//!         Ok(RepositoryPluginInformation::default())
//!     }
//! }
//!
//! let host = PluginHost::new(Config::default(), Offline);
//! let selector = host.group_selector();
//! assert!(selector.matching_groups(None, &Default::default()).is_empty());
//! ```

mod bootstrap;
mod host;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use host::{HostGroupBuilder, HostGroupSelector, PluginHost, SharedCache};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
