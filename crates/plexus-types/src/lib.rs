//! Shared data model for the Plexus plugin composition core.
//!
//! Everything in this crate is plain, serializable metadata. Types are
//! described structurally through [`TypeIdentity`] and [`TypeDescriptor`]
//! values produced by an external scanner; nothing here loads or executes
//! plugin code. The higher-level crates reason about these descriptions:
//!
//! - `plexus-catalog` builds the subtype graph and decides whether an export
//!   satisfies an import,
//! - `plexus-repository` caches the metadata reported by remote plugin
//!   repositories,
//! - `plexus-composition` builds [`GroupDefinition`]s and wires selected
//!   groups together.
//!
//! # Example
//!
//! ```
//! use plexus_types::{AssemblyName, ExportDefinition, PartDefinition, TypeIdentity};
//!
//! let assembly = AssemblyName::new("plugins", "1.0.0.0");
//! let logger = TypeIdentity::new("FileLogger", "Plugins.Logging", assembly);
//! let export = ExportDefinition::on_type("logger", logger.clone()).expect("valid contract");
//!
//! let part = PartDefinition::new(logger)
//!     .with_export(export)
//!     .expect("unique registration");
//! assert_eq!(part.exports().len(), 1);
//! ```

pub mod contract;
pub mod descriptor;
pub mod error;
pub mod group;
pub mod identity;
pub mod member;
pub mod part;
pub mod registration;
pub mod repository;
pub mod schedule;

pub use self::contract::{
    ExportDefinition, ExportSite, ImportDefinition, ImportSite, contract_names_match,
};
pub use self::descriptor::TypeDescriptor;
pub use self::error::DefinitionError;
pub use self::group::{
    GroupContents, GroupDefinition, GroupExportDefinition, GroupImportDefinition, GroupObject,
    GroupSchedule, PartConnection, ScheduleActionBinding, ScheduleConditionBinding,
};
pub use self::identity::{AssemblyName, TypeIdentity};
pub use self::member::{MethodDescriptor, ParameterDescriptor, PropertyDescriptor};
pub use self::part::{
    ConditionSite, PartDefinition, ScheduleActionDefinition, ScheduleConditionDefinition,
};
pub use self::registration::{
    ExportRegistrationId, GroupRegistrationId, ImportRegistrationId, RegistrationId,
    ScheduleActionRegistrationId, ScheduleConditionRegistrationId,
};
pub use self::repository::{RepositoryId, RepositoryPluginInformation};
pub use self::schedule::{InsertPoint, ScheduleDefinition, ScheduleElementId, ScheduleId};
