//! Type catalog and import/export compatibility for Plexus.
//!
//! The catalog keeps the descriptors reported by plugin scanners and answers
//! subtype questions over them without ever loading a type. The resolver
//! builds on that graph to decide whether an export may be wired into an
//! import, including imports that ask for a wrapped value such as a sequence,
//! a lazy value or a callable.
//!
//! # Core Types
//!
//! - [`TypeCatalog`] - registered descriptors with a bidirectional subtype
//!   index
//! - [`TypeGraph`] - read access used by the resolver
//! - [`WrapperKinds`] - the open generic definitions treated as wrappers
//! - [`CompatibilityResolver`] - the acceptance check itself
//! - [`ConnectParts`] - the seam through which other components ask for
//!   acceptance
//!
//! # Example
//!
//! ```
//! use plexus_catalog::{CompatibilityResolver, TypeCatalog, WrapperKinds};
//! use plexus_types::{
//!     AssemblyName, ExportDefinition, ImportDefinition, PropertyDescriptor, TypeDescriptor,
//!     TypeIdentity,
//! };
//!
//! let assembly = AssemblyName::new("plugins", "1.0.0.0");
//! let logger = TypeIdentity::new("ILogger", "Plugins", assembly.clone());
//! let file_logger = TypeIdentity::new("FileLogger", "Plugins", assembly.clone());
//! let consumer = TypeIdentity::new("Consumer", "Plugins", assembly);
//!
//! let mut catalog = TypeCatalog::new();
//! catalog.register(TypeDescriptor::interface(logger.clone()));
//! catalog.register(TypeDescriptor::class(file_logger.clone()).with_interface(logger.clone()));
//!
//! let property = PropertyDescriptor::new("Logger", consumer, logger);
//! let import = ImportDefinition::on_property("logger", property).expect("valid import");
//! let export = ExportDefinition::on_type("logger", file_logger).expect("valid export");
//!
//! let wrappers = WrapperKinds::default();
//! let resolver = CompatibilityResolver::new(&catalog, &wrappers);
//! assert!(resolver.accepts(&import, &export));
//! ```

mod catalog;
mod error;
mod resolver;
mod wrapper;

pub use catalog::{TypeCatalog, TypeGraph};
pub use error::CatalogError;
pub use resolver::{CompatibilityResolver, ConnectParts};
pub use wrapper::{MAX_CALLABLE_ARITY, WRAPPER_ASSEMBLY, WRAPPER_NAMESPACE, WrapperKinds};

#[cfg(test)]
mod tests;
