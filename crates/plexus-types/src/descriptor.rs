//! Type descriptors: an identity plus its supertype relations.

use serde::{Deserialize, Serialize};

use crate::identity::TypeIdentity;

/// Metadata describing one scanned type.
///
/// Descriptors are produced once per distinct type by the scanner and feed
/// the subtype graph maintained by the type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    identity: TypeIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_type: Option<TypeIdentity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<TypeIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generic_type_definition: Option<TypeIdentity>,
    is_class: bool,
    is_interface: bool,
}

impl TypeDescriptor {
    /// Describes a class.
    #[must_use]
    pub const fn class(identity: TypeIdentity) -> Self {
        Self {
            identity,
            base_type: None,
            interfaces: Vec::new(),
            generic_type_definition: None,
            is_class: true,
            is_interface: false,
        }
    }

    /// Describes an interface.
    #[must_use]
    pub const fn interface(identity: TypeIdentity) -> Self {
        Self {
            identity,
            base_type: None,
            interfaces: Vec::new(),
            generic_type_definition: None,
            is_class: false,
            is_interface: true,
        }
    }

    /// Describes a type that is neither a class nor an interface, such as a
    /// value type or a generic parameter.
    #[must_use]
    pub const fn other(identity: TypeIdentity) -> Self {
        Self {
            identity,
            base_type: None,
            interfaces: Vec::new(),
            generic_type_definition: None,
            is_class: false,
            is_interface: false,
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_base_type(mut self, base_type: TypeIdentity) -> Self {
        self.base_type = Some(base_type);
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: TypeIdentity) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Sets the generic type definition this type instantiates.
    #[must_use]
    pub fn with_generic_type_definition(mut self, definition: TypeIdentity) -> Self {
        self.generic_type_definition = Some(definition);
        self
    }

    /// Returns the type identity.
    #[must_use]
    pub const fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Returns the base type, if any.
    #[must_use]
    pub const fn base_type(&self) -> Option<&TypeIdentity> {
        self.base_type.as_ref()
    }

    /// Returns the implemented interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[TypeIdentity] {
        &self.interfaces
    }

    /// Returns the generic type definition, if any.
    #[must_use]
    pub const fn generic_type_definition(&self) -> Option<&TypeIdentity> {
        self.generic_type_definition.as_ref()
    }

    /// Returns `true` for classes.
    #[must_use]
    pub const fn is_class(&self) -> bool {
        self.is_class
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Iterates over every type this descriptor points at: the base type,
    /// the generic type definition and the interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.base_type
            .iter()
            .chain(self.generic_type_definition.iter())
            .chain(self.interfaces.iter())
    }
}
