//! Descriptors for the members that carry imports, exports and schedule
//! hooks.

use serde::{Deserialize, Serialize};

use crate::identity::TypeIdentity;

/// A property on a part type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    name: String,
    declaring_type: TypeIdentity,
    property_type: TypeIdentity,
}

impl PropertyDescriptor {
    /// Creates a property descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declaring_type: TypeIdentity,
        property_type: TypeIdentity,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            property_type,
        }
    }

    /// Returns the property name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the type that declares the property.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeIdentity {
        &self.declaring_type
    }

    /// Returns the property type.
    #[must_use]
    pub const fn property_type(&self) -> &TypeIdentity {
        &self.property_type
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    name: String,
    parameter_type: TypeIdentity,
}

impl ParameterDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_type: TypeIdentity) -> Self {
        Self {
            name: name.into(),
            parameter_type,
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parameter type.
    #[must_use]
    pub const fn parameter_type(&self) -> &TypeIdentity {
        &self.parameter_type
    }
}

/// A method on a part type.
///
/// A `None` return type means the method returns no value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: TypeIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_type: Option<TypeIdentity>,
    #[serde(default)]
    parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    /// Creates a method descriptor without parameters or return value.
    #[must_use]
    pub fn new(name: impl Into<String>, declaring_type: TypeIdentity) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            return_type: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the return type.
    #[must_use]
    pub fn returning(mut self, return_type: TypeIdentity) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Returns the method name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the type that declares the method.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeIdentity {
        &self.declaring_type
    }

    /// Returns the return type, `None` for methods without a return value.
    #[must_use]
    pub const fn return_type(&self) -> Option<&TypeIdentity> {
        self.return_type.as_ref()
    }

    /// Returns the ordered parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }
}
