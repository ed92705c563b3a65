//! Import and export definitions.
//!
//! Both definitions share a contract name, a contract type and the declaring
//! type, and carry a site describing the member that declares them. Matching
//! logic dispatches on the site rather than on a class hierarchy.

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::identity::TypeIdentity;
use crate::member::{MethodDescriptor, ParameterDescriptor, PropertyDescriptor};

/// Returns `true` when two contract names refer to the same contract.
///
/// Contract names compare case-insensitively.
#[must_use]
pub fn contract_names_match(first: &str, second: &str) -> bool {
    first.eq_ignore_ascii_case(second)
}

fn validated_contract_name(
    contract_name: impl Into<String>,
    declaring_type: &TypeIdentity,
) -> Result<String, DefinitionError> {
    let name = contract_name.into();
    if name.trim().is_empty() {
        return Err(DefinitionError::empty_contract_name(declaring_type));
    }
    Ok(name)
}

/// Member through which a part receives an import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportSite {
    /// Constructor parameter of the declaring type.
    Constructor {
        /// Parameter receiving the import.
        parameter: ParameterDescriptor,
    },
    /// Settable property.
    Property {
        /// Property receiving the import.
        property: PropertyDescriptor,
    },
    /// Method invoked with the import.
    Method {
        /// Method receiving the import.
        method: MethodDescriptor,
    },
}

/// A typed, named capability required by a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportDefinition {
    contract_name: String,
    required_type: TypeIdentity,
    declaring_type: TypeIdentity,
    #[serde(default)]
    is_prerequisite: bool,
    site: ImportSite,
}

impl ImportDefinition {
    /// Declares an import received through a constructor parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_constructor(
        contract_name: impl Into<String>,
        declaring_type: TypeIdentity,
        parameter: ParameterDescriptor,
    ) -> Result<Self, DefinitionError> {
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            required_type: parameter.parameter_type().clone(),
            declaring_type,
            is_prerequisite: true,
            site: ImportSite::Constructor { parameter },
        })
    }

    /// Declares an import received through a property.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_property(
        contract_name: impl Into<String>,
        property: PropertyDescriptor,
    ) -> Result<Self, DefinitionError> {
        let declaring_type = property.declaring_type().clone();
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            required_type: property.property_type().clone(),
            declaring_type,
            is_prerequisite: false,
            site: ImportSite::Property { property },
        })
    }

    /// Declares an import delivered by calling a method.
    ///
    /// The required type is the type of the first parameter; methods without
    /// parameters yield a blank required type, which never matches.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_method(
        contract_name: impl Into<String>,
        method: MethodDescriptor,
    ) -> Result<Self, DefinitionError> {
        let declaring_type = method.declaring_type().clone();
        let required_type = method.parameters().first().map_or_else(
            || TypeIdentity::new("", "", declaring_type.assembly().clone()),
            |parameter| parameter.parameter_type().clone(),
        );
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            required_type,
            declaring_type,
            is_prerequisite: false,
            site: ImportSite::Method { method },
        })
    }

    /// Overrides the required type, for imports whose contract type differs
    /// from the member type.
    #[must_use]
    pub fn with_required_type(mut self, required_type: TypeIdentity) -> Self {
        self.required_type = required_type;
        self
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the type an export must produce to satisfy this import.
    #[must_use]
    pub const fn required_type(&self) -> &TypeIdentity {
        &self.required_type
    }

    /// Returns the type declaring the import.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeIdentity {
        &self.declaring_type
    }

    /// Returns `true` when the import must be satisfied before the part can
    /// be constructed.
    #[must_use]
    pub const fn is_prerequisite(&self) -> bool {
        self.is_prerequisite
    }

    /// Returns the member receiving the import.
    #[must_use]
    pub const fn site(&self) -> &ImportSite {
        &self.site
    }
}

/// Member through which a part provides an export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportSite {
    /// The part type itself is exported.
    Type,
    /// A property value is exported.
    Property {
        /// Exported property.
        property: PropertyDescriptor,
    },
    /// A method is exported as a callable.
    Method {
        /// Exported method.
        method: MethodDescriptor,
    },
}

/// A typed, named capability provided by a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportDefinition {
    contract_name: String,
    contract_type: TypeIdentity,
    declaring_type: TypeIdentity,
    site: ExportSite,
}

impl ExportDefinition {
    /// Declares that the part type itself is exported.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_type(
        contract_name: impl Into<String>,
        declaring_type: TypeIdentity,
    ) -> Result<Self, DefinitionError> {
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            contract_type: declaring_type.clone(),
            declaring_type,
            site: ExportSite::Type,
        })
    }

    /// Declares an exported property.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_property(
        contract_name: impl Into<String>,
        property: PropertyDescriptor,
    ) -> Result<Self, DefinitionError> {
        let declaring_type = property.declaring_type().clone();
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            contract_type: property.property_type().clone(),
            declaring_type,
            site: ExportSite::Property { property },
        })
    }

    /// Declares an exported method.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyContractName`] for blank contract names.
    pub fn on_method(
        contract_name: impl Into<String>,
        method: MethodDescriptor,
    ) -> Result<Self, DefinitionError> {
        let declaring_type = method.declaring_type().clone();
        Ok(Self {
            contract_name: validated_contract_name(contract_name, &declaring_type)?,
            contract_type: method
                .return_type()
                .cloned()
                .unwrap_or_else(|| declaring_type.clone()),
            declaring_type,
            site: ExportSite::Method { method },
        })
    }

    /// Overrides the advertised contract type.
    #[must_use]
    pub fn with_contract_type(mut self, contract_type: TypeIdentity) -> Self {
        self.contract_type = contract_type;
        self
    }

    /// Returns the contract name.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }

    /// Returns the advertised contract type.
    #[must_use]
    pub const fn contract_type(&self) -> &TypeIdentity {
        &self.contract_type
    }

    /// Returns the type declaring the export.
    #[must_use]
    pub const fn declaring_type(&self) -> &TypeIdentity {
        &self.declaring_type
    }

    /// Returns the member providing the export.
    #[must_use]
    pub const fn site(&self) -> &ExportSite {
        &self.site
    }

    /// Returns the type of the value this export produces.
    ///
    /// Type exports produce the declaring type, property exports the property
    /// type and method exports their return type. Methods without a return
    /// value produce nothing.
    #[must_use]
    pub const fn produced_type(&self) -> Option<&TypeIdentity> {
        match &self.site {
            ExportSite::Type => Some(&self.declaring_type),
            ExportSite::Property { property } => Some(property.property_type()),
            ExportSite::Method { method } => method.return_type(),
        }
    }

    /// Returns the exported method, if this is a method export.
    #[must_use]
    pub const fn method(&self) -> Option<&MethodDescriptor> {
        match &self.site {
            ExportSite::Method { method } => Some(method),
            ExportSite::Type | ExportSite::Property { .. } => None,
        }
    }
}
