//! Structural type identities.
//!
//! A [`TypeIdentity`] describes a type well enough to compare it with other
//! types and to reason about subtyping without loading it. Names and
//! namespaces compare case-insensitively; type arguments compare pointwise.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

fn hash_ignore_case<H: Hasher>(value: &str, state: &mut H) {
    for byte in value.bytes() {
        state.write_u8(byte.to_ascii_lowercase());
    }
    // Separator so that ("ab", "c") and ("a", "bc") hash differently.
    state.write_u8(0xff);
}

/// Name and version of the assembly that owns a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyName {
    name: String,
    version: String,
}

impl AssemblyName {
    /// Creates a new assembly reference.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the simple assembly name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the assembly version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }
}

impl PartialEq for AssemblyName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.version == other.version
    }
}

impl Eq for AssemblyName {}

impl Hash for AssemblyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_ignore_case(&self.name, state);
        self.version.hash(state);
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Version={}", self.name, self.version)
    }
}

/// Load-free description of a type.
///
/// Equality ignores the structural flags and the declaring type: two
/// identities are equal when their names, namespaces, assemblies and type
/// arguments agree.
///
/// # Example
///
/// ```
/// use plexus_types::{AssemblyName, TypeIdentity};
///
/// let assembly = AssemblyName::new("plugins", "1.0.0.0");
/// let lower = TypeIdentity::new("ifoo", "plugins.api", assembly.clone());
/// let upper = TypeIdentity::new("IFoo", "Plugins.Api", assembly);
/// assert_eq!(lower, upper);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeIdentity {
    name: String,
    namespace: String,
    assembly: AssemblyName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    type_arguments: Vec<TypeIdentity>,
    #[serde(default)]
    is_generic_parameter: bool,
    #[serde(default)]
    is_open_generic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    declaring_type: Option<Box<TypeIdentity>>,
}

impl TypeIdentity {
    /// Creates the identity of a non-generic, non-nested type.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        assembly: AssemblyName,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            assembly,
            type_arguments: Vec::new(),
            is_generic_parameter: false,
            is_open_generic: false,
            declaring_type: None,
        }
    }

    /// Creates the identity of a generic type parameter such as `T`.
    #[must_use]
    pub fn generic_parameter(name: impl Into<String>, assembly: AssemblyName) -> Self {
        Self {
            is_generic_parameter: true,
            ..Self::new(name, "", assembly)
        }
    }

    /// Returns a copy of this identity with the given type arguments.
    ///
    /// The result is an open generic when any argument is a generic
    /// parameter or is itself open.
    #[must_use]
    pub fn with_type_arguments(mut self, arguments: Vec<Self>) -> Self {
        self.is_open_generic = arguments
            .iter()
            .any(|argument| argument.is_generic_parameter || argument.is_open_generic);
        self.type_arguments = arguments;
        self
    }

    /// Closes this (generic definition) identity over the given arguments.
    #[must_use]
    pub fn instantiate(&self, arguments: Vec<Self>) -> Self {
        self.clone().with_type_arguments(arguments)
    }

    /// Marks this identity as nested inside `declaring_type`.
    #[must_use]
    pub fn nested_in(mut self, declaring_type: Self) -> Self {
        self.declaring_type = Some(Box::new(declaring_type));
        self
    }

    /// Returns the simple type name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the namespace, empty for generic parameters.
    #[must_use]
    pub const fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// Returns the owning assembly.
    #[must_use]
    pub const fn assembly(&self) -> &AssemblyName {
        &self.assembly
    }

    /// Returns the ordered type arguments.
    #[must_use]
    pub fn type_arguments(&self) -> &[Self] {
        &self.type_arguments
    }

    /// Returns the declaring type of a nested type.
    #[must_use]
    pub fn declaring_type(&self) -> Option<&Self> {
        self.declaring_type.as_deref()
    }

    /// Returns `true` for generic type parameters.
    #[must_use]
    pub const fn is_generic_parameter(&self) -> bool {
        self.is_generic_parameter
    }

    /// Returns `true` when some type argument is still unbound.
    #[must_use]
    pub const fn is_open_generic(&self) -> bool {
        self.is_open_generic
    }

    /// Returns `true` for nested types.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.declaring_type.is_some()
    }

    /// Returns `true` when the type has type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_arguments.is_empty()
    }

    /// Returns `true` when the identity has no usable name.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Returns `true` when `self` has the shape of an instantiation of the
    /// open generic `definition`: same name, namespace, assembly and number
    /// of type arguments.
    #[must_use]
    pub fn is_shaped_like(&self, definition: &Self) -> bool {
        definition.is_open_generic
            && self.type_arguments.len() == definition.type_arguments.len()
            && self.name.eq_ignore_ascii_case(&definition.name)
            && self.namespace.eq_ignore_ascii_case(&definition.namespace)
            && self.assembly == definition.assembly
    }

    /// Returns the namespace-qualified name including type arguments.
    ///
    /// Generic parameters have no full name. Open generics are formatted
    /// without their parameters.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        if self.is_generic_parameter {
            return None;
        }

        if self.is_open_generic {
            return Some(self.qualified_nested_name());
        }

        Some(format!(
            "{}{}",
            self.qualified_nested_name(),
            self.format_type_arguments(true)
        ))
    }

    /// Returns the full name followed by the assembly name.
    #[must_use]
    pub fn assembly_qualified_name(&self) -> Option<String> {
        self.full_name()
            .map(|full_name| format!("{full_name}, {}", self.assembly))
    }

    fn qualified_nested_name(&self) -> String {
        if self.namespace.is_empty() {
            self.nested_name()
        } else {
            format!("{}.{}", self.namespace, self.nested_name())
        }
    }

    fn nested_name(&self) -> String {
        match &self.declaring_type {
            Some(declaring) => format!("{}+{}", declaring.nested_name(), self.name),
            None => self.name.clone(),
        }
    }

    fn format_type_arguments(&self, fully_qualified: bool) -> String {
        if self.type_arguments.is_empty() {
            return String::new();
        }

        let arguments: Vec<String> = self
            .type_arguments
            .iter()
            .map(|argument| {
                let text = if argument.is_generic_parameter {
                    None
                } else if fully_qualified {
                    argument.assembly_qualified_name()
                } else {
                    argument.full_name()
                };
                text.map_or_else(|| argument.name.clone(), |name| format!("[{name}]"))
            })
            .collect();
        format!("[{}]", arguments.join(","))
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.namespace.eq_ignore_ascii_case(&other.namespace)
            && self.assembly == other.assembly
            && self.type_arguments == other.type_arguments
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_ignore_case(&self.name, state);
        hash_ignore_case(&self.namespace, state);
        self.assembly.hash(state);
        self.type_arguments.hash(state);
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generic_parameter {
            return f.write_str(&self.name);
        }
        write!(
            f,
            "{}{}",
            self.qualified_nested_name(),
            self.format_type_arguments(false)
        )
    }
}
