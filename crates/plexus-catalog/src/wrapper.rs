//! Open generic wrapper contracts understood by the resolver.
//!
//! An import may ask for a wrapped value instead of the exported value
//! itself: a sequence of values, a lazily produced value, or a callable. The
//! wrappers are identified by their open generic definitions.

use plexus_types::{AssemblyName, TypeIdentity};

/// Namespace of the built-in wrapper definitions.
pub const WRAPPER_NAMESPACE: &str = "Plexus.Composition";

/// Assembly holding the built-in wrapper definitions.
pub const WRAPPER_ASSEMBLY: &str = "plexus.core";

/// Largest function or action arity recognised as a wrapper.
pub const MAX_CALLABLE_ARITY: usize = 4;

/// The open generic definitions treated as wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperKinds {
    sequence: TypeIdentity,
    lazy: Vec<TypeIdentity>,
    functions: Vec<TypeIdentity>,
    actions: Vec<TypeIdentity>,
}

impl WrapperKinds {
    /// Creates a custom wrapper set.
    ///
    /// `lazy` holds the lazy definitions (value only, or value plus
    /// metadata); `functions` and `actions` hold one definition per arity.
    #[must_use]
    pub const fn new(
        sequence: TypeIdentity,
        lazy: Vec<TypeIdentity>,
        functions: Vec<TypeIdentity>,
        actions: Vec<TypeIdentity>,
    ) -> Self {
        Self {
            sequence,
            lazy,
            functions,
            actions,
        }
    }

    /// Returns the sequence definition.
    #[must_use]
    pub const fn sequence(&self) -> &TypeIdentity {
        &self.sequence
    }

    /// Returns the lazy definitions.
    #[must_use]
    pub fn lazy(&self) -> &[TypeIdentity] {
        &self.lazy
    }

    /// Returns the function definitions.
    #[must_use]
    pub fn functions(&self) -> &[TypeIdentity] {
        &self.functions
    }

    /// Returns the action definitions.
    #[must_use]
    pub fn actions(&self) -> &[TypeIdentity] {
        &self.actions
    }
}

impl Default for WrapperKinds {
    /// `Sequence<T>`, `Lazy<T>`, `Lazy<T, TMetadata>`, `Function<..>` and
    /// `Action<..>` from the `Plexus.Composition` namespace.
    fn default() -> Self {
        let assembly = AssemblyName::new(WRAPPER_ASSEMBLY, "1.0.0.0");
        let define = |name: &str, parameters: &[String]| {
            let arguments = parameters
                .iter()
                .map(|parameter| TypeIdentity::generic_parameter(parameter, assembly.clone()))
                .collect();
            TypeIdentity::new(name, WRAPPER_NAMESPACE, assembly.clone())
                .with_type_arguments(arguments)
        };

        let sequence = define("Sequence", &["T".to_owned()]);
        let lazy = vec![
            define("Lazy", &["T".to_owned()]),
            define("Lazy", &["T".to_owned(), "TMetadata".to_owned()]),
        ];
        let functions = (1..=MAX_CALLABLE_ARITY)
            .map(|arity| {
                let mut parameters: Vec<String> =
                    (1..arity).map(|position| format!("T{position}")).collect();
                parameters.push("TResult".to_owned());
                define("Function", &parameters)
            })
            .collect();
        let actions = (1..=MAX_CALLABLE_ARITY)
            .map(|arity| {
                let parameters: Vec<String> =
                    (1..=arity).map(|position| format!("T{position}")).collect();
                define("Action", &parameters)
            })
            .collect();

        Self::new(sequence, lazy, functions, actions)
    }
}
