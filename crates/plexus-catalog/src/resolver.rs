//! Decides whether an export satisfies an import.

use std::collections::{HashSet, VecDeque};
use std::slice;
use std::sync::Arc;

use plexus_types::{
    ExportDefinition, ImportDefinition, ParameterDescriptor, TypeIdentity, contract_names_match,
};

use crate::catalog::TypeGraph;
use crate::wrapper::WrapperKinds;

/// Something that can tell whether an export may be wired into an import.
pub trait ConnectParts {
    /// Returns `true` when `export` satisfies `import`.
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool;
}

impl<T: ConnectParts + ?Sized> ConnectParts for &T {
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        (**self).accepts(import, export)
    }
}

impl<T: ConnectParts + ?Sized> ConnectParts for Arc<T> {
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        (**self).accepts(import, export)
    }
}

/// Matches imports against exports using a type graph and a wrapper set.
///
/// An export is accepted when the type it produces is the required type or
/// one of its subtypes, or when the required type is a wrapper whose type
/// arguments unify with the export:
///
/// - `Sequence<T>` takes exports of `T`, or of `U` when `T` is `Lazy<U>`,
/// - `Lazy<T>` and `Lazy<T, TMetadata>` take exports of `T`,
/// - `Function<.., TResult>` takes method exports with a matching signature,
///   and for a single argument also plain exports of `TResult`,
/// - `Action<..>` takes methods without a return value whose parameters
///   match.
///
/// Wrappers are detected through the descriptor of the required type and,
/// recursively, its base type, generic type definition and interfaces.
/// Types without a descriptor are compared structurally against the open
/// generic definitions.
#[derive(Debug)]
pub struct CompatibilityResolver<'a, G: ?Sized> {
    graph: &'a G,
    wrappers: &'a WrapperKinds,
}

impl<'a, G: TypeGraph + ?Sized> CompatibilityResolver<'a, G> {
    /// Creates a resolver over `graph`.
    #[must_use]
    pub const fn new(graph: &'a G, wrappers: &'a WrapperKinds) -> Self {
        Self { graph, wrappers }
    }

    /// Returns `true` when `export` satisfies `import`.
    #[must_use]
    pub fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        let required = import.required_type();
        if required.is_blank() {
            return false;
        }
        if !contract_names_match(import.contract_name(), export.contract_name()) {
            return false;
        }

        let produced = export.produced_type();
        if self.matches(required, produced) {
            return true;
        }

        let wrappers = self.wrappers;
        self.closure_of(required, slice::from_ref(wrappers.sequence()))
            .is_some_and(|closure| self.sequence_accepts(&closure, produced))
            || self
                .closure_of(required, wrappers.lazy())
                .is_some_and(|closure| self.lazy_accepts(&closure, produced))
            || self
                .closure_of(required, wrappers.functions())
                .is_some_and(|closure| self.function_accepts(&closure, export))
            || self
                .closure_of(required, wrappers.actions())
                .is_some_and(|closure| self.action_accepts(&closure, export))
    }

    fn matches(&self, required: &TypeIdentity, available: Option<&TypeIdentity>) -> bool {
        available.is_some_and(|available| {
            required == available || self.graph.is_subtype_of(required, available)
        })
    }

    /// Finds the instantiation of one of `definitions` that `required` is or
    /// derives from.
    fn closure_of(
        &self,
        required: &TypeIdentity,
        definitions: &[TypeIdentity],
    ) -> Option<TypeIdentity> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([required.clone()]);

        while let Some(candidate) = queue.pop_front() {
            if !visited.insert(candidate.clone()) {
                continue;
            }
            if is_closure_of(&candidate, definitions) {
                return Some(candidate);
            }

            let Some(descriptor) = self.graph.descriptor(&candidate) else {
                continue;
            };
            let instantiates_wrapper = !candidate.is_open_generic()
                && descriptor.generic_type_definition().is_some_and(|definition| {
                    definitions
                        .iter()
                        .any(|wrapper| definition.is_shaped_like(wrapper))
                });
            if instantiates_wrapper {
                return Some(candidate);
            }
            queue.extend(descriptor.supertypes().cloned());
        }
        None
    }

    fn sequence_accepts(&self, closure: &TypeIdentity, produced: Option<&TypeIdentity>) -> bool {
        let [element] = closure.type_arguments() else {
            return false;
        };
        if self.matches(element, produced) {
            return true;
        }
        self.closure_of(element, self.wrappers.lazy())
            .is_some_and(|lazy| self.lazy_accepts(&lazy, produced))
    }

    fn lazy_accepts(&self, closure: &TypeIdentity, produced: Option<&TypeIdentity>) -> bool {
        closure
            .type_arguments()
            .first()
            .is_some_and(|value| self.matches(value, produced))
    }

    fn function_accepts(&self, closure: &TypeIdentity, export: &ExportDefinition) -> bool {
        let Some((result, parameters)) = closure.type_arguments().split_last() else {
            return false;
        };
        match export.method() {
            Some(method) => {
                self.matches(result, method.return_type())
                    && self.parameters_match(parameters, method.parameters())
            }
            None => parameters.is_empty() && self.matches(result, export.produced_type()),
        }
    }

    fn action_accepts(&self, closure: &TypeIdentity, export: &ExportDefinition) -> bool {
        export.method().is_some_and(|method| {
            method.return_type().is_none()
                && self.parameters_match(closure.type_arguments(), method.parameters())
        })
    }

    fn parameters_match(&self, required: &[TypeIdentity], actual: &[ParameterDescriptor]) -> bool {
        required.len() == actual.len()
            && required
                .iter()
                .zip(actual)
                .all(|(expected, parameter)| {
                    self.matches(expected, Some(parameter.parameter_type()))
                })
    }
}

impl<G: TypeGraph + ?Sized> ConnectParts for CompatibilityResolver<'_, G> {
    fn accepts(&self, import: &ImportDefinition, export: &ExportDefinition) -> bool {
        Self::accepts(self, import, export)
    }
}

fn is_closure_of(candidate: &TypeIdentity, definitions: &[TypeIdentity]) -> bool {
    !candidate.is_open_generic()
        && definitions
            .iter()
            .any(|definition| candidate.is_shaped_like(definition))
}
