//! Subtype graph over registered type descriptors.

use std::collections::{HashMap, HashSet, VecDeque};

use plexus_types::{TypeDescriptor, TypeIdentity};
use tracing::trace;

use crate::error::CatalogError;

/// Read access to a set of type descriptors and their subtype relation.
///
/// The compatibility resolver runs against this trait so that it can be fed
/// either a bare [`TypeCatalog`] or a catalog guarded by some outer lock.
pub trait TypeGraph {
    /// Returns the descriptor registered for `identity`.
    fn descriptor(&self, identity: &TypeIdentity) -> Option<&TypeDescriptor>;

    /// Returns `true` when `child` reaches `parent` through base types,
    /// generic type definitions or interfaces.
    fn is_subtype_of(&self, parent: &TypeIdentity, child: &TypeIdentity) -> bool;
}

/// Registered type descriptors with a bidirectional supertype index.
///
/// Edges only connect registered types. References to types that are not
/// registered yet are remembered, so the edge appears as soon as the missing
/// type is registered.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    /// All registered descriptors.
    descriptors: HashMap<TypeIdentity, TypeDescriptor>,
    /// Registered direct supertypes of each registered type.
    supertypes: HashMap<TypeIdentity, HashSet<TypeIdentity>>,
    /// Registered direct subtypes of each registered type.
    subtypes: HashMap<TypeIdentity, HashSet<TypeIdentity>>,
    /// Registered types that name a given identity as a supertype.
    referrers: HashMap<TypeIdentity, HashSet<TypeIdentity>>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor.
    ///
    /// Registering an already known identity is a no-op.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        let identity = descriptor.identity().clone();
        if self.descriptors.contains_key(&identity) {
            return;
        }

        for supertype in descriptor.supertypes() {
            self.referrers
                .entry(supertype.clone())
                .or_default()
                .insert(identity.clone());
            if self.descriptors.contains_key(supertype) {
                self.link(&identity, supertype);
            }
        }

        let waiting: Vec<TypeIdentity> = self
            .referrers
            .get(&identity)
            .into_iter()
            .flatten()
            .filter(|child| **child != identity)
            .cloned()
            .collect();
        for child in waiting {
            self.link(&child, &identity);
        }

        trace!(target: "plexus_catalog", %identity, "registered type");
        self.descriptors.insert(identity, descriptor);
    }

    /// Removes a type and every edge touching it.
    ///
    /// Unknown identities are ignored.
    pub fn unregister(&mut self, identity: &TypeIdentity) {
        let Some(descriptor) = self.descriptors.remove(identity) else {
            return;
        };

        for supertype in descriptor.supertypes() {
            if let Some(referrers) = self.referrers.get_mut(supertype) {
                referrers.remove(identity);
                if referrers.is_empty() {
                    self.referrers.remove(supertype);
                }
            }
        }

        for parent in self.supertypes.remove(identity).into_iter().flatten() {
            if let Some(children) = self.subtypes.get_mut(&parent) {
                children.remove(identity);
            }
        }
        for child in self.subtypes.remove(identity).into_iter().flatten() {
            if let Some(parents) = self.supertypes.get_mut(&child) {
                parents.remove(identity);
            }
        }

        trace!(target: "plexus_catalog", %identity, "unregistered type");
    }

    fn link(&mut self, child: &TypeIdentity, parent: &TypeIdentity) {
        self.supertypes
            .entry(child.clone())
            .or_default()
            .insert(parent.clone());
        self.subtypes
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
    }

    /// Returns `true` when `child` is a proper subtype of `parent`.
    ///
    /// A type is never its own subtype; callers compare for equality
    /// separately.
    #[must_use]
    pub fn is_subtype_of(&self, parent: &TypeIdentity, child: &TypeIdentity) -> bool {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<&TypeIdentity> = self
            .supertypes
            .get(child)
            .into_iter()
            .flatten()
            .collect();

        while let Some(current) = queue.pop_front() {
            if current == parent {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            queue.extend(self.supertypes.get(current).into_iter().flatten());
        }
        false
    }

    /// Returns the descriptor registered for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTypeDefinition`] when the type is not
    /// registered.
    pub fn lookup(&self, identity: &TypeIdentity) -> Result<&TypeDescriptor, CatalogError> {
        self.descriptors
            .get(identity)
            .ok_or_else(|| CatalogError::unknown_type_definition(identity))
    }

    /// Returns the descriptor whose assembly-qualified name matches `name`,
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTypeDefinition`] when no registered
    /// type carries that name.
    pub fn lookup_by_name(&self, name: &str) -> Result<&TypeDescriptor, CatalogError> {
        self.descriptors
            .iter()
            .find(|(identity, _)| {
                identity
                    .assembly_qualified_name()
                    .is_some_and(|qualified| qualified.eq_ignore_ascii_case(name))
            })
            .map(|(_, descriptor)| descriptor)
            .ok_or_else(|| CatalogError::unknown_type_definition(name))
    }

    /// Returns whether `identity` is registered.
    #[must_use]
    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.descriptors.contains_key(identity)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates over all registered descriptors in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }
}

impl TypeGraph for TypeCatalog {
    fn descriptor(&self, identity: &TypeIdentity) -> Option<&TypeDescriptor> {
        self.descriptors.get(identity)
    }

    fn is_subtype_of(&self, parent: &TypeIdentity, child: &TypeIdentity) -> bool {
        Self::is_subtype_of(self, parent, child)
    }
}
