//! Reference-counted cache contents.
//!
//! Every cached item remembers the set of repositories that reported it.
//! Dropping a repository releases its items; an item is evicted once no
//! repository reports it any more.
//!
//! A part is only served while some repository describes its type. Losing
//! the type hides the part without touching its sources, so the part comes
//! back with every reporting repository once the type is reported again.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Instant;

use plexus_catalog::TypeCatalog;
use plexus_types::{
    GroupDefinition, GroupRegistrationId, PartDefinition, RepositoryId,
    RepositoryPluginInformation, TypeIdentity,
};
use tracing::debug;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    sources: HashSet<RepositoryId>,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            sources: HashSet::new(),
        }
    }

    fn source_list(&self) -> Vec<RepositoryId> {
        self.sources.iter().cloned().collect()
    }
}

/// What one repository contributed, and until when it is fresh.
#[derive(Debug)]
struct Contribution {
    types: Vec<TypeIdentity>,
    parts: Vec<TypeIdentity>,
    groups: Vec<GroupRegistrationId>,
    /// `None` when the configured lifetime does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
pub(super) struct CacheState {
    catalog: TypeCatalog,
    types: HashMap<TypeIdentity, HashSet<RepositoryId>>,
    parts: HashMap<TypeIdentity, Entry<PartDefinition>>,
    groups: HashMap<GroupRegistrationId, Entry<GroupDefinition>>,
    contributions: HashMap<RepositoryId, Contribution>,
}

impl CacheState {
    pub(super) const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Records the snapshot of `repository`.
    ///
    /// Types are registered with the catalog; parts and groups already known
    /// from another repository keep their existing definition.
    pub(super) fn absorb(
        &mut self,
        repository: &RepositoryId,
        information: RepositoryPluginInformation,
        expires_at: Option<Instant>,
    ) {
        let (types, parts, groups) = information.into_parts();
        let mut contribution = Contribution {
            types: Vec::with_capacity(types.len()),
            parts: Vec::with_capacity(parts.len()),
            groups: Vec::with_capacity(groups.len()),
            expires_at,
        };

        for descriptor in types {
            let identity = descriptor.identity().clone();
            let sources = self.types.entry(identity.clone()).or_default();
            if sources.insert(repository.clone()) {
                contribution.types.push(identity);
            }
            self.catalog.register(descriptor);
        }

        for part in parts {
            let identity = part.identity().clone();
            let entry = self
                .parts
                .entry(identity.clone())
                .or_insert_with(|| Entry::new(part));
            if entry.sources.insert(repository.clone()) {
                contribution.parts.push(identity);
            }
        }

        for group in groups {
            let id = group.id().clone();
            let entry = self
                .groups
                .entry(id.clone())
                .or_insert_with(|| Entry::new(group));
            if entry.sources.insert(repository.clone()) {
                contribution.groups.push(id);
            }
        }

        self.contributions.insert(repository.clone(), contribution);
    }

    /// Releases everything `repository` contributed.
    ///
    /// Returns `false` when the repository was not known.
    pub(super) fn forget(&mut self, repository: &RepositoryId) -> bool {
        let Some(contribution) = self.contributions.remove(repository) else {
            return false;
        };

        for identity in &contribution.types {
            self.release_type(identity, repository);
        }
        for identity in &contribution.parts {
            if release(&mut self.parts, identity, repository) {
                debug!(%repository, part = %identity, "evicted part");
            }
        }
        for id in &contribution.groups {
            if release(&mut self.groups, id, repository) {
                debug!(%repository, group = %id, "evicted group");
            }
        }
        true
    }

    fn release_type(&mut self, identity: &TypeIdentity, repository: &RepositoryId) {
        let Some(sources) = self.types.get_mut(identity) else {
            return;
        };
        sources.remove(repository);
        if !sources.is_empty() {
            return;
        }

        self.types.remove(identity);
        self.catalog.unregister(identity);
        let hid_part = self.parts.contains_key(identity);
        debug!(%repository, %identity, hid_part, "evicted type");
    }

    pub(super) fn is_fresh(&self, repository: &RepositoryId, now: Instant) -> bool {
        self.contributions
            .get(repository)
            .is_some_and(|contribution| contribution.expires_at.is_none_or(|at| at > now))
    }

    pub(super) fn expired(&self, now: Instant) -> Vec<RepositoryId> {
        self.contributions
            .keys()
            .filter(|repository| !self.is_fresh(repository, now))
            .cloned()
            .collect()
    }

    pub(super) fn repositories(&self) -> impl Iterator<Item = &RepositoryId> {
        self.contributions.keys()
    }

    pub(super) fn type_sources(&self, identity: &TypeIdentity) -> Option<Vec<RepositoryId>> {
        self.types.get(identity).map(|sources| sources.iter().cloned().collect())
    }

    pub(super) fn type_named(&self, name: &str) -> Option<&TypeIdentity> {
        self.types
            .keys()
            .find(|identity| has_qualified_name(identity, name))
    }

    pub(super) fn part_sources(&self, identity: &TypeIdentity) -> Option<Vec<RepositoryId>> {
        self.served_part(identity).map(Entry::source_list)
    }

    pub(super) fn part(&self, identity: &TypeIdentity) -> Option<&PartDefinition> {
        self.served_part(identity).map(|entry| &entry.value)
    }

    pub(super) fn part_named(&self, name: &str) -> Option<&PartDefinition> {
        self.served_parts()
            .find(|(identity, _)| has_qualified_name(identity, name))
            .map(|(_, entry)| &entry.value)
    }

    pub(super) fn group_sources(&self, id: &GroupRegistrationId) -> Option<Vec<RepositoryId>> {
        self.groups.get(id).map(Entry::source_list)
    }

    pub(super) fn group(&self, id: &GroupRegistrationId) -> Option<&GroupDefinition> {
        self.groups.get(id).map(|entry| &entry.value)
    }

    pub(super) fn parts(&self) -> impl Iterator<Item = &PartDefinition> {
        self.served_parts().map(|(_, entry)| &entry.value)
    }

    fn served_part(&self, identity: &TypeIdentity) -> Option<&Entry<PartDefinition>> {
        self.parts
            .get(identity)
            .filter(|_| self.types.contains_key(identity))
    }

    fn served_parts(&self) -> impl Iterator<Item = (&TypeIdentity, &Entry<PartDefinition>)> {
        self.parts
            .iter()
            .filter(|(identity, _)| self.types.contains_key(*identity))
    }

    pub(super) fn groups(&self) -> impl Iterator<Item = &GroupDefinition> {
        self.groups.values().map(|entry| &entry.value)
    }
}

/// Drops `repository` from the sources of `key`, evicting the entry when no
/// source remains. Returns `true` on eviction.
fn release<K: Eq + Hash, V>(
    map: &mut HashMap<K, Entry<V>>,
    key: &K,
    repository: &RepositoryId,
) -> bool {
    let Some(entry) = map.get_mut(key) else {
        return false;
    };
    entry.sources.remove(repository);
    if entry.sources.is_empty() {
        map.remove(key);
        return true;
    }
    false
}

fn has_qualified_name(identity: &TypeIdentity, name: &str) -> bool {
    identity
        .assembly_qualified_name()
        .is_some_and(|qualified| qualified.eq_ignore_ascii_case(name))
}
