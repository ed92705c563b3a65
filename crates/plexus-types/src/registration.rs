//! Registration ids for the members of objects inside a group.
//!
//! An id is the triple `(owner type, object index, contract name)`. The
//! object index distinguishes several objects of the same type registered in
//! one group. The marker parameter keeps import ids, export ids, action ids
//! and condition ids from being mixed up.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::identity::TypeIdentity;

/// Marker for import registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportSlot {}

/// Marker for export registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportSlot {}

/// Marker for schedule action registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {}

/// Marker for schedule condition registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionSlot {}

/// Identifies one member of one registered object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId<K> {
    owner: TypeIdentity,
    index: usize,
    contract_name: String,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K> RegistrationId<K> {
    /// Creates a registration id.
    #[must_use]
    pub fn new(owner: TypeIdentity, index: usize, contract_name: impl Into<String>) -> Self {
        Self {
            owner,
            index,
            contract_name: contract_name.into(),
            kind: PhantomData,
        }
    }

    /// Returns the type of the object owning the member.
    #[must_use]
    pub const fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    /// Returns the index of the object among same-typed objects.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the contract name of the member.
    #[must_use]
    pub const fn contract_name(&self) -> &str {
        self.contract_name.as_str()
    }
}

impl<K> fmt::Display for RegistrationId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}:{}", self.owner, self.index, self.contract_name)
    }
}

/// Id of an import on a registered object.
pub type ImportRegistrationId = RegistrationId<ImportSlot>;

/// Id of an export on a registered object.
pub type ExportRegistrationId = RegistrationId<ExportSlot>;

/// Id of a schedule action on a registered object.
pub type ScheduleActionRegistrationId = RegistrationId<ActionSlot>;

/// Id of a schedule condition on a registered object.
pub type ScheduleConditionRegistrationId = RegistrationId<ConditionSlot>;

/// Id of a registered group, derived from the group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupRegistrationId(String);

impl GroupRegistrationId {
    /// Creates a group id from the group name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the group name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupRegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
