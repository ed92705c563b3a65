//! Validation errors raised while constructing definitions.

use thiserror::Error;

/// Errors arising from invalid part or contract definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// An import or export was declared without a contract name.
    #[error("contract on '{declaring_type}' has an empty contract name")]
    EmptyContractName {
        /// Type that declared the contract.
        declaring_type: String,
    },

    /// Two members of one kind on a part share a contract name.
    #[error("contract '{contract_name}' is declared more than once on '{part}'")]
    DuplicateRegistration {
        /// Type of the part declaring the members.
        part: String,
        /// The repeated contract name, as given by the later member.
        contract_name: String,
    },
}

impl DefinitionError {
    /// Creates a new `EmptyContractName` error.
    #[must_use]
    pub fn empty_contract_name(declaring_type: impl ToString) -> Self {
        Self::EmptyContractName {
            declaring_type: declaring_type.to_string(),
        }
    }

    /// Creates a new `DuplicateRegistration` error.
    #[must_use]
    pub fn duplicate_registration(part: impl ToString, contract_name: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            part: part.to_string(),
            contract_name: contract_name.into(),
        }
    }
}
