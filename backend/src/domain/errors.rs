//! Closed error vocabulary of the use cases.

use crate::storage::StorageError;
use crate::validation::ErrorCollection;

/// Outcome of a failed use case. Storage-specific errors never appear here;
/// the transaction runner folds them into [`DomainError::PersistenceFailure`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} with {field} '{value}' already exists")]
    Duplicate {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{resource} is invalid: {errors}")]
    Invalid {
        resource: &'static str,
        errors: ErrorCollection,
    },

    #[error("the operation could not be completed by the storage backend")]
    PersistenceFailure,
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn duplicate(resource: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        DomainError::Duplicate {
            resource,
            field,
            value: value.into(),
        }
    }
}

/// Error type of a unit of work: either a domain outcome that must reach the
/// caller unchanged, or a raw storage failure still to be normalized.
#[derive(Debug, thiserror::Error)]
pub enum UnitOfWorkError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
