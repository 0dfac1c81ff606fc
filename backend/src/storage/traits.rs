//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! A [`Connection`] opens a [`Session`]: one storage transaction exposing the
//! contact repository. The transaction runner is the only caller of
//! `begin`, `commit` and `rollback`.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::models::Contact;

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write collided with a unique key held by another record
    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: &'static str, value: String },

    #[error("stored record {id} is unreadable: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Which contacts a listing covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    /// Restrict the listing to this identifier
    pub id: Option<String>,
    /// List soft-deleted contacts instead of live ones
    pub deleted: bool,
}

/// Repository operations on contacts within one session.
///
/// Soft-deleted contacts are invisible to `by_id` and `by_email`.
#[async_trait]
pub trait ContactStorage: Send {
    async fn by_id(&mut self, id: &str) -> StorageResult<Option<Contact>>;

    /// Like [`ContactStorage::by_id`], failing with `NotFound` instead of `None`.
    async fn by_id_or_fail(&mut self, id: &str) -> Result<Contact, UnitOfWorkError> {
        match self.by_id(id).await? {
            Some(contact) => Ok(contact),
            None => Err(DomainError::not_found("contact", id).into()),
        }
    }

    async fn by_email(&mut self, email: &str) -> StorageResult<Option<Contact>>;

    /// Insert or update. Stamps the contact's timestamps before writing.
    async fn save(&mut self, contact: &mut Contact) -> StorageResult<()>;

    /// One page of contacts ordered by creation time, then id
    async fn page(
        &mut self,
        filter: &ContactFilter,
        offset: u64,
        limit: u32,
    ) -> StorageResult<Vec<Contact>>;

    async fn count(&mut self, filter: &ContactFilter) -> StorageResult<u64>;
}

/// A storage transaction. Dropping a session without committing discards
/// its writes.
#[async_trait]
pub trait Session: ContactStorage + Sized {
    async fn commit(self) -> StorageResult<()>;

    async fn rollback(self) -> StorageResult<()>;
}

/// Trait defining how sessions are opened on a storage backend
#[async_trait]
pub trait Connection: Send + Sync + Clone + 'static {
    /// The session type this connection opens
    type Session: Session + 'static;

    /// Begin a new storage transaction
    async fn begin(&self) -> StorageResult<Self::Session>;
}
