//! Transaction boundary for use cases.

use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::storage::{Connection, Session, StorageError};

/// Future returned by a unit of work borrowing the session for `'s`
pub type UnitOfWork<'s, T> = BoxFuture<'s, Result<T, UnitOfWorkError>>;

/// Runs units of work atomically against a storage connection.
///
/// The work closure receives only the session, never the runner, so a unit
/// of work cannot open a nested transaction through it.
#[derive(Clone)]
pub struct TransactionRunner<C: Connection> {
    connection: C,
}

impl<C: Connection> TransactionRunner<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Begin a transaction, run `work` and commit if it succeeds.
    ///
    /// On failure the transaction is rolled back first. Domain errors are
    /// returned unchanged. A unique key collision reported by storage becomes
    /// [`DomainError::Duplicate`]; any other storage error is logged and
    /// replaced by [`DomainError::PersistenceFailure`].
    pub async fn run<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut C::Session) -> UnitOfWork<'s, T> + Send,
    {
        let mut session = self
            .connection
            .begin()
            .await
            .map_err(|e| persistence_failure("begin", e))?;

        let outcome = work(&mut session).await;

        match outcome {
            Ok(value) => {
                session
                    .commit()
                    .await
                    .map_err(|e| storage_failure("commit", e))?;
                debug!("Unit of work committed");
                Ok(value)
            }
            Err(failure) => {
                if let Err(rollback_error) = session.rollback().await {
                    error!("Rollback failed: {}", rollback_error);
                }

                match failure {
                    UnitOfWorkError::Domain(domain_error) => {
                        debug!("Unit of work rolled back: {}", domain_error);
                        Err(domain_error)
                    }
                    UnitOfWorkError::Storage(storage_error) => {
                        Err(storage_failure("unit of work", storage_error))
                    }
                }
            }
        }
    }
}

fn persistence_failure(stage: &str, cause: StorageError) -> DomainError {
    error!("Storage failure during {}: {}", stage, cause);
    DomainError::PersistenceFailure
}

fn storage_failure(stage: &str, cause: StorageError) -> DomainError {
    match cause {
        StorageError::UniqueViolation { field, value } => {
            warn!("Unique key collision during {}: {} '{}'", stage, field, value);
            DomainError::duplicate("contact", field, value)
        }
        other => persistence_failure(stage, other),
    }
}
