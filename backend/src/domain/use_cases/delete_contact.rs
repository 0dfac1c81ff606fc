use chrono::Utc;
use tracing::info;

use crate::domain::commands::contacts::DeleteContactCommand;
use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::transaction::TransactionRunner;
use crate::storage::{Connection, ContactStorage};

/// Soft-deletes a live contact. The row stays in storage with `deleted_at`
/// set and disappears from reads, updates and the active listing.
#[derive(Clone)]
pub struct DeleteContact<C: Connection> {
    runner: TransactionRunner<C>,
}

impl<C: Connection> DeleteContact<C> {
    pub fn new(runner: TransactionRunner<C>) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, command: DeleteContactCommand) -> Result<(), DomainError> {
        info!("Deleting contact {}", command.id);
        self.runner
            .run(move |session| Box::pin(delete(session, command)))
            .await
    }
}

async fn delete<S: ContactStorage>(
    session: &mut S,
    command: DeleteContactCommand,
) -> Result<(), UnitOfWorkError> {
    let mut contact = session.by_id_or_fail(&command.id).await?;
    contact.mark_deleted(Utc::now());
    session.save(&mut contact).await?;
    Ok(())
}
