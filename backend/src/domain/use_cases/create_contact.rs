use tracing::{info, warn};

use crate::domain::commands::contacts::{ContactResult, CreateContactCommand};
use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::models::Contact;
use crate::domain::transaction::TransactionRunner;
use crate::storage::{Connection, ContactStorage};

/// Creates a contact. Fails with `Duplicate` when the email is taken.
#[derive(Clone)]
pub struct CreateContact<C: Connection> {
    runner: TransactionRunner<C>,
}

impl<C: Connection> CreateContact<C> {
    pub fn new(runner: TransactionRunner<C>) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, command: CreateContactCommand) -> Result<ContactResult, DomainError> {
        info!("Creating contact with email {}", command.email);

        let result = self
            .runner
            .run(move |session| Box::pin(create(session, command)))
            .await?;

        info!("Created contact {}", result.contact.id);
        Ok(result)
    }
}

async fn create<S: ContactStorage>(
    session: &mut S,
    command: CreateContactCommand,
) -> Result<ContactResult, UnitOfWorkError> {
    if session.by_email(&command.email).await?.is_some() {
        warn!("Contact email already in use: {}", command.email);
        return Err(DomainError::duplicate("contact", "email", command.email).into());
    }

    let mut contact = Contact::new(command.first_name, command.last_name, command.email);
    session.save(&mut contact).await?;

    Ok(ContactResult { contact })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::use_cases::test_utils::{create_command, seed};
    use crate::storage::MemoryConnection;

    #[tokio::test]
    async fn test_create_contact() {
        let connection = MemoryConnection::new();
        let use_case = CreateContact::new(TransactionRunner::new(connection.clone()));

        let result = use_case
            .execute(create_command("Ada", "ada@example.com"))
            .await
            .unwrap();

        assert_eq!(result.contact.first_name, "Ada");
        assert!(result.contact.timestamps.is_recorded());
        assert_eq!(connection.snapshot().await, vec![result.contact]);
        assert_eq!(connection.commits(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_without_writing() {
        let connection = MemoryConnection::new();
        seed(&connection, &[("Ada", "ada@example.com")]).await;
        let before = connection.snapshot().await;

        let use_case = CreateContact::new(TransactionRunner::new(connection.clone()));
        let error = use_case
            .execute(create_command("Imposter", "ada@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::duplicate("contact", "email", "ada@example.com"));
        assert_eq!(connection.snapshot().await, before);
        assert_eq!(connection.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_normalized() {
        let connection = MemoryConnection::new();
        connection.fail_writes(true);

        let use_case = CreateContact::new(TransactionRunner::new(connection.clone()));
        let error = use_case
            .execute(create_command("Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::PersistenceFailure);
        assert!(connection.snapshot().await.is_empty());
    }
}
