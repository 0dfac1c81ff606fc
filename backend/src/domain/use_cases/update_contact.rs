use tracing::{info, warn};

use crate::domain::commands::contacts::{ContactResult, UpdateContactCommand};
use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::transaction::TransactionRunner;
use crate::storage::{Connection, ContactStorage};

/// Applies a partial update to a live contact.
///
/// Only fields present in the command are written. A new email must not be
/// held by another live contact, and the result must still satisfy the
/// entity invariants.
#[derive(Clone)]
pub struct UpdateContact<C: Connection> {
    runner: TransactionRunner<C>,
}

impl<C: Connection> UpdateContact<C> {
    pub fn new(runner: TransactionRunner<C>) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, command: UpdateContactCommand) -> Result<ContactResult, DomainError> {
        info!("Updating contact {}", command.id);
        self.runner
            .run(move |session| Box::pin(update(session, command)))
            .await
    }
}

async fn update<S: ContactStorage>(
    session: &mut S,
    command: UpdateContactCommand,
) -> Result<ContactResult, UnitOfWorkError> {
    let mut contact = session.by_id_or_fail(&command.id).await?;

    if let Some(email) = command.email.as_present() {
        if *email != contact.email {
            if let Some(holder) = session.by_email(email).await? {
                if holder.id != contact.id {
                    warn!("Contact email already in use: {}", email);
                    return Err(DomainError::duplicate("contact", "email", email.clone()).into());
                }
            }
        }
    }

    command.first_name.apply_to(&mut contact.first_name);
    command.last_name.apply_to(&mut contact.last_name);
    command.email.apply_to(&mut contact.email);

    let errors = contact.violations();
    if !errors.is_empty() {
        return Err(DomainError::Invalid {
            resource: "contact",
            errors,
        }
        .into());
    }

    session.save(&mut contact).await?;
    Ok(ContactResult { contact })
}
