use tracing::info;

use crate::domain::commands::contacts::{ContactResult, ReadContactQuery};
use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::transaction::TransactionRunner;
use crate::storage::{Connection, ContactStorage};

#[derive(Clone)]
pub struct ReadContact<C: Connection> {
    runner: TransactionRunner<C>,
}

impl<C: Connection> ReadContact<C> {
    pub fn new(runner: TransactionRunner<C>) -> Self {
        Self { runner }
    }

    pub async fn execute(&self, query: ReadContactQuery) -> Result<ContactResult, DomainError> {
        info!("Reading contact {}", query.id);
        self.runner
            .run(move |session| Box::pin(read(session, query)))
            .await
    }
}

async fn read<S: ContactStorage>(
    session: &mut S,
    query: ReadContactQuery,
) -> Result<ContactResult, UnitOfWorkError> {
    let contact = session.by_id_or_fail(&query.id).await?;
    Ok(ContactResult { contact })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::use_cases::test_utils::seed;
    use crate::storage::MemoryConnection;

    #[tokio::test]
    async fn test_read_existing_contact() {
        let connection = MemoryConnection::new();
        let seeded = seed(&connection, &[("Ada", "ada@example.com")]).await;

        let use_case = ReadContact::new(TransactionRunner::new(connection));
        let result = use_case
            .execute(ReadContactQuery {
                id: seeded[0].id.clone(),
            })
            .await
            .unwrap();

        assert_eq!(result.contact, seeded[0]);
    }

    #[tokio::test]
    async fn test_read_unknown_contact() {
        let use_case = ReadContact::new(TransactionRunner::new(MemoryConnection::new()));
        let error = use_case
            .execute(ReadContactQuery {
                id: "missing".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::not_found("contact", "missing"));
    }
}
