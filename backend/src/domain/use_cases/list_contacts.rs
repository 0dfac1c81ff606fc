use tracing::info;

use crate::domain::commands::contacts::{ContactListResult, ListContactsQuery};
use crate::domain::commands::Page;
use crate::domain::errors::{DomainError, UnitOfWorkError};
use crate::domain::transaction::TransactionRunner;
use crate::storage::{Connection, ContactFilter, ContactStorage};

/// Lists one page of contacts, ordered by creation time.
///
/// The same use case serves the active listing and the listing of
/// soft-deleted contacts; `deleted` picks which side it reads.
#[derive(Clone)]
pub struct ListContacts<C: Connection> {
    runner: TransactionRunner<C>,
    deleted: bool,
}

impl<C: Connection> ListContacts<C> {
    pub fn active(runner: TransactionRunner<C>) -> Self {
        Self {
            runner,
            deleted: false,
        }
    }

    pub fn deleted(runner: TransactionRunner<C>) -> Self {
        Self {
            runner,
            deleted: true,
        }
    }

    pub async fn execute(&self, query: ListContactsQuery) -> Result<ContactListResult, DomainError> {
        info!(
            "Listing {} contacts: page {} of size {}",
            if self.deleted { "deleted" } else { "active" },
            query.page.number(),
            query.page.size()
        );

        let filter = ContactFilter {
            id: query.resource_id,
            deleted: self.deleted,
        };
        let page = query.page;

        self.runner
            .run(move |session| Box::pin(list(session, filter, page)))
            .await
    }
}

async fn list<S: ContactStorage>(
    session: &mut S,
    filter: ContactFilter,
    page: Page,
) -> Result<ContactListResult, UnitOfWorkError> {
    let total_items = session.count(&filter).await?;
    let contacts = session.page(&filter, page.offset(), page.size()).await?;

    Ok(ContactListResult {
        contacts,
        total_items,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::use_cases::test_utils::seed;
    use crate::storage::{MemoryConnection, Session};
    use chrono::Utc;

    fn query(number: u32, size: u32) -> ListContactsQuery {
        ListContactsQuery {
            resource_id: None,
            page: Page::new(number, size),
        }
    }

    #[tokio::test]
    async fn test_pages_follow_creation_order() {
        let connection = MemoryConnection::new();
        let seeded = seed(
            &connection,
            &[
                ("Ada", "ada@example.com"),
                ("Bob", "bob@example.com"),
                ("Cy", "cy@example.com"),
            ],
        )
        .await;

        let use_case = ListContacts::active(TransactionRunner::new(connection));

        let first = use_case.execute(query(1, 2)).await.unwrap();
        assert_eq!(first.total_items, 3);
        assert_eq!(first.contacts, seeded[..2].to_vec());

        let second = use_case.execute(query(2, 2)).await.unwrap();
        assert_eq!(second.contacts, seeded[2..].to_vec());

        let beyond = use_case.execute(query(5, 2)).await.unwrap();
        assert!(beyond.contacts.is_empty());
        assert_eq!(beyond.total_items, 3);
    }

    #[tokio::test]
    async fn test_resource_id_restricts_listing() {
        let connection = MemoryConnection::new();
        let seeded = seed(
            &connection,
            &[("Ada", "ada@example.com"), ("Bob", "bob@example.com")],
        )
        .await;

        let use_case = ListContacts::active(TransactionRunner::new(connection));
        let result = use_case
            .execute(ListContactsQuery {
                resource_id: Some(seeded[1].id.clone()),
                page: Page::new(1, 20),
            })
            .await
            .unwrap();

        assert_eq!(result.total_items, 1);
        assert_eq!(result.contacts, vec![seeded[1].clone()]);
    }

    #[tokio::test]
    async fn test_deleted_and_active_listings_are_disjoint() {
        let connection = MemoryConnection::new();
        let mut seeded = seed(
            &connection,
            &[("Ada", "ada@example.com"), ("Bob", "bob@example.com")],
        )
        .await;

        let mut session = connection.begin().await.unwrap();
        seeded[0].mark_deleted(Utc::now());
        session.save(&mut seeded[0]).await.unwrap();
        session.commit().await.unwrap();

        let runner = TransactionRunner::new(connection);
        let active = ListContacts::active(runner.clone())
            .execute(query(1, 20))
            .await
            .unwrap();
        let deleted = ListContacts::deleted(runner)
            .execute(query(1, 20))
            .await
            .unwrap();

        assert_eq!(active.contacts.len(), 1);
        assert_eq!(active.contacts[0].id, seeded[1].id);
        assert_eq!(deleted.contacts.len(), 1);
        assert_eq!(deleted.contacts[0].id, seeded[0].id);
    }
}
