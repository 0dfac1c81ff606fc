use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use crate::domain::models::{format_timestamp, Contact, Timestamps};
use crate::storage::traits::{ContactFilter, ContactStorage, Session, StorageError, StorageResult};

const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, email, created_at, updated_at, deleted_at";

/// Contact repository bound to one SQLite transaction
pub struct ContactRepository {
    tx: Transaction<'static, Sqlite>,
}

impl ContactRepository {
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    async fn insert(&mut self, contact: &Contact) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, first_name, last_name, email, created_at, updated_at, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contact.id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(contact.timestamps.created_at().as_ref().map(format_timestamp))
        .bind(contact.timestamps.updated_at().as_ref().map(format_timestamp))
        .bind(contact.deleted_at.as_ref().map(format_timestamp))
        .execute(&mut *self.tx)
        .await
        .map_err(|e| write_error(e, contact))?;
        Ok(())
    }

    async fn update(&mut self, contact: &Contact) -> StorageResult<()> {
        sqlx::query(
            r#"
            UPDATE contacts
            SET first_name = ?, last_name = ?, email = ?, updated_at = ?, deleted_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(contact.timestamps.updated_at().as_ref().map(format_timestamp))
        .bind(contact.deleted_at.as_ref().map(format_timestamp))
        .bind(&contact.id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| write_error(e, contact))?;
        Ok(())
    }
}

/// Name the unique key a rejected write collided with.
///
/// SQLite reports the violated columns as `UNIQUE constraint failed: contacts.email`.
fn write_error(error: sqlx::Error, contact: &Contact) -> StorageError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return if db.message().contains("contacts.email") {
                StorageError::UniqueViolation {
                    field: "email",
                    value: contact.email.clone(),
                }
            } else {
                StorageError::UniqueViolation {
                    field: "id",
                    value: contact.id.clone(),
                }
            };
        }
    }
    StorageError::Database(error)
}

fn filter_clause(filter: &ContactFilter) -> &'static str {
    if filter.deleted {
        "deleted_at IS NOT NULL AND (? IS NULL OR id = ?)"
    } else {
        "deleted_at IS NULL AND (? IS NULL OR id = ?)"
    }
}

fn parse_timestamp(id: &str, column: &str, value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt {
            id: id.to_string(),
            reason: format!("{} is not a timestamp: {}", column, e),
        })
}

fn contact_from_row(row: &SqliteRow) -> StorageResult<Contact> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let deleted_at: Option<String> = row.try_get("deleted_at")?;

    let timestamps = Timestamps::recorded(
        parse_timestamp(&id, "created_at", &created_at)?,
        parse_timestamp(&id, "updated_at", &updated_at)?,
    );
    let deleted_at = deleted_at
        .map(|value| parse_timestamp(&id, "deleted_at", &value))
        .transpose()?;

    Ok(Contact {
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        id,
        timestamps,
        deleted_at,
    })
}

#[async_trait]
impl ContactStorage for ContactRepository {
    async fn by_id(&mut self, id: &str) -> StorageResult<Option<Contact>> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE id = ? AND deleted_at IS NULL",
            CONTACT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    async fn by_email(&mut self, email: &str) -> StorageResult<Option<Contact>> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE email = ? AND deleted_at IS NULL",
            CONTACT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    async fn save(&mut self, contact: &mut Contact) -> StorageResult<()> {
        let is_new = !contact.timestamps.is_recorded();
        contact.timestamps.touch(Utc::now());

        if is_new {
            self.insert(contact).await
        } else {
            self.update(contact).await
        }
    }

    async fn page(
        &mut self,
        filter: &ContactFilter,
        offset: u64,
        limit: u32,
    ) -> StorageResult<Vec<Contact>> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE {} ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            CONTACT_COLUMNS,
            filter_clause(filter)
        );
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let rows = sqlx::query(&sql)
            .bind(&filter.id)
            .bind(&filter.id)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(contact_from_row).collect()
    }

    async fn count(&mut self, filter: &ContactFilter) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM contacts WHERE {}", filter_clause(filter));
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(&filter.id)
            .bind(&filter.id)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[async_trait]
impl Session for ContactRepository {
    async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> StorageResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::DbConnection;
    use crate::storage::traits::Connection;

    fn contact(first_name: &str, email: &str) -> Contact {
        Contact::new(first_name.to_string(), None, email.to_string())
    }

    async fn seeded(db: &DbConnection, contacts: &mut [Contact]) {
        let mut session = db.begin().await.unwrap();
        for contact in contacts.iter_mut() {
            session.save(contact).await.unwrap();
        }
        session.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut ada = contact("Ada", "ada@example.com");
        ada.last_name = Some("Lovelace".to_string());
        seeded(&db, std::slice::from_mut(&mut ada)).await;

        let mut session = db.begin().await.unwrap();
        let by_id = session.by_id(&ada.id).await.unwrap().unwrap();
        let by_email = session.by_email("ada@example.com").await.unwrap().unwrap();
        session.rollback().await.unwrap();

        assert_eq!(by_id, ada);
        assert_eq!(by_email, ada);
        assert!(by_id.timestamps.is_recorded());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut ada = contact("Ada", "ada@example.com");
        seeded(&db, std::slice::from_mut(&mut ada)).await;
        let created_at = ada.timestamps.created_at();

        let mut session = db.begin().await.unwrap();
        let mut loaded = session.by_id(&ada.id).await.unwrap().unwrap();
        loaded.first_name = "Augusta".to_string();
        session.save(&mut loaded).await.unwrap();
        session.commit().await.unwrap();

        let mut session = db.begin().await.unwrap();
        let reloaded = session.by_id(&ada.id).await.unwrap().unwrap();
        session.rollback().await.unwrap();

        assert_eq!(reloaded.first_name, "Augusta");
        assert_eq!(reloaded.timestamps.created_at(), created_at);
        assert!(reloaded.timestamps.updated_at() >= created_at);
    }

    #[tokio::test]
    async fn test_soft_deleted_contacts_are_hidden() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut ada = contact("Ada", "ada@example.com");
        ada.mark_deleted(Utc::now());
        seeded(&db, std::slice::from_mut(&mut ada)).await;

        let mut session = db.begin().await.unwrap();
        assert!(session.by_id(&ada.id).await.unwrap().is_none());
        assert!(session.by_email("ada@example.com").await.unwrap().is_none());

        let deleted = ContactFilter {
            id: None,
            deleted: true,
        };
        assert_eq!(session.count(&ContactFilter::default()).await.unwrap(), 0);
        assert_eq!(session.count(&deleted).await.unwrap(), 1);
        session.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_page_filters_and_slices() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut contacts: Vec<Contact> = (0..5)
            .map(|i| contact(&format!("Person {}", i), &format!("p{}@example.com", i)))
            .collect();
        seeded(&db, &mut contacts).await;

        let mut session = db.begin().await.unwrap();
        let all = ContactFilter::default();
        let first = session.page(&all, 0, 2).await.unwrap();
        let last = session.page(&all, 4, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(last.len(), 1);

        let only = ContactFilter {
            id: Some(contacts[3].id.clone()),
            deleted: false,
        };
        let filtered = session.page(&only, 0, 10).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, contacts[3].id);
        assert_eq!(session.count(&only).await.unwrap(), 1);
        session.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let db = DbConnection::in_memory().await.unwrap();

        let mut session = db.begin().await.unwrap();
        let mut ada = contact("Ada", "ada@example.com");
        session.save(&mut ada).await.unwrap();
        session.rollback().await.unwrap();

        let mut session = db.begin().await.unwrap();
        assert!(session.by_id(&ada.id).await.unwrap().is_none());
        session.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_live_email_must_be_unique() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut ada = contact("Ada", "ada@example.com");
        seeded(&db, std::slice::from_mut(&mut ada)).await;

        let mut session = db.begin().await.unwrap();
        let mut copy = contact("Copy", "ada@example.com");
        let result = session.save(&mut copy).await;
        match result {
            Err(StorageError::UniqueViolation { field, value }) => {
                assert_eq!(field, "email");
                assert_eq!(value, "ada@example.com");
            }
            other => panic!("expected a unique violation, got {:?}", other),
        }
        session.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_onto_taken_email_is_a_unique_violation() {
        let db = DbConnection::in_memory().await.unwrap();
        let mut contacts = vec![
            contact("Ada", "ada@example.com"),
            contact("Bob", "bob@example.com"),
        ];
        seeded(&db, &mut contacts).await;

        let mut session = db.begin().await.unwrap();
        let mut bob = session.by_id(&contacts[1].id).await.unwrap().unwrap();
        bob.email = "ada@example.com".to_string();
        let result = session.save(&mut bob).await;
        assert!(matches!(
            result,
            Err(StorageError::UniqueViolation { field: "email", .. })
        ));
        session.rollback().await.unwrap();
    }
}
