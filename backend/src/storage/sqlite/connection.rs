use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::info;

use super::contact_repository::ContactRepository;
use crate::storage::traits::{Connection, StorageResult};

/// DbConnection owns the SQLite pool and opens transactional sessions on it
#[derive(Clone)]
pub struct DbConnection {
    pool: SqlitePool,
}

impl DbConnection {
    /// Connect to the database at `url`, creating it and its schema if needed
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        let exists = Sqlite::database_exists(url)
            .await
            .with_context(|| format!("failed to check whether database {} exists", url))?;
        if !exists {
            info!("Creating database at {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("failed to connect to {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// A private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// an in-memory database lives only as long as its connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open in-memory database")?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT,
                email TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Email is unique among live contacts only; a soft-deleted contact
        // releases its address
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_email_live
            ON contacts(email) WHERE deleted_at IS NULL;
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for ordering by created_at (for pagination)
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_contacts_created_at
            ON contacts(created_at, id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Connection for DbConnection {
    type Session = ContactRepository;

    async fn begin(&self) -> StorageResult<ContactRepository> {
        let tx = self.pool.begin().await?;
        Ok(ContactRepository::new(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Contact;
    use crate::storage::traits::{ContactFilter, ContactStorage, Session};

    #[tokio::test]
    async fn test_file_database_is_created_with_schema() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("contacts.db").display());

        let db = DbConnection::new(&url).await.unwrap();
        let mut session = db.begin().await.unwrap();
        let mut contact = Contact::new("Ada".to_string(), None, "ada@example.com".to_string());
        session.save(&mut contact).await.unwrap();
        session.commit().await.unwrap();

        // Reconnecting must keep the data and tolerate the existing schema
        let reopened = DbConnection::new(&url).await.unwrap();
        let mut session = reopened.begin().await.unwrap();
        assert_eq!(session.count(&ContactFilter::default()).await.unwrap(), 1);
        session.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_url_reports_the_existence_check() {
        let error = DbConnection::new("sqlite:contacts.db?no_such_option=1")
            .await
            .err()
            .unwrap();

        assert!(format!("{:#}", error).contains("failed to check whether database"));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = DbConnection::in_memory().await.unwrap();
        let second = DbConnection::in_memory().await.unwrap();

        let mut session = first.begin().await.unwrap();
        let mut contact = Contact::new("Ada".to_string(), None, "ada@example.com".to_string());
        session.save(&mut contact).await.unwrap();
        session.commit().await.unwrap();

        let mut session = second.begin().await.unwrap();
        assert_eq!(session.count(&ContactFilter::default()).await.unwrap(), 0);
        session.rollback().await.unwrap();
    }
}
