//! In-process storage backend.
//!
//! A session works on a private copy of the store taken at `begin` and
//! swaps it in on `commit`. Sessions are not isolated from each other:
//! the last commit wins. Counters and the write-failure switch make the
//! transaction boundary observable from tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::models::Contact;
use crate::storage::traits::{
    Connection, ContactFilter, ContactStorage, Session, StorageError, StorageResult,
};

#[derive(Default)]
struct MemoryStore {
    contacts: Mutex<Vec<Contact>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_writes: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryConnection {
    store: Arc<MemoryStore>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed contacts, soft-deleted ones included
    pub async fn snapshot(&self) -> Vec<Contact> {
        self.store.contacts.lock().await.clone()
    }

    pub fn commits(&self) -> usize {
        self.store.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.store.rollbacks.load(Ordering::SeqCst)
    }

    /// Make every subsequent `save` fail with [`StorageError::Unavailable`]
    pub fn fail_writes(&self, fail: bool) {
        self.store.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    type Session = MemorySession;

    async fn begin(&self) -> StorageResult<MemorySession> {
        let working = self.store.contacts.lock().await.clone();
        Ok(MemorySession {
            store: Arc::clone(&self.store),
            working,
        })
    }
}

pub struct MemorySession {
    store: Arc<MemoryStore>,
    working: Vec<Contact>,
}

impl MemorySession {
    fn matching<'a>(&'a self, filter: &'a ContactFilter) -> impl Iterator<Item = &'a Contact> + 'a {
        self.working.iter().filter(move |contact| {
            contact.is_deleted() == filter.deleted
                && filter.id.as_ref().map_or(true, |id| *id == contact.id)
        })
    }
}

#[async_trait]
impl ContactStorage for MemorySession {
    async fn by_id(&mut self, id: &str) -> StorageResult<Option<Contact>> {
        Ok(self
            .working
            .iter()
            .find(|contact| contact.id == id && !contact.is_deleted())
            .cloned())
    }

    async fn by_email(&mut self, email: &str) -> StorageResult<Option<Contact>> {
        Ok(self
            .working
            .iter()
            .find(|contact| contact.email == email && !contact.is_deleted())
            .cloned())
    }

    async fn save(&mut self, contact: &mut Contact) -> StorageResult<()> {
        if self.store.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes are disabled".to_string()));
        }

        contact.timestamps.touch(Utc::now());
        match self.working.iter_mut().find(|stored| stored.id == contact.id) {
            Some(stored) => *stored = contact.clone(),
            None => self.working.push(contact.clone()),
        }
        Ok(())
    }

    async fn page(
        &mut self,
        filter: &ContactFilter,
        offset: u64,
        limit: u32,
    ) -> StorageResult<Vec<Contact>> {
        let mut matching: Vec<Contact> = self.matching(filter).cloned().collect();
        matching.sort_by(|a, b| {
            a.timestamps
                .created_at()
                .cmp(&b.timestamps.created_at())
                .then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect())
    }

    async fn count(&mut self, filter: &ContactFilter) -> StorageResult<u64> {
        Ok(self.matching(filter).count() as u64)
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn commit(self) -> StorageResult<()> {
        *self.store.contacts.lock().await = self.working;
        self.store.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self) -> StorageResult<()> {
        self.store.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
