//! # Storage Module
//!
//! Handles all data persistence for the contacts backend.
//!
//! The domain layer only sees the traits in [`traits`]; the concrete
//! backends can be swapped without touching use cases or the HTTP layer.
//!
//! ## Backends
//!
//! - **sqlite**: SQLite through SQLx, one database transaction per session
//! - **memory**: in-process store used by tests and local experiments
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Clean separation between domain and data access
//! - **Explicit Sessions**: Every read and write happens inside a session
//!   opened by the transaction runner
//! - **Backend-neutral Errors**: Callers above the runner never see
//!   [`StorageError`]

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryConnection;
pub use sqlite::DbConnection;
pub use traits::{
    Connection, ContactFilter, ContactStorage, Session, StorageError, StorageResult,
};
