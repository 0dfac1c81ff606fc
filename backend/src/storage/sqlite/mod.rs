//! # SQLite Storage Module
//!
//! Production storage backend. Every session wraps one SQLite transaction,
//! so a unit of work either commits all of its writes or none of them.
//!
//! ## Components
//!
//! - **connection.rs** - pool management and schema setup
//! - **contact_repository.rs** - contact repository over a single transaction

pub mod connection;
pub mod contact_repository;

pub use connection::DbConnection;
pub use contact_repository::ContactRepository;
