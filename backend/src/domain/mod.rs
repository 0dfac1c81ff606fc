//! # Domain Module
//!
//! Contains all business logic for the contacts backend.
//!
//! The domain works on plain command and query structs and knows nothing
//! about HTTP or SQL. Storage is reached only through the session traits of
//! [`crate::storage`], inside a transaction opened by [`transaction`].
//!
//! ## Module Organization
//!
//! - **models**: The `Contact` entity, its timestamps and invariants
//! - **commands**: Queries, commands and results passed to and from use cases
//! - **use_cases**: List, read, create, update and delete
//! - **transaction**: Runs a unit of work atomically
//! - **value_change**: Absent/present wrapper for partial updates
//! - **errors**: The closed set of domain failures
//!
//! ## Business Rules
//!
//! - A contact needs a non-blank first name and a well-formed email
//! - No two live contacts share an email
//! - Deletion is soft: deleted contacts are hidden, not removed
//! - Listings are ordered by creation time, oldest first
//!
//! ## Design Principles
//!
//! - **Storage Agnostic**: Use cases are generic over the connection
//! - **One Transaction per Operation**: Commit on success, roll back on any failure
//! - **Closed Errors**: Every failure maps to exactly one `DomainError` variant

pub mod commands;
pub mod errors;
pub mod models;
pub mod transaction;
pub mod use_cases;
pub mod value_change;
