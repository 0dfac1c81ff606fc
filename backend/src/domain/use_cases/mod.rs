//! # Use Cases
//!
//! One struct per operation exposed by the contacts API. Each use case owns
//! a [`TransactionRunner`](crate::domain::transaction::TransactionRunner)
//! and runs its whole body as a single unit of work.
//!
//! ## Key Responsibilities
//!
//! - **Listing**: Paged listings of active or soft-deleted contacts
//! - **Reading**: Loading a single live contact
//! - **Writing**: Create, partial update and soft delete
//! - **Conflict Detection**: Email uniqueness among live contacts
//!
//! Use cases never see HTTP types or storage errors; they take commands and
//! queries and return results or a [`DomainError`](crate::domain::errors::DomainError).

pub mod create_contact;
pub mod delete_contact;
pub mod list_contacts;
pub mod read_contact;
pub mod update_contact;

#[cfg(test)]
pub(crate) mod test_utils;

pub use create_contact::CreateContact;
pub use delete_contact::DeleteContact;
pub use list_contacts::ListContacts;
pub use read_contact::ReadContact;
pub use update_contact::UpdateContact;
