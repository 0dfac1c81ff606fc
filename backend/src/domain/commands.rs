// backend/src/domain/commands.rs

//! Domain-level command and query types
//! These structs are used by the use cases inside the domain layer and are
//! **not** exposed over the public API. The REST layer builds them from
//! validated input and maps the results to the DTOs of the `shared` crate.

/// A validated page request. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Clamps zero to one so a `Page` is never empty.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of items skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(u64::from(self.size))
    }
}

pub mod contacts {
    use super::Page;
    use crate::domain::models::Contact;
    use crate::domain::value_change::ValueChange;

    /// Query parameters for listing contacts.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ListContactsQuery {
        /// Restrict the listing to a single contact
        pub resource_id: Option<String>,
        pub page: Page,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ReadContactQuery {
        pub id: String,
    }

    /// Input for creating a new contact.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CreateContactCommand {
        pub first_name: String,
        pub last_name: Option<String>,
        pub email: String,
    }

    /// Partial update. Only `Present` fields are written.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UpdateContactCommand {
        pub id: String,
        pub first_name: ValueChange<String>,
        pub last_name: ValueChange<Option<String>>,
        pub email: ValueChange<String>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DeleteContactCommand {
        pub id: String,
    }

    /// Result of any use case that produces a single contact.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ContactResult {
        pub contact: Contact,
    }

    /// Result of listing contacts.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ContactListResult {
        pub contacts: Vec<Contact>,
        pub total_items: u64,
        pub page: Page,
    }
}
