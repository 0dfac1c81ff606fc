//! backend/src/domain/models/contact.rs

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::validation::{field, ErrorCollection};

/// Wire and storage format for every timestamp: UTC, millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Creation and modification times of a stored entity.
///
/// Both are `None` until the entity is saved for the first time. Only the
/// storage save path calls [`Timestamps::touch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamps {
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Timestamps of an entity loaded from storage
    pub fn recorded(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    /// Record a save at `now`. The first call also fixes the creation time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(3);
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    /// `false` for an entity that has never been saved
    pub fn is_recorded(&self) -> bool {
        self.created_at.is_some()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// A contact in the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub timestamps: Timestamps,
    /// Set by a soft delete; deleted contacts are hidden from reads
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// A new, unsaved contact with a fresh identifier
    pub fn new(first_name: String, last_name: Option<String>, email: String) -> Self {
        Self {
            id: Self::generate_id(),
            first_name,
            last_name,
            email,
            timestamps: Timestamps::default(),
            deleted_at: None,
        }
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now.trunc_subsecs(3));
        }
    }

    /// Entity invariants, checked after every mutation.
    pub fn violations(&self) -> ErrorCollection {
        let mut errors = ErrorCollection::new();

        field(&mut errors, "firstName")
            .not_blank(&self.first_name)
            .max_chars(&self.first_name, NAME_MAX_CHARS);

        if let Some(last_name) = &self.last_name {
            field(&mut errors, "lastName").max_chars(last_name, NAME_MAX_CHARS);
        }

        field(&mut errors, "email")
            .not_blank(&self.email)
            .max_chars(&self.email, EMAIL_MAX_CHARS)
            .email(&self.email);

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn contact() -> Contact {
        Contact::new(
            "Ada".to_string(),
            Some("Lovelace".to_string()),
            "ada@example.com".to_string(),
        )
    }

    #[test]
    fn test_new_contact_is_unsaved() {
        let contact = contact();
        assert!(!contact.timestamps.is_recorded());
        assert!(!contact.is_deleted());
        assert!(Uuid::parse_str(&contact.id).is_ok());
    }

    #[test]
    fn test_touch_fixes_created_at_once() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap();

        let mut timestamps = Timestamps::default();
        timestamps.touch(first);
        timestamps.touch(second);

        assert_eq!(timestamps.created_at(), Some(first));
        assert_eq!(timestamps.updated_at(), Some(second));
    }

    #[test]
    fn test_touch_truncates_to_milliseconds() {
        let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let mut timestamps = Timestamps::default();
        timestamps.touch(precise);

        let stored = timestamps.created_at().unwrap();
        assert_eq!(stored.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_format_timestamp_is_fixed_width_utc() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-05T07:08:09.000Z");
    }

    #[test]
    fn test_mark_deleted_keeps_first_deletion_time() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut contact = contact();
        contact.mark_deleted(first);
        contact.mark_deleted(first + chrono::Duration::days(1));
        assert_eq!(contact.deleted_at, Some(first));
    }

    #[test]
    fn test_violations() {
        assert!(contact().violations().is_empty());

        let mut broken = contact();
        broken.first_name = "   ".to_string();
        broken.email = "not-an-email".to_string();

        let errors = broken.violations();
        assert_eq!(errors.field_count(), 2);
        assert!(!errors.messages("firstName").is_empty());
        assert!(!errors.messages("email").is_empty());
    }
}
