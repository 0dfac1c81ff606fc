//! backend/src/io/rest/mappers/contact_mapper.rs

use crate::domain::commands::contacts::{ContactListResult, ContactResult};
use crate::domain::models::{format_timestamp, Contact as DomainContact};
use shared::{Contact as SharedContact, ContactCollection, PageMeta};

/// Mapper from domain contacts and results to the wire DTOs.
pub struct ContactMapper;

impl ContactMapper {
    /// Converts a domain Contact to a shared Contact DTO.
    ///
    /// Only stored contacts reach the presenter, so both timestamps are set;
    /// an unsaved contact renders them as empty strings.
    pub fn to_dto(domain: DomainContact) -> SharedContact {
        let created_at = domain.timestamps.created_at();
        let updated_at = domain.timestamps.updated_at();

        SharedContact {
            id: domain.id,
            first_name: domain.first_name,
            last_name: domain.last_name,
            email: domain.email,
            created_at: created_at.map(|at| format_timestamp(&at)).unwrap_or_default(),
            updated_at: updated_at.map(|at| format_timestamp(&at)).unwrap_or_default(),
        }
    }

    pub fn from_result(result: ContactResult) -> SharedContact {
        Self::to_dto(result.contact)
    }

    pub fn to_collection(result: ContactListResult) -> ContactCollection {
        let data: Vec<SharedContact> = result.contacts.into_iter().map(Self::to_dto).collect();

        let meta = PageMeta {
            count: data.len() as u64,
            current_page: result.page.number(),
            per_page: result.page.size(),
            total_pages: result.page.total_pages(result.total_items),
            total_items: result.total_items,
        };

        ContactCollection { data, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::Page;
    use crate::domain::models::Timestamps;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn stored_contact() -> DomainContact {
        let created = Utc.timestamp_opt(1_704_067_200, 5_000_000).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();

        let mut contact = DomainContact::new(
            "Ada".to_string(),
            None,
            "ada@example.com".to_string(),
        );
        contact.id = "c-1".to_string();
        contact.timestamps = Timestamps::recorded(created, updated);
        contact
    }

    #[test]
    fn test_to_dto_emits_exactly_the_wire_fields() {
        let value = serde_json::to_value(ContactMapper::to_dto(stored_contact())).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "c-1",
                "firstName": "Ada",
                "lastName": null,
                "email": "ada@example.com",
                "createdAt": "2024-01-01T00:00:00.005Z",
                "updatedAt": "2024-02-01T09:30:00.000Z"
            })
        );
    }

    #[test]
    fn test_deletion_marker_is_not_exposed() {
        let mut contact = stored_contact();
        contact.mark_deleted(Utc::now());

        let value = serde_json::to_value(ContactMapper::to_dto(contact)).unwrap();
        assert!(value.get("deletedAt").is_none());
    }

    #[test]
    fn test_collection_meta() {
        let collection = ContactMapper::to_collection(ContactListResult {
            contacts: vec![stored_contact()],
            total_items: 21,
            page: Page::new(3, 10),
        });

        assert_eq!(collection.data.len(), 1);
        assert_eq!(
            collection.meta,
            PageMeta {
                count: 1,
                current_page: 3,
                per_page: 10,
                total_pages: 3,
                total_items: 21,
            }
        );
    }
}
