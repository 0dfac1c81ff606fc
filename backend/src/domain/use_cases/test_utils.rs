//! Helpers shared by the use case tests.

use chrono::{Duration, TimeZone, Utc};

use crate::domain::commands::contacts::CreateContactCommand;
use crate::domain::models::{Contact, Timestamps};
use crate::storage::{Connection, ContactStorage, MemoryConnection, Session};

pub fn create_command(first_name: &str, email: &str) -> CreateContactCommand {
    CreateContactCommand {
        first_name: first_name.to_string(),
        last_name: None,
        email: email.to_string(),
    }
}

/// Store one committed contact per `(first_name, email)` pair, with creation
/// times one minute apart in the given order.
pub async fn seed(connection: &MemoryConnection, people: &[(&str, &str)]) -> Vec<Contact> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let mut session = connection.begin().await.unwrap();
    let mut seeded = Vec::new();

    for (minute, (first_name, email)) in people.iter().enumerate() {
        let created = base + Duration::minutes(minute as i64);
        let mut contact = Contact::new(first_name.to_string(), None, email.to_string());
        contact.timestamps = Timestamps::recorded(created, created);
        session.save(&mut contact).await.unwrap();
        seeded.push(contact);
    }

    session.commit().await.unwrap();
    seeded
}
