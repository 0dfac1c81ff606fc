pub mod contact;

pub use contact::{format_timestamp, Contact, Timestamps, TIMESTAMP_FORMAT};
