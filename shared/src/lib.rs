use serde::{Deserialize, Serialize};

/// A contact as it appears on the wire.
///
/// Timestamps are UTC in the fixed `YYYY-MM-DDTHH:MM:SS.mmmZ` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Pagination metadata attached to every collection response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Number of items in this page
    pub count: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactCollection {
    pub data: Vec<Contact>,
    pub meta: PageMeta,
}

/// Body of every failed request: `{ "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// A single error entry.
///
/// `status` is the HTTP status code rendered as a string, e.g. `"422"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub status: String,
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

/// Points at the part of the request an error refers to.
///
/// Body attributes use `pointer` (`/firstName`), query parameters use
/// `parameter` (`page[size]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorSource {
    Pointer(String),
    Parameter(String),
}

/// Response of `GET /api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub version: String,
}
