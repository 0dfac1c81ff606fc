//! # REST API for Contact Management
//!
//! Endpoints for listing, creating, retrieving, updating, and deleting
//! contacts. Every handler receives an already validated query or command
//! through [`Validated`]; failures are rendered by [`ApiError`].

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::errors::ApiError;
use super::inputs::{
    CreateContactInput, DeleteContactInput, ListContactsInput, ListDeletedContactsInput,
    ReadContactInput, UpdateContactInput,
};
use super::mappers::ContactMapper;
use super::validated::Validated;
use crate::storage::Connection;
use crate::AppState;
use shared::{Contact, ContactCollection};

/// List active contacts
pub async fn list_contacts<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(query): Validated<ListContactsInput>,
) -> Result<Json<ContactCollection>, ApiError> {
    info!(
        "GET /api/contacts - page {} size {}",
        query.page.number(),
        query.page.size()
    );

    let result = state.list_contacts.execute(query).await?;
    Ok(Json(ContactMapper::to_collection(result)))
}

/// List soft-deleted contacts
pub async fn list_deleted_contacts<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(query): Validated<ListDeletedContactsInput>,
) -> Result<Json<ContactCollection>, ApiError> {
    info!(
        "GET /api/contacts/deleted - page {} size {}",
        query.page.number(),
        query.page.size()
    );

    let result = state.list_deleted_contacts.execute(query).await?;
    Ok(Json(ContactMapper::to_collection(result)))
}

/// Create a new contact
pub async fn create_contact<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(command): Validated<CreateContactInput>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    info!("POST /api/contacts - email: {}", command.email);

    let result = state.create_contact.execute(command).await?;
    Ok((StatusCode::CREATED, Json(ContactMapper::from_result(result))))
}

/// Get a contact by ID
pub async fn get_contact<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(query): Validated<ReadContactInput>,
) -> Result<Json<Contact>, ApiError> {
    info!("GET /api/contacts/{}", query.id);

    let result = state.read_contact.execute(query).await?;
    Ok(Json(ContactMapper::from_result(result)))
}

/// Partially update a contact
pub async fn update_contact<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(command): Validated<UpdateContactInput>,
) -> Result<Json<Contact>, ApiError> {
    info!("PATCH /api/contacts/{}", command.id);

    let result = state.update_contact.execute(command).await?;
    Ok(Json(ContactMapper::from_result(result)))
}

/// Soft-delete a contact
pub async fn delete_contact<C: Connection>(
    State(state): State<AppState<C>>,
    Validated(command): Validated<DeleteContactInput>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/contacts/{}", command.id);

    state.delete_contact.execute(command).await?;
    Ok(StatusCode::NO_CONTENT)
}
