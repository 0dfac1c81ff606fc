//! # Contacts Backend
//!
//! HTTP API for managing contacts.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Use cases, entities and the transaction boundary
//! - **Storage**: SQLite persistence and an in-memory store for tests
//! - **IO**: The REST API, including request binding and validation
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum Router)
//!     ↓
//! IO Layer (Validated<I> extractor, handlers, error responses)
//!     ↓
//! Domain Layer (use cases inside a TransactionRunner)
//!     ↓
//! Storage Layer (Connection / Session / ContactStorage)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS, tracing and panic recovery
//! - Keep every layer generic over the storage connection so tests can run
//!   the full stack against memory or an in-memory SQLite database

pub mod config;
pub mod domain;
pub mod io;
pub mod runtime;
pub mod storage;
pub mod validation;

use anyhow::{Context, Result};
use axum::{
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::transaction::TransactionRunner;
use crate::domain::use_cases::{
    CreateContact, DeleteContact, ListContacts, ReadContact, UpdateContact,
};
use crate::io::rest::{self, ApiError};
use crate::runtime::RuntimeContext;
use crate::storage::{Connection, DbConnection};

/// Main application state that holds all use cases
#[derive(Clone)]
pub struct AppState<C: Connection> {
    pub list_contacts: ListContacts<C>,
    pub list_deleted_contacts: ListContacts<C>,
    pub read_contact: ReadContact<C>,
    pub create_contact: CreateContact<C>,
    pub update_contact: UpdateContact<C>,
    pub delete_contact: DeleteContact<C>,
    pub runtime: RuntimeContext,
}

impl<C: Connection> AppState<C> {
    /// Wire every use case to one shared connection
    pub fn new(connection: C, runtime: RuntimeContext) -> Self {
        let runner = TransactionRunner::new(connection);

        Self {
            list_contacts: ListContacts::active(runner.clone()),
            list_deleted_contacts: ListContacts::deleted(runner.clone()),
            read_contact: ReadContact::new(runner.clone()),
            create_contact: CreateContact::new(runner.clone()),
            update_contact: UpdateContact::new(runner.clone()),
            delete_contact: DeleteContact::new(runner),
            runtime,
        }
    }
}

/// Initialize the backend with all required use cases
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState<DbConnection>> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    info!("Setting up application state");
    Ok(AppState::new(db_conn, RuntimeContext::start()))
}

/// Create the Axum router with all routes configured
pub fn create_router<C: Connection>(app_state: AppState<C>, config: &AppConfig) -> Router {
    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/contacts",
            get(rest::list_contacts::<C>).post(rest::create_contact::<C>),
        )
        .route("/contacts/deleted", get(rest::list_deleted_contacts::<C>))
        .route(
            "/contacts/:id",
            get(rest::get_contact::<C>)
                .patch(rest::update_contact::<C>)
                .delete(rest::delete_contact::<C>),
        )
        .route("/status", get(rest::get_status::<C>));

    Router::new()
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(middleware::map_response(rest::render_method_not_allowed))
        .layer(CatchPanicLayer::custom(rest::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn route_not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
