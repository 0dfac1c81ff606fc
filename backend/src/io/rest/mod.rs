//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the contacts backend.
//! This layer handles:
//! - Binding path, query and body into typed input
//! - Declared validation of that input before any use case runs
//! - Mapping domain results to the wire DTOs of the `shared` crate
//! - Error translation from domain to HTTP status codes
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: RESTful HTTP interfaces for all contact operations
//! - **Error Handling**: Every failure ends in an `{"errors": [...]}` document
//! - **Request Logging**: One `info!` line per handled request
//!
//! ## Design Principles
//!
//! - **Domain Separation**: Pure translation layer without business logic
//! - **Fail Early**: Structural and validation errors never reach a use case

pub mod binding;
pub mod contact_apis;
pub mod errors;
pub mod inputs;
pub mod mappers;
pub mod status_apis;
pub mod validated;

pub use contact_apis::*;
pub use errors::{handle_panic, render_method_not_allowed, ApiError, ErrorKind};
pub use status_apis::*;
pub use validated::{BoundInput, Validated};
