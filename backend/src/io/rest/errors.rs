//! # Error Responses
//!
//! Every failure that reaches the HTTP boundary is classified into one
//! [`ErrorKind`] and rendered as `{"errors": [...]}`.
//!
//! | Source | Kind | Status |
//! |---|---|---|
//! | `BindError` | BadRequest | 400 |
//! | `ValidationFailed`, `DomainError::Invalid` | Validation | 422 |
//! | `DomainError::NotFound` | NotFound | 404 |
//! | `DomainError::Duplicate` | Conflict | 409 |
//! | unsupported method on a known route | MethodNotAllowed | 405 |
//! | `DomainError::PersistenceFailure` | PersistenceFailure | 500 |
//! | anything else, panics included | Unclassified | 500 |
//!
//! Persistence and unclassified errors are logged here and answered with a
//! fixed message; their cause never reaches the response body.

use axum::http::header::ALLOW;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;
use tracing::{error, warn};

use super::binding::BindError;
use super::inputs::BODY_FIELD;
use crate::domain::errors::DomainError;
use crate::validation::{ErrorCollection, ValidationFailed};
use shared::{ErrorDocument, ErrorObject, ErrorSource};

const PERSISTENCE_DETAIL: &str = "The request could not be completed because of a storage failure.";
const UNCLASSIFIED_DETAIL: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Validation,
    NotFound,
    MethodNotAllowed,
    Conflict,
    PersistenceFailure,
    Unclassified,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::PersistenceFailure | ErrorKind::Unclassified => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Malformed Request",
            ErrorKind::Validation => "Invalid Attribute",
            ErrorKind::NotFound => "Resource Not Found",
            ErrorKind::MethodNotAllowed => "Method Not Allowed",
            ErrorKind::Conflict => "Resource Conflict",
            ErrorKind::PersistenceFailure => "Persistence Failure",
            ErrorKind::Unclassified => "Internal Server Error",
        }
    }
}

/// A classified, renderable API failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    errors: Vec<ErrorObject>,
}

impl ApiError {
    /// A single-entry error of `kind`
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::with_source(kind, detail, None)
    }

    pub fn with_source(kind: ErrorKind, detail: impl Into<String>, source: Option<ErrorSource>) -> Self {
        Self {
            kind,
            errors: vec![entry(kind, detail.into(), source)],
        }
    }

    /// One entry per invalid field, in the order the fields were reported
    pub fn validation(violations: &ErrorCollection) -> Self {
        let kind = ErrorKind::Validation;
        let errors = violations
            .iter()
            .map(|(field, messages)| entry(kind, messages.join("; "), Some(source_for(field))))
            .collect();
        Self { kind, errors }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, detail)
    }

    pub fn persistence_failure() -> Self {
        Self::new(ErrorKind::PersistenceFailure, PERSISTENCE_DETAIL)
    }

    pub fn unclassified() -> Self {
        Self::new(ErrorKind::Unclassified, UNCLASSIFIED_DETAIL)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn errors(&self) -> &[ErrorObject] {
        &self.errors
    }
}

fn entry(kind: ErrorKind, detail: String, source: Option<ErrorSource>) -> ErrorObject {
    ErrorObject {
        status: kind.status().as_u16().to_string(),
        title: kind.title().to_string(),
        detail,
        source,
    }
}

/// Query and path parameters are reported as `parameter`, body attributes
/// as a JSON pointer.
fn source_for(field: &str) -> ErrorSource {
    if field.contains('[') || field == "id" {
        ErrorSource::Parameter(field.to_string())
    } else if field == BODY_FIELD {
        ErrorSource::Pointer(String::new())
    } else {
        ErrorSource::Pointer(format!("/{}", field))
    }
}

impl From<BindError> for ApiError {
    fn from(error: BindError) -> Self {
        ApiError::new(ErrorKind::BadRequest, error.to_string())
    }
}

impl From<ValidationFailed> for ApiError {
    fn from(failed: ValidationFailed) -> Self {
        ApiError::validation(&failed.errors)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::NotFound { .. } => {
                warn!("{}", error);
                ApiError::not_found(error.to_string())
            }
            DomainError::Duplicate { field, .. } => {
                warn!("{}", error);
                ApiError::with_source(
                    ErrorKind::Conflict,
                    error.to_string(),
                    Some(ErrorSource::Pointer(format!("/{}", field))),
                )
            }
            DomainError::Invalid { errors, .. } => ApiError::validation(&errors),
            DomainError::PersistenceFailure => ApiError::persistence_failure(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<DomainError>() {
            Ok(domain) => return domain.into(),
            Err(other) => other,
        };
        let error = match error.downcast::<ValidationFailed>() {
            Ok(failed) => return failed.into(),
            Err(other) => other,
        };
        let error = match error.downcast::<BindError>() {
            Ok(bind) => return bind.into(),
            Err(other) => other,
        };

        error!("Unclassified error: {:#}", error);
        ApiError::unclassified()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let document = ErrorDocument {
            errors: self.errors,
        };
        (self.kind.status(), Json(document)).into_response()
    }
}

/// Replace the router's bare 405 with an error document, keeping `Allow`.
/// Used with `axum::middleware::map_response`.
pub async fn render_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut rendered = ApiError::new(
        ErrorKind::MethodNotAllowed,
        "The requested method is not supported for this resource.",
    )
    .into_response();
    if let Some(allow) = allow {
        rendered.headers_mut().insert(ALLOW, allow);
    }
    rendered
}

/// Response for a handler that panicked. Used with `CatchPanicLayer`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = panic.downcast_ref::<&str>() {
        text.to_string()
    } else {
        "non-string panic payload".to_string()
    };

    ApiError::from(anyhow::anyhow!("handler panicked: {}", message)).into_response()
}
