//! # Validation Extractor
//!
//! [`Validated<I>`] runs the request pipeline in front of every contacts
//! handler:
//!
//! ```text
//! Parsing --(bind ok)--> Validating --(no violations)--> Bound
//!    |                       |
//!    +--(bind error)--> Rejected (400)
//!                            +--(violations)--> Rejected (422)
//! ```
//!
//! A handler taking `Validated<I>` only ever runs with a valid query or
//! command; every rejection is rendered by [`ApiError`] without reaching a
//! use case.

use axum::async_trait;
use axum::body::to_bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request};
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::fmt;
use tracing::debug;

use super::binding::{bind, parse, BindError};
use super::errors::ApiError;
use crate::validation::{validate, Validate};

/// Upper bound on request bodies read by the extractor
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// An input type the extractor can bind and validate.
pub trait BoundInput: DeserializeOwned + Validate + Send {
    /// The query or command handed to the handler once the input is valid
    type Output: Send;

    /// Build the output. Only called after validation succeeded.
    fn into_output(self) -> Self::Output;
}

/// Extractor yielding the validated query or command of `I`.
pub struct Validated<I: BoundInput>(pub I::Output);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Parsing,
    Validating,
    Bound,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Parsing => "parsing",
            Stage::Validating => "validating",
            Stage::Bound => "bound",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

fn transition<I>(from: Stage, to: Stage) {
    debug!("{}: {} -> {}", type_name::<I>(), from, to);
}

#[async_trait]
impl<S, I> FromRequest<S> for Validated<I>
where
    S: Send + Sync,
    I: BoundInput,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let input = match read_input::<S, I>(request, state).await {
            Ok(input) => {
                transition::<I>(Stage::Parsing, Stage::Validating);
                input
            }
            Err(error) => {
                transition::<I>(Stage::Parsing, Stage::Rejected);
                debug!("Binding failed: {}", error);
                return Err(error.into());
            }
        };

        match validate(&input) {
            Ok(()) => {
                transition::<I>(Stage::Validating, Stage::Bound);
                Ok(Validated(input.into_output()))
            }
            Err(failed) => {
                transition::<I>(Stage::Validating, Stage::Rejected);
                debug!("Validation failed: {}", failed);
                Err(failed.into())
            }
        }
    }
}

async fn read_input<S, I>(request: Request, state: &S) -> Result<I, BindError>
where
    S: Send + Sync,
    I: BoundInput,
{
    let (mut parts, body) = request.into_parts();

    // Extractors without a matched route (fallbacks) have no path params
    let path: Vec<(String, String)> = RawPathParams::from_request_parts(&mut parts, state)
        .await
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
        .map_err(|e| BindError::MalformedQuery(e.body_text()))?;

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| BindError::UnreadableBody(e.to_string()))?;

    bind(parse(&body, &path, &query)?)
}
