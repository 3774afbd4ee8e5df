//! Request actor extraction.
//!
//! The dashboard identifies the signed-in user with two headers set after
//! `POST /api/v1/session`: `x-actor-id` and `x-actor-role`. The values are
//! trusted as-is; workflow rules only look at the role.
//!
//! [`ApiJson`] and [`ApiQuery`] wrap axum's extractors so malformed bodies
//! and query strings reject with the same JSON error body as every other
//! failure.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use crate::rest::error::ApiError;
use crate::types::{Actor, Role};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// JSON request body; deserialization failures reject with 400 `bad_request`
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; unknown filter values reject with 400 `bad_request`
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Actor required by the handler; missing headers reject with 401
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

/// Actor if the caller identified itself
#[derive(Debug, Clone)]
pub struct OptionalActor(pub Option<Actor>);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn actor_from_parts(parts: &Parts) -> Result<Option<Actor>, ApiError> {
    let (id, role) = match (header(parts, ACTOR_ID_HEADER), header(parts, ACTOR_ROLE_HEADER)) {
        (None, None) => return Ok(None),
        (Some(id), Some(role)) => (id, role),
        _ => {
            return Err(ApiError::Unauthorized(format!(
                "both {} and {} headers are required",
                ACTOR_ID_HEADER, ACTOR_ROLE_HEADER
            )))
        }
    };
    let role: Role = role
        .parse()
        .map_err(|e: crate::types::UnknownRole| ApiError::BadRequest(e.to_string()))?;
    Ok(Some(Actor::new(id, role)))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts)?.map(CurrentActor).ok_or_else(|| {
            ApiError::Unauthorized(format!(
                "sign in first: {} and {} headers are required",
                ACTOR_ID_HEADER, ACTOR_ROLE_HEADER
            ))
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_parts(parts).map(OptionalActor)
    }
}
