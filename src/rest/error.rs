//! API error types and responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::notifications::NotificationError;
use crate::users::UserError;
use crate::workflow::WorkflowError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// No actor supplied with the request
    Unauthorized(String),
    /// Role may not perform the operation at all
    Forbidden(String),
    /// Role may not touch another role's readiness item
    NotOwner(String),
    /// Plan is not ready for production start
    NotEligible(String),
    /// Production already started
    AlreadyStarted(String),
    /// Resource not found
    NotFound(String),
    /// Field validation failures, one message per problem
    ValidationError(Vec<String>),
    /// Resource already exists
    Conflict(String),
    /// Bad request
    BadRequest(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Individual validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = Vec::new();
        let (status, error, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotOwner(msg) => (StatusCode::FORBIDDEN, "not_owner", msg),
            ApiError::NotEligible(msg) => (StatusCode::CONFLICT, "not_eligible", msg),
            ApiError::AlreadyStarted(msg) => (StatusCode::CONFLICT, "already_started", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::ValidationError(errors) => {
                let message = format!("invalid plan: {}", errors.join("; "));
                details = errors;
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("invalid query: {}", rejection.body_text()))
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Forbidden(_) => ApiError::Forbidden(message),
            WorkflowError::NotOwner { .. } => ApiError::NotOwner(message),
            WorkflowError::NotEligible { .. } => ApiError::NotEligible(message),
            WorkflowError::AlreadyStarted { .. } => ApiError::AlreadyStarted(message),
            WorkflowError::ValidationError(errors) => ApiError::ValidationError(errors),
            WorkflowError::NotFound(_) => ApiError::NotFound(message),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::InvalidCredentials => ApiError::Unauthorized(message),
            UserError::Forbidden(_) => ApiError::Forbidden(message),
            UserError::NotFound(_) => ApiError::NotFound(message),
            UserError::Duplicate(_) => ApiError::Conflict(message),
            UserError::Invalid(_) => ApiError::BadRequest(message),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}
