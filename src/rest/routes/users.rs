//! User directory endpoints. Mutations are ADMIN only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::extract::{ApiJson, CurrentActor};
use crate::rest::state::ApiState;
use crate::users::{NewUser, User};

/// List directory users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<User>)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<Vec<User>> {
    let users = state.users.read().await;
    Json(users.all().to_vec())
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing username or name", body = ErrorResponse),
        (status = 403, description = "Caller is not ADMIN", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(request): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let mut users = state.users.write().await;
    let user = users.create(&actor, request)?;
    Ok((StatusCode::CREATED, Json(user.clone())))
}

/// Flip a user's active flag
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/active",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Caller is not ADMIN", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn toggle_active(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let mut users = state.users.write().await;
    let user = users.toggle_active(&actor, &id)?;
    Ok(Json(user.clone()))
}
