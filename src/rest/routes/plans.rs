//! Plan endpoints: listing, detail, creation and production start.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::reports::{self, PlanFilter};
use crate::rest::dto::{PlanResponse, PlanSummary};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::extract::{ApiJson, ApiQuery, CurrentActor, OptionalActor};
use crate::rest::state::ApiState;
use crate::types::NewPlan;

/// List plans, optionally filtered
///
/// When actor headers are present each summary carries the caller's own
/// readiness item status.
#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "Plans",
    params(PlanFilter),
    responses(
        (status = 200, description = "Matching plans in creation order", body = Vec<PlanSummary>)
    )
)]
pub async fn list(
    State(state): State<ApiState>,
    OptionalActor(actor): OptionalActor,
    ApiQuery(filter): ApiQuery<PlanFilter>,
) -> Json<Vec<PlanSummary>> {
    let board = state.board.read().await;
    let viewer = actor.map(|a| a.role);
    let plans = reports::filter_plans(board.plans(), &filter)
        .into_iter()
        .map(|plan| PlanSummary::new(plan, viewer))
        .collect();
    Json(plans)
}

/// Get a single plan by id
#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    params(
        ("id" = String, Path, description = "Plan id (e.g., PLAN-001)")
    ),
    responses(
        (status = 200, description = "Plan details", body = PlanResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let board = state.board.read().await;
    let plan = board
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("plan {} not found", id)))?;

    Ok(Json(PlanResponse::from(plan)))
}

/// Create a plan (PPC only)
#[utoipa::path(
    post,
    path = "/api/v1/plans",
    tag = "Plans",
    request_body = NewPlan,
    responses(
        (status = 201, description = "Plan created with a pending checklist", body = PlanResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "No actor supplied", body = ErrorResponse),
        (status = 403, description = "Caller is not PPC", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(request): ApiJson<NewPlan>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let mut board = state.board.write().await;
    let plan = board.create_plan(&actor, request, Utc::now())?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(plan))))
}

/// Start production on a ready plan (PPC only)
#[utoipa::path(
    post,
    path = "/api/v1/plans/{id}/start",
    tag = "Plans",
    params(
        ("id" = String, Path, description = "Plan id")
    ),
    responses(
        (status = 200, description = "Production started", body = PlanResponse),
        (status = 401, description = "No actor supplied", body = ErrorResponse),
        (status = 403, description = "Caller is not PPC", body = ErrorResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse),
        (status = 409, description = "Plan not ready or already started", body = ErrorResponse)
    )
)]
pub async fn start(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    // check and stamp under one write guard
    let mut board = state.board.write().await;
    let plan = board.start_production(&id, &actor, Utc::now())?;

    Ok(Json(PlanResponse::from(plan)))
}
