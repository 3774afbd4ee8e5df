//! Dashboard and stream analytics endpoints.

use axum::{
    extract::State,
    Json,
};

use crate::reports::{self, DashboardSummary, PlanFilter, StreamStatus};
use crate::rest::dto::MachinesResponse;
use crate::rest::extract::ApiQuery;
use crate::rest::state::ApiState;

/// Plan counts and the latest plans
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    )
)]
pub async fn dashboard(State(state): State<ApiState>) -> Json<DashboardSummary> {
    let board = state.board.read().await;
    Json(reports::dashboard(board.plans()))
}

/// Stream-wide readiness analytics
///
/// KPIs and per-role tallies cover every plan; the machine breakdown and
/// plan matrix honour the filter.
#[utoipa::path(
    get,
    path = "/api/v1/stream-status",
    tag = "Reports",
    params(PlanFilter),
    responses(
        (status = 200, description = "Stream status", body = StreamStatus)
    )
)]
pub async fn stream_status(
    State(state): State<ApiState>,
    ApiQuery(filter): ApiQuery<PlanFilter>,
) -> Json<StreamStatus> {
    let board = state.board.read().await;
    Json(reports::stream_status(
        board.plans(),
        board.participating_roles(),
        board.machines(),
        &filter,
    ))
}

/// Machines plans may be scheduled on
#[utoipa::path(
    get,
    path = "/api/v1/machines",
    tag = "Reports",
    responses(
        (status = 200, description = "Configured machines", body = MachinesResponse)
    )
)]
pub async fn machines(State(state): State<ApiState>) -> Json<MachinesResponse> {
    let board = state.board.read().await;
    Json(MachinesResponse {
        machines: board.machines().to_vec(),
    })
}
