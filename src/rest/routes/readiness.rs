//! Readiness checklist endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::reports::{self, MyReadiness};
use crate::rest::dto::{PlanResponse, ReadinessUpdateRequest};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::extract::{ApiJson, CurrentActor};
use crate::rest::state::ApiState;
use crate::types::{Role, UnknownRole};

/// Update one role's readiness item on a plan
///
/// Only the item's owning role may update it, and only before production
/// has started. Returns the plan with its re-derived status.
#[utoipa::path(
    put,
    path = "/api/v1/plans/{id}/readiness/{role}",
    tag = "Readiness",
    params(
        ("id" = String, Path, description = "Plan id"),
        ("role" = String, Path, description = "Owning role of the item (e.g., QA_ENGINEER)")
    ),
    request_body = ReadinessUpdateRequest,
    responses(
        (status = 200, description = "Item updated", body = PlanResponse),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 401, description = "No actor supplied", body = ErrorResponse),
        (status = 403, description = "Plan locked or item owned by another role", body = ErrorResponse),
        (status = 404, description = "Plan or item not found", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
    Path((id, role)): Path<(String, String)>,
    ApiJson(request): ApiJson<ReadinessUpdateRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let target: Role = role
        .parse()
        .map_err(|e: UnknownRole| ApiError::BadRequest(e.to_string()))?;

    let mut board = state.board.write().await;
    let plan = board.set_readiness(&id, &actor, target, request.status, Utc::now())?;

    Ok(Json(PlanResponse::from(plan)))
}

/// Checklist items owned by the caller's role
#[utoipa::path(
    get,
    path = "/api/v1/readiness/mine",
    tag = "Readiness",
    responses(
        (status = 200, description = "Caller's readiness items", body = MyReadiness),
        (status = 401, description = "No actor supplied", body = ErrorResponse)
    )
)]
pub async fn mine(
    State(state): State<ApiState>,
    CurrentActor(actor): CurrentActor,
) -> Json<MyReadiness> {
    let board = state.board.read().await;
    Json(reports::my_readiness(board.plans(), actor.role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{Actor, PlanStatus, ReadinessStatus};

    fn make_state() -> ApiState {
        ApiState::new(Config::default()).unwrap()
    }

    fn as_role(id: &str, role: Role) -> CurrentActor {
        CurrentActor(Actor::new(id, role))
    }

    fn path(id: &str, role: &str) -> Path<(String, String)> {
        Path((id.to_string(), role.to_string()))
    }

    fn body(status: ReadinessStatus) -> ApiJson<ReadinessUpdateRequest> {
        ApiJson(ReadinessUpdateRequest { status })
    }

    #[tokio::test]
    async fn test_owner_update_completes_checklist() {
        let state = make_state();

        // PLAN-006 only lacks the store item
        let resp = update(
            State(state),
            as_role("6", Role::StoreExecutive),
            path("PLAN-006", "store_executive"),
            body(ReadinessStatus::Ready),
        )
        .await
        .unwrap();

        assert_eq!(resp.status, PlanStatus::ProductionReady);
        assert!(resp.fully_ready);
    }

    #[tokio::test]
    async fn test_update_other_roles_item() {
        let state = make_state();
        let result = update(
            State(state),
            as_role("4", Role::ToolCrib),
            path("PLAN-004", "QA_ENGINEER"),
            body(ReadinessStatus::Ready),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotOwner(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_role() {
        let state = make_state();
        let result = update(
            State(state),
            as_role("5", Role::QaEngineer),
            path("PLAN-004", "FOREMAN"),
            body(ReadinessStatus::Ready),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_locked_plan() {
        let state = make_state();
        let result = update(
            State(state),
            as_role("5", Role::QaEngineer),
            path("PLAN-001", "QA_ENGINEER"),
            body(ReadinessStatus::NotReady),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_mine() {
        let state = make_state();
        let resp = mine(State(state), as_role("3", Role::NpdEngineer)).await;
        assert_eq!(resp.items.len(), 6);
        assert_eq!(resp.pending, 1);
    }
}
