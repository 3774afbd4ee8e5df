//! Notification feed endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::notifications::Notification;
use crate::rest::dto::{MarkAllReadResponse, NotificationListResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// List notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    responses(
        (status = 200, description = "Notification feed", body = NotificationListResponse)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<NotificationListResponse> {
    let board = state.board.read().await;
    let feed = board.notifications();
    Json(NotificationListResponse {
        unread: feed.unread_count(),
        notifications: feed.list().into_iter().cloned().collect(),
    })
}

/// Notifications concerning one plan, newest first
#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}/notifications",
    tag = "Notifications",
    params(
        ("id" = String, Path, description = "Plan id (e.g., PLAN-001)")
    ),
    responses(
        (status = 200, description = "Plan notification history", body = NotificationListResponse),
        (status = 404, description = "Plan not found", body = ErrorResponse)
    )
)]
pub async fn for_plan(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let board = state.board.read().await;
    let plan = board
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("plan {} not found", id)))?;
    let notifications: Vec<Notification> = board
        .notifications()
        .for_plan(&plan.id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(NotificationListResponse {
        unread: notifications.iter().filter(|n| !n.read).count(),
        notifications,
    }))
}

/// Mark one notification read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    tag = "Notifications",
    params(
        ("id" = Uuid, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    )
)]
pub async fn mark_read(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let mut board = state.board.write().await;
    let notification = board.notifications_mut().mark_read(id)?;
    Ok(Json(notification.clone()))
}

/// Mark every notification read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/read-all",
    tag = "Notifications",
    responses(
        (status = 200, description = "Number of notifications changed", body = MarkAllReadResponse)
    )
)]
pub async fn mark_all_read(State(state): State<ApiState>) -> Json<MarkAllReadResponse> {
    let mut board = state.board.write().await;
    Json(MarkAllReadResponse {
        updated: board.notifications_mut().mark_all_read(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{Actor, Role};
    use chrono::Utc;

    #[tokio::test]
    async fn test_new_plan_event_is_unread_until_marked() {
        let state = ApiState::new(Config::default()).unwrap();
        let before = list(State(state.clone())).await;
        assert_eq!(before.unread, 0);

        state
            .board
            .write()
            .await
            .start_production("PLAN-002", &Actor::new("1", Role::Ppc), Utc::now())
            .unwrap();

        let after = list(State(state.clone())).await;
        assert_eq!(after.unread, 1);
        let id = after.notifications[0].id;

        let marked = mark_read(State(state.clone()), Path(id)).await.unwrap();
        assert!(marked.read);
        assert_eq!(mark_all_read(State(state)).await.updated, 0);
    }

    #[tokio::test]
    async fn test_plan_history_only_lists_that_plan() {
        let state = ApiState::new(Config::default()).unwrap();
        state
            .board
            .write()
            .await
            .start_production("PLAN-002", &Actor::new("1", Role::Ppc), Utc::now())
            .unwrap();

        let history = for_plan(State(state.clone()), Path("plan-002".to_string()))
            .await
            .unwrap();
        assert_eq!(history.unread, 1);
        assert!(history.notifications.iter().all(|n| n.plan_id == "PLAN-002"));

        let quiet = for_plan(State(state.clone()), Path("PLAN-003".to_string()))
            .await
            .unwrap();
        assert!(quiet.notifications.iter().all(|n| n.plan_id == "PLAN-003"));
        assert_eq!(quiet.unread, 0);

        let missing = for_plan(State(state), Path("PLAN-999".to_string())).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_unknown_notification() {
        let state = ApiState::new(Config::default()).unwrap();
        let result = mark_read(State(state), Path(Uuid::new_v4())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
