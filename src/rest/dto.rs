//! Data Transfer Objects for the REST API.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// Note: ToSchema is derived on all DTOs for OpenAPI documentation generation

use crate::capabilities::Section;
use crate::notifications::Notification;
use crate::reports::StatusSummary;
use crate::types::{Actor, Plan, PlanPriority, PlanStatus, ReadinessItem, ReadinessStatus, Role};
use crate::users::User;
use crate::workflow;

// =============================================================================
// Plan DTOs
// =============================================================================

/// Full plan record with its derived status
#[derive(Debug, Serialize, Deserialize, ToSchema, TS, JsonSchema)]
#[ts(export)]
pub struct PlanResponse {
    pub id: String,
    pub machine_name: String,
    pub order_no: String,
    pub part_number: String,
    pub part_name: String,
    pub traveller_no: String,
    pub fixture_no: String,
    pub program_name: String,
    pub plan_quantity: u32,
    pub start_date: NaiveDate,
    pub priority: PlanPriority,
    pub status: PlanStatus,
    /// Every checklist item is Ready
    pub fully_ready: bool,
    /// Checklist items not yet Ready
    pub pending: usize,
    pub readiness: Vec<ReadinessItem>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_started_by: Option<String>,
}

impl From<&Plan> for PlanResponse {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            machine_name: plan.machine_name.clone(),
            order_no: plan.order_no.clone(),
            part_number: plan.part_number.clone(),
            part_name: plan.part_name.clone(),
            traveller_no: plan.traveller_no.clone(),
            fixture_no: plan.fixture_no.clone(),
            program_name: plan.program_name.clone(),
            plan_quantity: plan.plan_quantity,
            start_date: plan.start_date,
            priority: plan.priority,
            status: plan.status(),
            fully_ready: plan.is_fully_ready(),
            pending: workflow::pending_count(plan),
            readiness: plan.readiness.clone(),
            created_by: plan.created_by.clone(),
            created_at: plan.created_at,
            production_started_at: plan.production_started_at,
            production_started_by: plan.production_started_by.clone(),
        }
    }
}

/// Summary response for listing plans
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanSummary {
    pub id: String,
    pub machine_name: String,
    pub order_no: String,
    pub part_number: String,
    pub part_name: String,
    pub plan_quantity: u32,
    pub start_date: NaiveDate,
    pub priority: PlanPriority,
    pub status: PlanStatus,
    pub pending: usize,
    /// Caller's own checklist item, when the caller's role participates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_readiness: Option<ReadinessStatus>,
}

impl PlanSummary {
    pub fn new(plan: &Plan, viewer: Option<Role>) -> Self {
        Self {
            id: plan.id.clone(),
            machine_name: plan.machine_name.clone(),
            order_no: plan.order_no.clone(),
            part_number: plan.part_number.clone(),
            part_name: plan.part_name.clone(),
            plan_quantity: plan.plan_quantity,
            start_date: plan.start_date,
            priority: plan.priority,
            status: plan.status(),
            pending: workflow::pending_count(plan),
            my_readiness: viewer.and_then(|role| plan.item_for(role)).map(|i| i.status),
        }
    }
}

/// Request to update one readiness item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessUpdateRequest {
    pub status: ReadinessStatus,
}

/// Configured machines
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MachinesResponse {
    pub machines: Vec<String>,
}

// =============================================================================
// Session DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Signed-in user and the headers to send on later requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub actor: Actor,
    pub user: User,
    pub sections: Vec<Section>,
    pub can_create_plans: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CapabilitiesResponse {
    pub role: Role,
    pub sections: Vec<Section>,
    pub can_create_plans: bool,
}

// =============================================================================
// Notification DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListResponse {
    pub unread: usize,
    /// Newest first
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

// =============================================================================
// Health DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Service status response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub plans: StatusSummary,
    pub unread_notifications: usize,
    pub participating_roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::BoardState;

    #[test]
    fn test_plan_response_carries_derived_fields() {
        let board = BoardState::load(&Config::default().planning).unwrap();
        let response = PlanResponse::from(board.get("PLAN-003").unwrap());

        assert_eq!(response.status, PlanStatus::Created);
        assert!(!response.fully_ready);
        assert_eq!(response.pending, 2);
    }

    #[test]
    fn test_plan_response_schema_exports_derived_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(PlanResponse)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["status", "fully_ready", "pending", "readiness"] {
            assert!(properties.contains_key(field), "missing {}", field);
        }

        let decl = PlanResponse::decl();
        assert!(decl.contains("status: PlanStatus"));
        assert!(decl.contains("fully_ready: boolean"));
        assert!(decl.contains("pending: number"));
    }
}
