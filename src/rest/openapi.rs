//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::capabilities::Section;
use crate::notifications::{Notification, NotificationKind};
use crate::reports::{
    DashboardSummary, Kpis, MachineLoad, MyReadiness, MyReadinessRow, PlanRow, PriorityCount,
    RoleReadiness, StatusSummary, StreamStatus,
};
use crate::rest::dto::{
    CapabilitiesResponse, HealthResponse, LoginRequest, MachinesResponse, MarkAllReadResponse,
    NotificationListResponse, PlanResponse, PlanSummary, ReadinessUpdateRequest, SessionResponse,
    StatusResponse,
};
use crate::rest::error::ErrorResponse;
use crate::types::{
    Actor, NewPlan, PlanPriority, PlanStatus, ReadinessItem, ReadinessStatus, Role,
};
use crate::users::{NewUser, User};

/// OpenAPI documentation for the planboard REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Planboard API",
        version = "0.1.0",
        description = "REST API for production plan readiness tracking and production start.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Session endpoints
        crate::rest::routes::session::login,
        crate::rest::routes::session::capabilities,
        // Plan endpoints
        crate::rest::routes::plans::list,
        crate::rest::routes::plans::get_one,
        crate::rest::routes::plans::create,
        crate::rest::routes::plans::start,
        // Readiness endpoints
        crate::rest::routes::readiness::update,
        crate::rest::routes::readiness::mine,
        // Report endpoints
        crate::rest::routes::reports::dashboard,
        crate::rest::routes::reports::stream_status,
        crate::rest::routes::reports::machines,
        // Notification endpoints
        crate::rest::routes::notifications::list,
        crate::rest::routes::notifications::for_plan,
        crate::rest::routes::notifications::mark_read,
        crate::rest::routes::notifications::mark_all_read,
        // User endpoints
        crate::rest::routes::users::list,
        crate::rest::routes::users::create,
        crate::rest::routes::users::toggle_active,
    ),
    components(
        schemas(
            // Domain types
            Role,
            Actor,
            PlanStatus,
            PlanPriority,
            ReadinessStatus,
            ReadinessItem,
            Section,
            Notification,
            NotificationKind,
            User,
            // Response types
            HealthResponse,
            StatusResponse,
            SessionResponse,
            CapabilitiesResponse,
            PlanResponse,
            PlanSummary,
            MachinesResponse,
            NotificationListResponse,
            MarkAllReadResponse,
            StatusSummary,
            PlanRow,
            DashboardSummary,
            Kpis,
            RoleReadiness,
            MachineLoad,
            PriorityCount,
            StreamStatus,
            MyReadinessRow,
            MyReadiness,
            ErrorResponse,
            // Request types
            LoginRequest,
            NewPlan,
            ReadinessUpdateRequest,
            NewUser,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Session", description = "Sign-in and role capabilities"),
        (name = "Plans", description = "Plan creation, lookup and production start"),
        (name = "Readiness", description = "Per-role readiness checklist updates"),
        (name = "Reports", description = "Dashboard and stream analytics"),
        (name = "Notifications", description = "Plan event feed"),
        (name = "Users", description = "User directory administration"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}
