//! Sign-in and capability endpoints.

use axum::{extract::State, Json};

use crate::capabilities::{can_create_plans, sections_for};
use crate::rest::dto::{CapabilitiesResponse, LoginRequest, SessionResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::extract::{ApiJson, CurrentActor};
use crate::rest::state::ApiState;

/// Sign in with a directory username and the shared demo password
#[utoipa::path(
    post,
    path = "/api/v1/session",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let users = state.users.read().await;
    let user = users.authenticate(&request.username, &request.password)?;

    Ok(Json(SessionResponse {
        actor: user.actor(),
        user: user.clone(),
        sections: sections_for(user.role),
        can_create_plans: can_create_plans(user.role),
    }))
}

/// Dashboard sections available to the caller
#[utoipa::path(
    get,
    path = "/api/v1/session/capabilities",
    tag = "Session",
    responses(
        (status = 200, description = "Caller capabilities", body = CapabilitiesResponse),
        (status = 401, description = "No actor supplied", body = ErrorResponse)
    )
)]
pub async fn capabilities(CurrentActor(actor): CurrentActor) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        role: actor.role,
        sections: sections_for(actor.role),
        can_create_plans: can_create_plans(actor.role),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Section;
    use crate::config::Config;
    use crate::types::{Actor, Role};

    fn login_request(username: &str, password: &str) -> ApiJson<LoginRequest> {
        ApiJson(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_returns_actor_and_sections() {
        let state = ApiState::new(Config::default()).unwrap();
        let resp = login(State(state), login_request("ppc", "password"))
            .await
            .unwrap();

        assert_eq!(resp.actor, Actor::new("1", Role::Ppc));
        assert!(resp.can_create_plans);
        assert!(resp.sections.contains(&Section::StreamStatus));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let state = ApiState::new(Config::default()).unwrap();
        let result = login(State(state), login_request("ppc", "letmein")).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_capabilities_for_store() {
        let resp = capabilities(CurrentActor(Actor::new("6", Role::StoreExecutive))).await;
        assert_eq!(resp.role, Role::StoreExecutive);
        assert!(!resp.can_create_plans);
        assert!(resp.sections.contains(&Section::MyReadiness));
    }
}
