//! REST API for the planboard.
//!
//! Exposes plan creation, readiness updates, production start, reports and
//! the notification feed over HTTP. Callers identify themselves with the
//! actor headers described in [`extract`].

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod dto;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Session endpoints
        .route("/api/v1/session", post(routes::session::login))
        .route(
            "/api/v1/session/capabilities",
            get(routes::session::capabilities),
        )
        // Plan endpoints
        .route(
            "/api/v1/plans",
            get(routes::plans::list).post(routes::plans::create),
        )
        .route("/api/v1/plans/:id", get(routes::plans::get_one))
        .route("/api/v1/plans/:id/start", post(routes::plans::start))
        // Readiness endpoints
        .route(
            "/api/v1/plans/:id/readiness/:role",
            put(routes::readiness::update),
        )
        .route("/api/v1/readiness/mine", get(routes::readiness::mine))
        // Report endpoints
        .route("/api/v1/dashboard", get(routes::reports::dashboard))
        .route("/api/v1/stream-status", get(routes::reports::stream_status))
        .route("/api/v1/machines", get(routes::reports::machines))
        // Notification endpoints
        .route("/api/v1/notifications", get(routes::notifications::list))
        .route(
            "/api/v1/plans/:id/notifications",
            get(routes::notifications::for_plan),
        )
        .route(
            "/api/v1/notifications/read-all",
            put(routes::notifications::mark_all_read),
        )
        .route(
            "/api/v1/notifications/:id/read",
            put(routes::notifications::mark_read),
        )
        // User endpoints
        .route(
            "/api/v1/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/api/v1/users/:id/active",
            put(routes::users::toggle_active),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API until ctrl-c
pub async fn serve(state: ApiState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST API server failed")?;

    tracing::info!("REST API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(ApiState::new(Config::default()).unwrap())
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn put_readiness(plan: &str, role: &str, actor: (&str, &str), status: &str) -> Request<Body> {
        Request::put(format!("/api/v1/plans/{}/readiness/{}", plan, role))
            .header("content-type", "application/json")
            .header("x-actor-id", actor.0)
            .header("x-actor-role", actor.1)
            .body(Body::from(json!({ "status": status }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let router = router();
        let (status, json) = send(
            &router,
            Request::get("/api/v1/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_requires_actor_headers() {
        let router = router();
        let request = Request::post("/api/v1/plans")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, json) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_create_reports_every_missing_field() {
        let router = router();
        let request = Request::post("/api/v1/plans")
            .header("content-type", "application/json")
            .header("x-actor-id", "1")
            .header("x-actor-role", "PPC")
            .body(Body::from(json!({ "part_name": "Housing" }).to_string()))
            .unwrap();
        let (status, json) = send(&router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert!(json["details"].as_array().unwrap().len() >= 6);
    }

    #[tokio::test]
    async fn test_readiness_then_start_flow() {
        let router = router();

        // PLAN-006 only lacks the store item
        let (status, json) = send(
            &router,
            put_readiness("PLAN-006", "STORE_EXECUTIVE", ("6", "STORE_EXECUTIVE"), "Ready"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "Production Ready");

        let start = || {
            Request::post("/api/v1/plans/PLAN-006/start")
                .header("x-actor-id", "1")
                .header("x-actor-role", "PPC")
                .body(Body::empty())
                .unwrap()
        };
        let (status, json) = send(&router, start()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "Production Started");

        let (status, json) = send(&router, start()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "already_started");

        let (status, json) = send(
            &router,
            put_readiness("PLAN-006", "QA_ENGINEER", ("5", "QA_ENGINEER"), "Pending"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_not_owner_route() {
        let router = router();
        let (status, json) = send(
            &router,
            put_readiness("PLAN-004", "QA_ENGINEER", ("4", "TOOL_CRIB"), "Ready"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "not_owner");
    }

    #[tokio::test]
    async fn test_unknown_readiness_status_is_bad_request() {
        let router = router();
        let (status, json) = send(
            &router,
            put_readiness("PLAN-006", "STORE_EXECUTIVE", ("6", "STORE_EXECUTIVE"), "Done"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
        assert!(json["message"].as_str().unwrap().starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn test_malformed_plan_body_is_bad_request() {
        let router = router();
        let request = Request::post("/api/v1/plans")
            .header("content-type", "application/json")
            .header("x-actor-id", "1")
            .header("x-actor-role", "PPC")
            .body(Body::from(json!({ "start_date": "tomorrow" }).to_string()))
            .unwrap();
        let (status, json) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");

        let request = Request::post("/api/v1/plans")
            .header("x-actor-id", "1")
            .header("x-actor-role", "PPC")
            .body(Body::from("{}"))
            .unwrap();
        let (status, json) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_unknown_filter_value_is_bad_request() {
        let router = router();
        let (status, json) = send(
            &router,
            Request::get("/api/v1/stream-status?priority=Urgent")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
        assert!(json["message"].as_str().unwrap().starts_with("invalid query"));
    }

    #[tokio::test]
    async fn test_openapi_route() {
        let router = router();
        let (status, json) = send(
            &router,
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["info"]["title"], "Planboard API");
    }
}
