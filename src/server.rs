//! Minimal JSON HTTP server.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::bridge::{ErrorBody, IssueParams};
use crate::error::AppError;
use crate::report::redact_log_details;
use crate::service::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/issues", get(issues))
        .route("/api/users", get(users))
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("API server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

async fn issues(State(state): State<AppState>, Query(params): Query<IssueParams>) -> Response {
    respond(state.issues_for(&params).await)
}

async fn users(State(state): State<AppState>) -> Response {
    respond(state.staff_profiles().await)
}

fn respond<T: Serialize>(result: Result<T, AppError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, Json(body)),
        Err(err) => {
            error!("Request failed: {}", redact_log_details(&err.to_string()));
            json_response(err.status(), Json(ErrorBody::from(&err)))
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: Json<T>) -> Response {
    (status, [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::state_for;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use mockito::Matcher;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let cors = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, cors, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn issues_without_user_id_is_bad_request() {
        let app = router(state_for("http://127.0.0.1:9", None));
        let (status, cors, body) = get_json(app, "/api/issues").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({"error": "user_id is required"}));
    }

    #[tokio::test]
    async fn upstream_listing_failure_is_500() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/issues.json")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("broken")
            .create_async()
            .await;

        let app = router(state_for(&server.url(), None));
        let (status, _, body) = get_json(app, "/api/issues?user_id=7").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("failed to list issues"));
    }

    #[tokio::test]
    async fn issues_with_empty_listing_is_empty_array() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/issues.json")
            .match_query(Matcher::UrlEncoded("project_id".into(), "3".into()))
            .with_status(200)
            .with_body(json!({"issues": [], "total_count": 0}).to_string())
            .create_async()
            .await;

        let app = router(state_for(&server.url(), None));
        let (status, _, body) = get_json(app, "/api/issues?user_id=7&project_id=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn users_route_returns_profiles() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/4.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"user": {"id": 4, "firstname": "Ko", "lastname": "Sato", "login": "ksato"}}).to_string())
            .create_async()
            .await;

        let app = router(state_for(&server.url(), Some("4")));
        let (status, _, body) = get_json(app, "/api/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"id": 4, "firstname": "Ko", "lastname": "Sato", "login": "ksato"}])
        );
    }
}
