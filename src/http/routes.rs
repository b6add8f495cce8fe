//! HTTP route definitions

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::app::AppState;
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Everything that is not an API route is the browser client
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_rooms: usize,
    seated_players: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_rooms: state.rooms.active_rooms(),
        seated_players: state.rooms.seated_players(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn state() -> AppState {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.static_dir = PathBuf::from("definitely-not-a-real-dir");
        AppState::new(config)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn health_reports_room_counts() {
        let state = state();
        tokio_test::assert_ok!(state.rooms.create(Uuid::new_v4()));

        let (status, body) = get(build_router(state), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["active_rooms"], 1);
        assert_eq!(json["seated_players"], 1);
        assert!(json["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_static_files() {
        let (status, _) = get(build_router(state()), "/nope.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn plain_get_on_ws_is_refused() {
        let (status, _) = get(build_router(state()), "/ws").await;
        assert!(status.is_client_error());
    }
}
