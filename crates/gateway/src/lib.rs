//! HTTP API gateway for groundcrew.
//!
//! Exposes the chat endpoint, a health check, and transcript clearing.
//! Built on Axum. Per-session transcripts live in memory only — the
//! answer engine itself is stateless per turn, so concurrent sessions
//! share nothing but the controller.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use groundcrew_pipeline::FallbackController;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub controller: Arc<FallbackController>,
    transcripts: RwLock<HashMap<String, Vec<TranscriptEntry>>>,
}

impl GatewayState {
    pub fn new(controller: Arc<FallbackController>) -> Self {
        Self {
            controller,
            transcripts: RwLock::new(HashMap::new()),
        }
    }
}

type SharedState = Arc<GatewayState>;

/// One exchange in a session transcript.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub user: String,
    pub assistant: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session to append to; a fresh one is created when absent.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub session_id: String,
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/clear", post(clear_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn serve(
    state: SharedState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Gateway listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "agent": "ready"}))
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<serde_json::Value>)> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "message must not be empty"})),
        ));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!(session = %session_id, "Processing chat turn");
    let reply = state.controller.handle(&message).await;

    state
        .transcripts
        .write()
        .await
        .entry(session_id.clone())
        .or_default()
        .push(TranscriptEntry {
            user: message,
            assistant: reply.clone(),
            timestamp: Utc::now(),
        });

    Ok(Json(ChatReply { session_id, reply }))
}

async fn clear_handler(
    State(state): State<SharedState>,
    Json(request): Json<ClearRequest>,
) -> Json<serde_json::Value> {
    let removed = state
        .transcripts
        .write()
        .await
        .remove(&request.session_id)
        .is_some();
    Json(serde_json::json!({"cleared": removed}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use groundcrew_core::Error;
    use groundcrew_pipeline::AnswerStrategy;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct EchoStrategy;

    #[async_trait]
    impl AnswerStrategy for EchoStrategy {
        fn name(&self) -> &str {
            "echo"
        }

        async fn answer(&self, turn: &str) -> Result<String, Error> {
            Ok(format!("You asked about: {turn}. Here is a long enough reply."))
        }
    }

    fn test_state() -> SharedState {
        let strategy = Arc::new(EchoStrategy);
        let controller = Arc::new(FallbackController::new(
            strategy.clone(),
            strategy.clone(),
            strategy,
        ));
        Arc::new(GatewayState::new(controller))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ready() {
        let router = build_router(test_state());
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["agent"], "ready");
    }

    #[tokio::test]
    async fn chat_roundtrips_a_reply() {
        let router = build_router(test_state());
        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": "What is Rust?"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["reply"].as_str().unwrap().contains("What is Rust?"));
        assert!(!body["session_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let router = build_router(test_state());
        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": "   "}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transcripts_accumulate_and_clear() {
        let state = test_state();
        let router = build_router(state.clone());

        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"session_id": "s1", "message": "What is Rust?"}"#,
            ))
            .unwrap();
        router.clone().oneshot(request).await.unwrap();

        assert_eq!(state.transcripts.read().await.get("s1").unwrap().len(), 1);

        let request = Request::post("/api/clear")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"session_id": "s1"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        let body = body_json(response).await;
        assert_eq!(body["cleared"], true);
        assert!(state.transcripts.read().await.get("s1").is_none());
    }
}
