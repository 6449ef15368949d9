//! HTTP route handlers for the relay API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::conversation::ReplyStatus;
use crate::session::UserId;

use super::state::AppState;

/// Message used when the request carries none.
pub const DEFAULT_MESSAGE: &str = "Hello";

/// Create the API router with all routes. Static assets are the fallback.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .fallback_service(assets)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "artlink-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Chat request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message.
    #[serde(default)]
    pub message: Option<String>,
    /// Identifier from a previous reply, if any.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Chat response, used for both success and provider failure.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Reply text.
    pub reply: String,
    /// Identifier to send with the next message.
    pub user_id: String,
}

/// Handle a chat message.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let message = request
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let user_id = request.user_id.filter(|id| !id.is_empty()).map(UserId::from);

    let outcome = state.assembler.respond(message, user_id).await;

    let status = match outcome.status {
        ReplyStatus::Replied => StatusCode::OK,
        ReplyStatus::ProviderFailed => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ChatResponse {
            reply: outcome.reply,
            user_id: outcome.user_id.into_string(),
        }),
    )
}
