//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{conversations, health, messages};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
}

/// Conversation routes
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations/direct", post(conversations::create_direct))
        .route("/conversations/group", post(conversations::create_group))
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/:conversation_id",
            get(conversations::get_conversation),
        )
        .route(
            "/conversations/:conversation_id",
            delete(conversations::delete_conversation),
        )
        .route(
            "/conversations/:conversation_id/read",
            post(conversations::mark_read),
        )
        .route(
            "/conversations/:conversation_id/members",
            get(conversations::list_members),
        )
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations/:conversation_id/messages",
            get(messages::get_messages),
        )
        .route(
            "/conversations/:conversation_id/messages",
            post(messages::send_message),
        )
        .route("/messages/:message_id", patch(messages::edit_message))
        .route("/messages/:message_id", delete(messages::delete_message))
}
