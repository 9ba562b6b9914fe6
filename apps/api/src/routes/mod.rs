pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analyze::handle_analyze;
use crate::chat::handle_chat;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/chat", post(handle_chat))
        .route("/api/analyze-resume", post(handle_analyze))
        .with_state(state)
}
