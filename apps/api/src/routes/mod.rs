pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::application::handlers as application_handlers;
use crate::chat;
use crate::scoring::handlers as scoring_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/application/post",
            post(application_handlers::handle_submit_application),
        )
        .route(
            "/api/v1/application/score-resume",
            post(scoring_handlers::handle_score_resume),
        )
        .route("/api/v1/chat", post(chat::handle_chat))
        .with_state(state)
}
