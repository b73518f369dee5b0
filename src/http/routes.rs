use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/personas/:persona/voice", get(handlers::get_voice_profile))
        // Interview flow
        .route(
            "/interviews",
            post(handlers::start_interview).get(handlers::list_interviews),
        )
        .route(
            "/interviews/:session_id",
            get(handlers::get_interview).delete(handlers::discard_interview),
        )
        .route("/interviews/:session_id/turns", post(handlers::submit_turn))
        .route("/interviews/:session_id/cancel", post(handlers::cancel_turn))
        .route(
            "/interviews/:session_id/analyze",
            post(handlers::analyze_interview),
        )
        // Live session queries
        .route(
            "/interviews/:session_id/status",
            get(handlers::get_interview_status),
        )
        .route(
            "/interviews/:session_id/transcript",
            get(handlers::get_interview_transcript),
        )
        // Stored résumés
        .route(
            "/resumes/:kind",
            put(handlers::put_resume).get(handlers::get_resume),
        )
        // Browser UI runs on another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
