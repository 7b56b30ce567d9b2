pub mod auth;
pub mod candidates;
pub mod companies;
pub mod dashboard;
pub mod directory;
pub mod feedback;
pub mod form;
pub mod health;
pub mod interviews;
pub mod notes;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    auth::require_auth,
    cors::cors_layer,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/db-status", get(health::db_status))
        .route("/api/auth/login", post(auth::login))
        .route("/api/candidates/apply", post(candidates::apply))
        .route("/api/candidates/login", post(candidates::login))
        .route("/api/companies/apply", post(companies::apply))
        .route("/api/companies/login", post(companies::login));

    let protected_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/candidate/profile", get(candidates::profile))
        .route("/api/candidates", get(candidates::list))
        .route("/api/candidates/:id/status", get(candidates::status))
        .route("/api/company", get(companies::profile))
        .route(
            "/api/interviews",
            post(interviews::create_interview).get(interviews::list_interviews),
        )
        .route(
            "/api/interviews/for-feedback",
            get(interviews::interviews_for_feedback),
        )
        .route(
            "/api/interviews/:id",
            get(interviews::get_interview)
                .put(interviews::update_interview)
                .delete(interviews::delete_interview),
        )
        .route("/api/interviews/:id/status", patch(interviews::update_status))
        .route(
            "/api/feedback",
            post(feedback::submit_feedback).get(feedback::list_feedback),
        )
        .route(
            "/api/feedback/candidate/:candidate_id",
            get(feedback::candidate_feedback),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/upcoming", get(dashboard::upcoming))
        .route("/api/interviewers", get(directory::interviewers))
        .route("/api/positions", get(directory::positions))
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/notes/:id", delete(notes::delete_note))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let limiter = RateLimiter::new(state.config.api_rps);
    tracing::info!(uploads_dir = %state.config.uploads_dir, "Serving uploads");

    Router::new()
        .merge(public_api)
        .merge(protected_api)
        .layer(from_fn_with_state(limiter, rps_middleware))
        .nest_service("/uploads", ServeDir::new(&state.config.uploads_dir))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
