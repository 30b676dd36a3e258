//! Route table and shared layers.
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{rivers, trips, users};
use crate::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Public routes
        .route("/auth/register", post(users::register))
        .route("/auth/login", post(users::login))
        .route("/rivers", get(rivers::list_rivers))
        .route("/sections", get(rivers::list_sections))
        .route("/sections/{id}", get(rivers::get_section))
        // Protected routes: handlers take the AuthUser extractor
        .route("/users/me", get(users::me).put(users::update_me))
        .route("/trips", get(trips::list).post(trips::create))
        .route(
            "/trips/{id}",
            get(trips::get_trip)
                .put(trips::update_trip)
                .delete(trips::delete_trip),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
