//! HTTP exposure for the link system
//!
//! Builds an axum router over [`AppState`]. Routing, request parsing, and
//! response serialization live here; all policy decisions live in the
//! registry and the visibility engine.

pub mod handlers;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{AppState, USER_ID_HEADER};

/// Build the full router: link routes plus health checks, with request
/// tracing and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    let link_routes = Router::new()
        .route(
            "/users/{owner_id}/links",
            post(handlers::create_link).get(handlers::list_own_links),
        )
        .route(
            "/users/{owner_id}/links/{link_id}",
            patch(handlers::update_link).delete(handlers::delete_link),
        )
        .route(
            "/users/{owner_id}/profile-links",
            get(handlers::get_visible_links),
        )
        .with_state(state);

    health_routes()
        .merge(link_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "social-links"
    }))
}
