//! Axum router configuration with middleware.
//!
//! Message routes live under `/api/`.
//! Middleware: CORS, tracing.

use axum::Json;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        .route(
            "/messages",
            get(handlers::message::list_messages).post(handlers::message::create_message),
        )
        .route(
            "/messages/{id}",
            put(handlers::message::update_message).delete(handlers::message::delete_message),
        )
        .route(
            "/messages/regenerate/{id}",
            post(handlers::message::regenerate_message),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins, or any origin when none are configured
/// (or `"*"` is listed).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let any = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return any;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return any;
    }

    any.allow_origin(AllowOrigin::list(allowed))
}

/// GET / - Welcome message.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the chatpair API" }))
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
