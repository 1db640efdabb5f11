//! # Routes
//!
//! Axum router configuration for the storefront backend.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
/// - GET  /                        - Storefront index page
/// - GET  /public/*                - Static assets
/// - GET  /config                  - Publishable key
/// - POST /create-checkout-session - Create checkout session
/// - POST /webhook                 - Stripe webhook (raw body)
/// - GET  /health                  - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(state.config.cors_origin.as_deref()))
        .allow_methods(Any)
        .allow_headers(Any);

    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/create-checkout-session", post(handlers::create_checkout_session))
        .route("/webhook", post(handlers::webhook))
        .route("/health", get(handlers::health))
        // Static storefront
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .nest_service("/public", ServeDir::new(public_dir))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

fn allowed_origin(origin: Option<&str>) -> AllowOrigin {
    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            warn!("CLIENT_URL is not a valid origin header, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    }
}
