//! # Request Handlers
//!
//! Axum request handlers for the storefront backend.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::PaymentError;
use pay_stripe::{dispatch_webhook_event, SIGNATURE_HEADER};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// `/config` response. Only ever carries the publishable key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub publishable_key: String,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Session ID
    pub id: String,
    /// Checkout URL (redirect user here)
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Acknowledgment telling the provider not to redeliver
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

fn status_for(err: &PaymentError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "checkout-bridge",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Publishable key for the frontend
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        publishable_key: state.publishable_key.to_string(),
    })
}

/// Create a checkout session for the fixed product
#[instrument(skip(state))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
) -> Result<Json<CreateCheckoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    let descriptor = state.config.checkout_descriptor();

    info!(
        "Creating checkout: {} items, total={}, success_url={}",
        descriptor.line_items.len(),
        descriptor.total(),
        descriptor.success_url
    );

    let session = state
        .provider
        .create_session(&descriptor)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            (status_for(&e), Json(ErrorResponse::new(e.message())))
        })?;

    info!("Created checkout session: {}", session.id);

    Ok(Json(CreateCheckoutResponse {
        id: session.id,
        url: session.url,
    }))
}

/// Receive a provider webhook.
///
/// Takes the body as raw `Bytes`; the signature covers those exact bytes.
#[instrument(skip(state, headers, body), fields(len = body.len()))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let event = state
        .provider
        .verify_webhook(&body, signature)
        .map_err(|e| {
            error!("Webhook signature verification failed. {}", e.message());
            (status_for(&e), format!("Webhook Error: {}", e.message()))
        })?;

    info!(
        "Received webhook: type={}, id={}",
        event.event_type, event.event_id
    );

    // Verified deliveries are always acknowledged, or the provider retries.
    if let Err(e) = dispatch_webhook_event(state.webhook_handler.as_ref(), &event) {
        warn!("Webhook handler error for {}: {}", event.event_id, e);
    }

    Ok(Json(WebhookAck { received: true }))
}
