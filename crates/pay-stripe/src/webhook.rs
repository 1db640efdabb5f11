//! # Stripe Webhook Handling
//!
//! Decoding of verified deliveries and dispatch by event type.
//! Call [`decode_event`] only on bytes whose signature already checked out.

use chrono::{DateTime, Utc};
use pay_core::{PaymentError, PaymentResult, WebhookEvent, WebhookEventType};
use serde::Deserialize;
use tracing::{info, warn};

/// Parsed checkout.session.completed event data
#[derive(Debug, Clone)]
pub struct CheckoutCompletedData {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_email: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_status: String,
}

impl CheckoutCompletedData {
    /// Parse from a webhook event
    pub fn from_event(event: &WebhookEvent) -> PaymentResult<Self> {
        let obj = event.data.as_object().ok_or_else(|| {
            PaymentError::WebhookParseError("Event data is not an object".to_string())
        })?;

        let str_field = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(String::from);

        let session_id = str_field("id")
            .ok_or_else(|| PaymentError::WebhookParseError("Missing session id".to_string()))?;

        let customer_email = obj
            .get("customer_details")
            .and_then(|cd| cd.get("email"))
            .and_then(|v| v.as_str())
            .map(String::from);

        Ok(Self {
            session_id,
            payment_intent_id: str_field("payment_intent"),
            customer_email,
            amount_total: obj.get("amount_total").and_then(|v| v.as_i64()),
            currency: str_field("currency"),
            payment_status: str_field("payment_status").unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// Webhook event handler trait
///
/// Implement this trait to act on events. Every method defaults to logging.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when a checkout session is completed
    fn on_checkout_completed(&self, data: CheckoutCompletedData) -> PaymentResult<()> {
        info!(
            session_id = %data.session_id,
            amount_total = ?data.amount_total,
            payment_status = %data.payment_status,
            "Checkout completed"
        );
        Ok(())
    }

    /// Called when a checkout session expires unpaid
    fn on_checkout_expired(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Checkout expired: {:?}", event.object_id());
        Ok(())
    }

    /// Called when a payment succeeds
    fn on_payment_succeeded(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Payment succeeded: {:?}", event.object_id());
        Ok(())
    }

    /// Called when a payment fails
    fn on_payment_failed(&self, event: &WebhookEvent) -> PaymentResult<()> {
        warn!("Payment failed: {:?}", event.object_id());
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Unhandled event type {}", event.event_type);
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: &WebhookEvent) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::CheckoutCompleted => {
            let data = CheckoutCompletedData::from_event(event)?;
            handler.on_checkout_completed(data)
        }
        WebhookEventType::CheckoutExpired => handler.on_checkout_expired(event),
        WebhookEventType::PaymentSucceeded => handler.on_payment_succeeded(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

/// Events with a dedicated handler method
pub const HANDLED_WEBHOOK_EVENTS: &[&str] = &[
    "checkout.session.completed",
    "checkout.session.expired",
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
];

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    livemode: bool,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

/// Decode a verified Stripe event body
pub fn decode_event(payload: &[u8]) -> PaymentResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
    })?;

    Ok(WebhookEvent {
        event_id: event.id,
        event_type: WebhookEventType::from_tag(&event.event_type),
        provider: "stripe".to_string(),
        livemode: event.livemode,
        data: event.data.object,
        created: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}
