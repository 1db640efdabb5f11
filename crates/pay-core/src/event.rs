//! # Webhook Event Types
//!
//! A verified, decoded webhook delivery. Events only exist after their
//! signature has been checked; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// `checkout.session.completed`
    CheckoutCompleted,
    /// `checkout.session.expired`
    CheckoutExpired,
    /// `payment_intent.succeeded`
    PaymentSucceeded,
    /// `payment_intent.payment_failed`
    PaymentFailed,
    /// Unknown event (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    /// Map a provider type tag onto a known variant
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
            "checkout.session.expired" => WebhookEventType::CheckoutExpired,
            "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    /// The provider type tag
    pub fn tag(&self) -> &str {
        match self {
            WebhookEventType::CheckoutCompleted => "checkout.session.completed",
            WebhookEventType::CheckoutExpired => "checkout.session.expired",
            WebhookEventType::PaymentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WebhookEventType::Unknown(_))
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider (the deduplication key, if anyone needs one)
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Whether the event came from live mode
    #[serde(default)]
    pub livemode: bool,

    /// The event's `data.object`, left opaque
    pub data: serde_json::Value,

    /// When the provider created the event
    pub created: DateTime<Utc>,
}

impl WebhookEvent {
    /// ID of the object the event is about, if it has one
    pub fn object_id(&self) -> Option<&str> {
        self.data.get("id").and_then(|v| v.as_str())
    }
}
