//! # Payment Provider Trait
//!
//! The single seam between the HTTP front door and a vendor API.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            PaymentProvider (trait)           │
//! │  ├── create_session()   outbound, async      │
//! │  ├── verify_webhook()   inbound, sync        │
//! │  └── provider_name()                         │
//! └──────────────────────────────────────────────┘
//!                        ▲
//!                ┌───────┴───────┐
//!                │ StripeProvider│
//!                └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::event::WebhookEvent;
use crate::session::{CheckoutSession, SessionDescriptor};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a hosted checkout session.
    ///
    /// One attempt; failures come back as the provider reported them.
    async fn create_session(&self, descriptor: &SessionDescriptor)
        -> PaymentResult<CheckoutSession>;

    /// Verify a webhook signature and decode the event.
    ///
    /// # Arguments
    /// * `payload` - Raw request body, exactly as received
    /// * `signature` - Signature header value, `None` if the header was absent
    ///
    /// Returns the event only if the signature binds `payload` to the shared
    /// secret. Decoding never happens before verification.
    fn verify_webhook(&self, payload: &[u8], signature: Option<&str>)
        -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
