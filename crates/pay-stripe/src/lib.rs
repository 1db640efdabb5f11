//! # pay-stripe
//!
//! Stripe payment provider for checkout-bridge.
//!
//! - **StripeProvider** opens hosted Checkout Sessions and verifies
//!   `Stripe-Signature` webhooks
//! - **signature** holds the HMAC-SHA256 scheme on its own
//! - **webhook** decodes verified events and dispatches them to a
//!   [`WebhookHandler`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::{StripeConfig, StripeProvider};
//! use pay_core::PaymentProvider;
//!
//! let provider = StripeProvider::new(StripeConfig::from_env())?;
//! let session = provider.create_session(&descriptor).await?;
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_stripe::{dispatch_webhook_event, CheckoutCompletedData, WebhookHandler};
//!
//! struct MyHandler;
//!
//! impl WebhookHandler for MyHandler {
//!     fn on_checkout_completed(&self, data: CheckoutCompletedData) -> PaymentResult<()> {
//!         println!("Session {} paid", data.session_id);
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint, with the untouched request body:
//! let event = provider.verify_webhook(&body, signature)?;
//! dispatch_webhook_event(&MyHandler, &event)?;
//! ```

pub mod checkout;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use checkout::StripeProvider;
pub use config::StripeConfig;
pub use signature::{sign_payload, verify_signature, SIGNATURE_HEADER};
pub use webhook::{
    decode_event, dispatch_webhook_event, CheckoutCompletedData, LoggingWebhookHandler,
    WebhookHandler, HANDLED_WEBHOOK_EVENTS,
};
