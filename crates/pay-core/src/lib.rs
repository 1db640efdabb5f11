//! # pay-core
//!
//! Core types and traits for the checkout-bridge backend.
//!
//! This crate provides:
//! - `PaymentProvider` trait, the one boundary to a vendor API
//! - `SessionDescriptor`, `LineItem` and `CheckoutSession` for checkout
//! - `WebhookEvent` and `WebhookEventType` for verified deliveries
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Currency, LineItem, PaymentProvider, SessionDescriptor};
//!
//! let descriptor = SessionDescriptor::payment(success_url, cancel_url)
//!     .with_item(LineItem::new(Currency::USD, "Pro Subscription", 2000, 1));
//!
//! let session = provider.create_session(&descriptor).await?;
//! // Redirect user to session.url
//! ```

pub mod error;
pub mod event;
pub mod provider;
pub mod session;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{WebhookEvent, WebhookEventType};
pub use provider::{BoxedPaymentProvider, PaymentProvider};
pub use session::{CheckoutMode, CheckoutSession, Currency, LineItem, SessionDescriptor};
