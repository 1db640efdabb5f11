//! # pay-api
//!
//! HTTP front door for checkout-bridge.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout session creation for the storefront's product
//! - Stripe webhook verification and dispatch
//! - Static storefront pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Storefront index |
//! | GET | `/public/*` | Static assets |
//! | GET | `/config` | Publishable key |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | POST | `/webhook` | Stripe webhook |
//! | GET | `/health` | Health check |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
