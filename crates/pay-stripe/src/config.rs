//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.
//!
//! Missing keys are logged, never fatal: the server still starts and the
//! placeholder keys make Stripe reject calls with an authentication error.

use crate::signature::DEFAULT_TOLERANCE_SECS;
use std::env;
use tracing::{error, warn};

/// Stand-in secret key used when `STRIPE_SECRET_KEY` is unset
pub const PLACEHOLDER_SECRET_KEY: &str = "sk_test_xxx";

/// Stand-in publishable key used when `STRIPE_PUBLISHABLE_KEY` is unset
pub const PLACEHOLDER_PUBLISHABLE_KEY: &str = "pk_test_xxx";

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_API_VERSION: &str = "2024-06-20";

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Publishable key (pk_test_... or pk_live_...)
    pub publishable_key: String,

    /// Webhook signing secret (whsec_...); every webhook is rejected without it
    pub webhook_secret: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Maximum age of a webhook signature timestamp, in seconds
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Read env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_PUBLISHABLE_KEY`
    /// - `STRIPE_WEBHOOK_SECRET`
    /// - `STRIPE_API_BASE_URL` (optional)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret_key = get("STRIPE_SECRET_KEY").unwrap_or_else(|| {
            error!("Missing STRIPE_SECRET_KEY in environment");
            PLACEHOLDER_SECRET_KEY.to_string()
        });

        let publishable_key = get("STRIPE_PUBLISHABLE_KEY").unwrap_or_else(|| {
            error!("Missing STRIPE_PUBLISHABLE_KEY in environment");
            PLACEHOLDER_PUBLISHABLE_KEY.to_string()
        });

        let webhook_secret = get("STRIPE_WEBHOOK_SECRET");
        if webhook_secret.is_none() {
            warn!("STRIPE_WEBHOOK_SECRET not set, webhooks will be rejected");
        }

        let config = Self {
            secret_key,
            publishable_key,
            webhook_secret,
            api_base_url: get("STRIPE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        };

        for problem in config.format_warnings() {
            warn!("{}", problem);
        }

        config
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        secret_key: impl Into<String>,
        publishable_key: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            publishable_key: publishable_key.into(),
            webhook_secret: Some(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Key-format problems worth a warning. Never fatal.
    pub fn format_warnings(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            problems.push("STRIPE_SECRET_KEY should start with sk_test_ or sk_live_");
        }
        if !self.publishable_key.starts_with("pk_test_")
            && !self.publishable_key.starts_with("pk_live_")
        {
            problems.push("STRIPE_PUBLISHABLE_KEY should start with pk_test_ or pk_live_");
        }
        if let Some(secret) = &self.webhook_secret {
            if !secret.starts_with("whsec_") {
                problems.push("STRIPE_WEBHOOK_SECRET should start with whsec_");
            }
        }
        problems
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.starts_with("sk_live_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: drop the webhook secret
    pub fn without_webhook_secret(mut self) -> Self {
        self.webhook_secret = None;
        self
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("publishable_key", &self.publishable_key)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}
