//! # Application State
//!
//! Shared state for the Axum application.
//! Built once before serving and never mutated afterwards.

use anyhow::Context;
use pay_core::{BoxedPaymentProvider, Currency, LineItem, SessionDescriptor};
use pay_stripe::{LoggingWebhookHandler, StripeConfig, StripeProvider, WebhookHandler};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 4242;

/// The one product this storefront sells
pub const PRODUCT_NAME: &str = "Pro Subscription";
pub const PRODUCT_UNIT_AMOUNT: i64 = 2000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public URL of the storefront, used for checkout redirects
    pub client_url: String,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// Directory served under `/public`
    pub public_dir: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let cors_origin = get("CLIENT_URL");
        let client_url = cors_origin
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            client_url: client_url.trim_end_matches('/').to_string(),
            cors_origin,
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Success redirect; Stripe substitutes the session id placeholder
    pub fn success_url(&self) -> String {
        format!(
            "{}/public/success.html?session_id={{CHECKOUT_SESSION_ID}}",
            self.client_url
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/public/cancel.html", self.client_url)
    }

    /// Descriptor for the storefront's fixed product
    pub fn checkout_descriptor(&self) -> SessionDescriptor {
        SessionDescriptor::payment(self.success_url(), self.cancel_url()).with_item(LineItem::new(
            Currency::USD,
            PRODUCT_NAME,
            PRODUCT_UNIT_AMOUNT,
            1,
        ))
    }
}

/// Shared application state
///
/// Holds the publishable key only. The secret key lives inside the provider
/// and is unreachable from handlers.
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub provider: BoxedPaymentProvider,
    /// Receives verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Publishable key exposed by `/config`
    pub publishable_key: Arc<str>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the Stripe provider, all from environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let stripe_config = StripeConfig::from_env();
        let publishable_key = stripe_config.publishable_key.clone();

        let mode = if stripe_config.is_live_mode() {
            "live"
        } else if stripe_config.is_test_mode() {
            "test"
        } else {
            "unrecognized key"
        };
        info!("Stripe mode: {}", mode);

        let provider = StripeProvider::new(stripe_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(config, Arc::new(provider), publishable_key))
    }

    /// Assemble state from explicit parts
    pub fn with_provider(
        config: AppConfig,
        provider: BoxedPaymentProvider,
        publishable_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            provider,
            webhook_handler: Arc::new(LoggingWebhookHandler),
            publishable_key: publishable_key.into(),
            config: Arc::new(config),
        }
    }

    /// Builder: replace the webhook handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }
}
