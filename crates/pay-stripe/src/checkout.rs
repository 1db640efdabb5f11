//! # Stripe Checkout Sessions
//!
//! `PaymentProvider` implementation backed by the Stripe REST API.
//! Sessions are created with a single form-encoded POST; webhooks are
//! verified locally against the signing secret.

use crate::config::StripeConfig;
use crate::signature::verify_signature;
use crate::webhook::decode_event;
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    CheckoutSession, PaymentError, PaymentProvider, PaymentResult, SessionDescriptor,
    WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Flatten a descriptor into Stripe's bracketed form parameters
    fn form_params(descriptor: &SessionDescriptor) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), descriptor.mode.as_str().to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), descriptor.success_url.clone()),
            ("cancel_url".to_string(), descriptor.cancel_url.clone()),
        ];

        for (i, item) in descriptor.line_items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, descriptor), fields(items = descriptor.line_items.len()))]
    async fn create_session(
        &self,
        descriptor: &SessionDescriptor,
    ) -> PaymentResult<CheckoutSession> {
        let form_params = Self::form_params(descriptor);

        debug!(
            "Creating Stripe checkout session: mode={}, total={}",
            descriptor.mode.as_str(),
            descriptor.total()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = match serde_json::from_str::<StripeErrorResponse>(&body) {
                Ok(error_response) => error_response.error.message,
                Err(_) => format!("HTTP {}: {}", status, body),
            };

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, session_response.url
        );

        Ok(CheckoutSession {
            id: session_response.id,
            url: session_response.url,
        })
    }

    #[instrument(skip_all, fields(len = payload.len()))]
    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> PaymentResult<WebhookEvent> {
        let (Some(signature), Some(secret)) = (signature, self.config.webhook_secret.as_deref())
        else {
            warn!("Webhook rejected before verification: signature or secret missing");
            return Err(PaymentError::WebhookVerificationFailed(
                "Missing Stripe signature or webhook secret".to_string(),
            ));
        };

        verify_signature(
            payload,
            signature,
            secret,
            self.config.webhook_tolerance_secs,
            Utc::now().timestamp(),
        )?;

        let event = decode_event(payload)?;
        debug!("Verified Stripe webhook: type={}", event.event_type);
        Ok(event)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
