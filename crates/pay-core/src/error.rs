//! # Payment Error Types
//!
//! Typed error handling for the checkout-bridge backend.
//! All provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// The underlying message without the variant prefix.
    ///
    /// For provider errors this is the provider's own text, which is what
    /// gets surfaced to API clients.
    pub fn message(&self) -> &str {
        match self {
            PaymentError::ProviderError { message, .. } => message,
            PaymentError::Configuration(m)
            | PaymentError::NetworkError(m)
            | PaymentError::WebhookVerificationFailed(m)
            | PaymentError::WebhookParseError(m)
            | PaymentError::Serialization(m)
            | PaymentError::Internal(m) => m,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::Configuration(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_)
            | PaymentError::Serialization(_)
            | PaymentError::Internal(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
