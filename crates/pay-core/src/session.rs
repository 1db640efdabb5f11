//! # Checkout Session Types
//!
//! The descriptor sent to a provider when opening a hosted checkout, and the
//! session handle the provider returns.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code, as providers expect it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// A priced line on the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Currency of `unit_amount`
    pub currency: Currency,

    /// Product name shown to the customer
    pub name: String,

    /// Amount in smallest currency unit (cents for USD)
    pub unit_amount: i64,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    pub fn new(currency: Currency, name: impl Into<String>, unit_amount: i64, quantity: u32) -> Self {
        Self {
            currency,
            name: name.into(),
            unit_amount,
            quantity,
        }
    }

    /// Total for this line in smallest currency unit
    pub fn total(&self) -> i64 {
        self.unit_amount * self.quantity as i64
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    #[default]
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Everything a provider needs to open a checkout session.
///
/// Built per request and handed to the provider; nothing keeps it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub mode: CheckoutMode,

    /// Ordered line items
    pub line_items: Vec<LineItem>,

    /// Redirect after successful payment
    pub success_url: String,

    /// Redirect if the customer backs out
    pub cancel_url: String,
}

impl SessionDescriptor {
    /// One-time payment descriptor with no items yet
    pub fn payment(success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            mode: CheckoutMode::Payment,
            line_items: Vec::new(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Builder: append a line item
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }

    /// Sum of all line totals in smallest currency unit
    pub fn total(&self) -> i64 {
        self.line_items.iter().map(LineItem::total).sum()
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub id: String,

    /// URL to redirect customer to for payment
    pub url: String,
}
