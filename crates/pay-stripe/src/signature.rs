//! # Webhook Signature Verification
//!
//! Stripe signs each delivery with HMAC-SHA256 over `"{t}.{raw body}"` and
//! sends the result in the `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1492774577,v1=5257a869e7ec...,v0=6ffbb59b2300...
//! ```
//!
//! Only `v1` entries are checked. Several `v1` entries may be present while a
//! secret is being rolled; any one matching is enough.

use hmac::{Hmac, Mac};
use pay_core::{PaymentError, PaymentResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature (lowercase, as `http::HeaderMap` stores it)
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Stripe's default tolerance for signature timestamps (5 minutes)
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Parsed `Stripe-Signature` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Decoded `v1` signatures. Entries that aren't valid hex are dropped.
    pub signatures: Vec<Vec<u8>>,
}

pub fn parse_signature_header(header: &str) -> PaymentResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => {
                if let Ok(sig) = hex::decode(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(PaymentError::WebhookVerificationFailed(
            "Unable to extract timestamp and signatures from header".to_string(),
        )),
    }
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex HMAC-SHA256 of `"{timestamp}.{payload}"`
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<String> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a complete `Stripe-Signature` header value.
///
/// Used by tests and local tooling to produce deliveries the way Stripe does.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<String> {
    Ok(format!(
        "t={},v1={}",
        timestamp,
        compute_signature(secret, timestamp, payload)?
    ))
}

/// Check `header` against the raw `payload` bytes.
///
/// `now` is the current unix time; the signature timestamp must be within
/// `tolerance_secs` of it. A tolerance of zero or less disables the check.
/// Returns the signed timestamp.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> PaymentResult<i64> {
    let parsed = parse_signature_header(header)?;
    let expected = signed_payload_mac(secret, parsed.timestamp, payload)?;

    // verify_slice compares in constant time
    let matched = parsed
        .signatures
        .iter()
        .any(|sig| expected.clone().verify_slice(sig).is_ok());

    if !matched {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if tolerance_secs > 0 && now.abs_diff(parsed.timestamp) > tolerance_secs as u64 {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(parsed.timestamp)
}
