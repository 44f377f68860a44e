//! Webhook signature verification.
//!
//! Studio signs callbacks with HMAC-SHA256 over `{timestamp}:{payload}`,
//! keyed by the account's webhook secret, and sends the standard base64 of
//! the raw digest.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::error::{StudioError, StudioResult};

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, payload: &str, timestamp: &str) -> StudioResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StudioError::config(format!("Invalid HMAC key: {}", e)))?;
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Compute the signature Studio sends for a callback.
pub fn sign_payload(secret: &str, payload: &str, timestamp: &str) -> StudioResult<String> {
    let mac = keyed_mac(secret, payload, timestamp)?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check a callback signature.
///
/// Returns true iff `signature` is the base64 HMAC-SHA256 of
/// `{timestamp}:{payload}` under `secret`. The digest comparison is
/// constant-time; a signature that is not valid base64 never matches.
pub fn verify_signature(secret: &str, payload: &str, timestamp: &str, signature: &str) -> bool {
    let Ok(provided) = STANDARD.decode(signature) else {
        return false;
    };

    keyed_mac(secret, payload, timestamp)
        .map(|mac| mac.verify_slice(&provided).is_ok())
        .unwrap_or(false)
}

/// Verifies callbacks for one webhook secret, optionally rejecting stale
/// timestamps.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: Option<Duration>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[redacted]")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: None,
        }
    }

    /// Reject timestamps (Unix seconds) further than `tolerance` from now.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn verify(&self, payload: &str, timestamp: &str, signature: &str) -> bool {
        self.verify_at(payload, timestamp, signature, chrono::Utc::now().timestamp())
    }

    /// Verify against an explicit current time (Unix seconds).
    pub fn verify_at(&self, payload: &str, timestamp: &str, signature: &str, now: i64) -> bool {
        if let Some(tolerance) = self.tolerance {
            let Ok(sent_at) = timestamp.trim().parse::<i64>() else {
                debug!(timestamp, "Webhook timestamp is not a Unix time");
                return false;
            };
            let age = now.saturating_sub(sent_at).unsigned_abs();
            if age > tolerance.as_secs() {
                debug!(age_secs = age, "Webhook timestamp outside tolerance");
                return false;
            }
        }

        verify_signature(&self.secret, payload, timestamp, signature)
    }
}
