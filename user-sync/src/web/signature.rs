//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix, which signs each request using HMAC-SHA256.
//! Reference: https://docs.svix.com/receiving/verifying-payloads/how-manual
//!
//! The signed content is `{svix-id}.{svix-timestamp}.{body}`, keyed with the
//! base64-decoded part of the `whsec_` secret. `svix-signature` carries one or
//! more space-separated `v1,<base64 signature>` entries.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use super::headers::SvixHeaders;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Default allowed clock skew between Svix and us.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Webhook signing secret is not configured")]
    MissingSecret,

    #[error("Webhook signing secret is not valid base64")]
    InvalidSecret,

    #[error("Invalid Signature Headers")]
    InvalidTimestamp,

    #[error("Message timestamp too old")]
    TimestampTooOld,

    #[error("Message timestamp too new")]
    TimestampTooNew,

    #[error("No matching signature found")]
    NoMatchingSignature,
}

impl SignatureError {
    /// Status attached to the failure. Secret problems are ours, the rest are the caller's.
    pub fn status(&self) -> StatusCode {
        match self {
            SignatureError::MissingSecret | SignatureError::InvalidSecret => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Verifier keyed by one signing secret.
#[derive(Clone)]
pub struct Webhook {
    key: Vec<u8>,
    tolerance_secs: u64,
}

impl Webhook {
    /// Build a verifier from a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str) -> Result<Self, SignatureError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;

        if key.is_empty() {
            return Err(SignatureError::InvalidSecret);
        }

        Ok(Self {
            key,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        })
    }

    pub fn with_tolerance(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verify `payload` against the Svix headers using the current time.
    pub fn verify(&self, payload: &str, headers: &SvixHeaders) -> Result<(), SignatureError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.verify_at(payload, headers, now)
    }

    /// Verify `payload` as if the current time were `now` (Unix seconds).
    pub fn verify_at(
        &self,
        payload: &str,
        headers: &SvixHeaders,
        now: u64,
    ) -> Result<(), SignatureError> {
        let webhook_time: u64 = match headers.timestamp.trim().parse() {
            Ok(t) => t,
            Err(_) => {
                warn!(timestamp = %headers.timestamp, "svix_signature_invalid_timestamp");
                return Err(SignatureError::InvalidTimestamp);
            }
        };

        if now > webhook_time && now - webhook_time > self.tolerance_secs {
            warn!(
                webhook_time = webhook_time,
                current_time = now,
                tolerance_secs = self.tolerance_secs,
                "svix_signature_stale"
            );
            return Err(SignatureError::TimestampTooOld);
        }

        if webhook_time > now && webhook_time - now > self.tolerance_secs {
            warn!(
                webhook_time = webhook_time,
                current_time = now,
                tolerance_secs = self.tolerance_secs,
                "svix_signature_from_future"
            );
            return Err(SignatureError::TimestampTooNew);
        }

        let expected = self.compute(&headers.id, webhook_time, payload)?;

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .any(|(_, signature)| constant_time_compare(&expected, signature));

        if !matched {
            warn!(
                msg_id = %headers.id,
                candidates = headers.signature.split_whitespace().count(),
                "svix_signature_mismatch"
            );
            return Err(SignatureError::NoMatchingSignature);
        }

        Ok(())
    }

    /// Produce a `v1,<signature>` value for the given message.
    pub fn sign(&self, msg_id: &str, timestamp: u64, payload: &str) -> Result<String, SignatureError> {
        let signature = self.compute(msg_id, timestamp, payload)?;
        Ok(format!("{},{}", SIGNATURE_VERSION, signature))
    }

    fn compute(&self, msg_id: &str, timestamp: u64, payload: &str) -> Result<String, SignatureError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| SignatureError::InvalidSecret)?;

        mac.update(format!("{}.{}.{}", msg_id, timestamp, payload).as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
