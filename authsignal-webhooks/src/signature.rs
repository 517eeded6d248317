//! Webhook signature computation and matching

use crate::SignatureHeader;
use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks payloads with a shared secret
#[derive(Debug, Clone)]
pub struct WebhookSignature {
    secret: SecretString,
}

impl WebhookSignature {
    /// Create a new signature utility with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Create a signature utility from an already wrapped secret
    pub fn from_secret(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Compute the `v2` signature for a payload signed at `timestamp`
    pub fn compute(&self, timestamp: i64, payload: &[u8]) -> String {
        compute_signature(self.secret.expose_secret().as_bytes(), timestamp, payload)
    }

    /// Build a complete signature header the way the sender does
    pub fn sign(&self, timestamp: i64, payload: &[u8]) -> SignatureHeader {
        SignatureHeader {
            timestamp,
            signatures: vec![self.compute(timestamp, payload)],
        }
    }

    /// Sign with the current time
    pub fn sign_now(&self, payload: &[u8]) -> SignatureHeader {
        self.sign(chrono::Utc::now().timestamp(), payload)
    }
}

/// HMAC-SHA256 over `"{timestamp}.{payload}"`, base64 without padding
///
/// The payload bytes are fed to the MAC untouched. Re-serializing or
/// normalizing the JSON would change the digest.
pub fn compute_signature(secret: &[u8], timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take any size key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    STANDARD_NO_PAD.encode(mac.finalize().into_bytes())
}

/// True if any candidate equals `expected`
///
/// Every candidate is compared in constant time and the scan never stops
/// early, so timing does not reveal which candidate matched.
pub fn matches<S: AsRef<str>>(expected: &str, candidates: &[S]) -> bool {
    let mut found = subtle::Choice::from(0u8);
    for candidate in candidates {
        found |= constant_time_compare(expected, candidate.as_ref());
    }
    found.into()
}

fn constant_time_compare(a: &str, b: &str) -> subtle::Choice {
    // ct_eq on slices of different length is already false
    a.as_bytes().ct_eq(b.as_bytes())
}

/// Header names used by Authsignal webhook requests
pub mod headers {
    /// The signature header name
    pub const SIGNATURE: &str = "X-Signature-V2";

    /// Header name used by older integrations
    pub const SIGNATURE_LEGACY: &str = "Authsignal-Signature";
}
