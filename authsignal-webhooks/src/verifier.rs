//! Verifier for incoming Authsignal webhooks

use crate::signature::{self, headers};
use crate::{
    Result, SignatureHeader, WebhookError, WebhookEvent, WebhookSignature, event, freshness,
};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Verifies signed webhook requests and decodes their payload
///
/// The secret is fixed at construction. Verification holds no mutable
/// state, so one verifier can be shared across threads.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    signature: WebhookSignature,
    tolerance_minutes: i64,
}

impl WebhookVerifier {
    /// Create a new verifier with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self::from_secret(SecretString::new(secret.into()))
    }

    /// Create a verifier from an already wrapped secret
    pub fn from_secret(secret: SecretString) -> Self {
        Self {
            signature: WebhookSignature::from_secret(secret),
            tolerance_minutes: freshness::DEFAULT_TOLERANCE_MINUTES,
        }
    }

    /// Set the default tolerance in minutes (zero or less disables it)
    pub fn with_tolerance(mut self, minutes: i64) -> Self {
        self.tolerance_minutes = minutes;
        self
    }

    /// Default tolerance in minutes
    pub fn tolerance_minutes(&self) -> i64 {
        self.tolerance_minutes
    }

    /// Verify a webhook and decode its event
    ///
    /// Checks run in order and the first failure is returned: header format,
    /// timestamp freshness, signature match, then JSON decoding. The payload
    /// must be the raw request body exactly as received.
    pub fn construct_event<'a>(
        &self,
        payload: &[u8],
        signature_header: impl Into<Option<&'a str>>,
    ) -> Result<WebhookEvent> {
        self.construct_event_with_tolerance(payload, signature_header, self.tolerance_minutes)
    }

    /// Same as [`construct_event`](Self::construct_event) with an explicit tolerance
    pub fn construct_event_with_tolerance<'a>(
        &self,
        payload: &[u8],
        signature_header: impl Into<Option<&'a str>>,
        tolerance_minutes: i64,
    ) -> Result<WebhookEvent> {
        self.construct_event_at(
            payload,
            signature_header,
            tolerance_minutes,
            chrono::Utc::now().timestamp(),
        )
    }

    /// Same as [`construct_event_with_tolerance`](Self::construct_event_with_tolerance)
    /// against a caller-supplied current time (Unix seconds)
    pub fn construct_event_at<'a>(
        &self,
        payload: &[u8],
        signature_header: impl Into<Option<&'a str>>,
        tolerance_minutes: i64,
        now: i64,
    ) -> Result<WebhookEvent> {
        self.verify_at(payload, signature_header.into(), tolerance_minutes, now)?;

        let event = event::decode(payload).inspect_err(|e| {
            warn!(kind = %e.kind(), error = %e, "Verified webhook payload could not be decoded");
        })?;

        debug!(
            event_type = event.event_type(),
            event_id = event.id.as_deref().unwrap_or_default(),
            "Webhook verified"
        );
        Ok(event)
    }

    /// Verify a webhook and decode its payload into a caller-defined type
    pub fn construct_event_as<'a, T: DeserializeOwned>(
        &self,
        payload: &[u8],
        signature_header: impl Into<Option<&'a str>>,
    ) -> Result<T> {
        self.verify_at(
            payload,
            signature_header.into(),
            self.tolerance_minutes,
            chrono::Utc::now().timestamp(),
        )?;
        event::decode_as(payload)
    }

    /// Verify and decode using the signature header from a request's headers
    ///
    /// Header names are matched case-insensitively. `X-Signature-V2` is
    /// preferred over the legacy `Authsignal-Signature`.
    pub fn construct_event_from_headers(
        &self,
        payload: &[u8],
        request_headers: &HashMap<String, String>,
    ) -> Result<WebhookEvent> {
        let signature_header = find_header(request_headers, headers::SIGNATURE)
            .or_else(|| find_header(request_headers, headers::SIGNATURE_LEGACY));

        self.construct_event(payload, signature_header)
    }

    /// Run every check except decoding and return the parsed header
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        tolerance_minutes: i64,
        now: i64,
    ) -> Result<SignatureHeader> {
        self.run_checks(payload, signature_header, tolerance_minutes, now)
            .inspect_err(|e| {
                warn!(kind = %e.kind(), error = %e, "Webhook rejected");
            })
    }

    fn run_checks(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        tolerance_minutes: i64,
        now: i64,
    ) -> Result<SignatureHeader> {
        let parsed = SignatureHeader::parse(signature_header)?;

        freshness::check(parsed.timestamp, tolerance_minutes, now)?;

        let expected = self.signature.compute(parsed.timestamp, payload);
        if !signature::matches(&expected, &parsed.signatures) {
            return Err(WebhookError::SignatureMismatch);
        }

        Ok(parsed)
    }
}

fn find_header<'h>(request_headers: &'h HashMap<String, String>, name: &str) -> Option<&'h str> {
    request_headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
