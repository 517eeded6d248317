//! Fuzz target for the full verification pipeline.
//!
//! Arbitrary payloads and headers must be rejected or accepted without
//! panicking, and a freshly signed payload must always verify.

#![no_main]

use arbitrary::Arbitrary;
use authsignal_webhooks::{WebhookError, WebhookSignature, WebhookVerifier};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzWebhook {
    secret: String,
    payload: Vec<u8>,
    header: Option<String>,
    timestamp: i64,
    tolerance_minutes: i64,
    now: i64,
}

fuzz_target!(|data: FuzzWebhook| {
    let verifier = WebhookVerifier::new(data.secret.clone());

    let _ = verifier.construct_event_at(
        &data.payload,
        data.header.as_deref(),
        data.tolerance_minutes,
        data.now,
    );

    if data.timestamp == -1 {
        return;
    }

    let header = WebhookSignature::new(data.secret)
        .sign(data.timestamp, &data.payload)
        .to_header_value();

    match verifier.construct_event_at(&data.payload, header.as_str(), 0, data.now) {
        Ok(_) | Err(WebhookError::PayloadDecodeError(_)) => {}
        Err(e) => panic!("signed payload rejected: {e}"),
    }
});
