//! Webhook Verification for Authsignal
//!
//! This crate checks that an incoming webhook was signed by Authsignal and
//! is recent, and only then decodes its body into a [`WebhookEvent`].
//!
//! # Features
//!
//! - **Signature Verification**: HMAC-SHA256 over `"{timestamp}.{body}"`
//! - **Key Rotation**: any of several `v2` signatures in one header may match
//! - **Replay Protection**: configurable tolerance window, 5 minutes by default
//! - **Typed Failures**: one [`WebhookError`] variant per rejected check
//!
//! # Example: Verifying a Webhook
//!
//! ```rust,no_run
//! use authsignal_webhooks::{WebhookError, WebhookVerifier};
//!
//! let verifier = WebhookVerifier::new("your-api-secret-key");
//!
//! // Raw request body and the `X-Signature-V2` header value
//! let payload = br#"{"version":1,"type":"email.created","data":{}}"#;
//! let signature_header = "t=1740016316,v2=89vWAaNuB+MoOqeOFdINSi6VRGlT1OkeJIi9PPZkk/8";
//!
//! match verifier.construct_event(payload, signature_header) {
//!     Ok(event) => println!("received {}", event.event_type()),
//!     Err(err) => {
//!         // Log the detail locally, answer the sender generically
//!         eprintln!("webhook rejected: {err}");
//!         let _status = err.status_code();
//!     }
//! }
//! ```
//!
//! # Example: Signing (sender side, tests)
//!
//! ```rust
//! use authsignal_webhooks::{WebhookSignature, WebhookVerifier};
//!
//! let payload = br#"{"a":1}"#;
//! let header = WebhookSignature::new("secret").sign(1740016316, payload);
//!
//! let verifier = WebhookVerifier::new("secret");
//! let event = verifier
//!     .construct_event_with_tolerance(payload, header.to_header_value().as_str(), 0)
//!     .unwrap();
//! assert_eq!(event.get("a"), Some(&serde_json::json!(1)));
//! ```

mod error;
mod event;
mod freshness;
mod header;
mod signature;
mod verifier;

pub use error::{ErrorKind, WebhookError};
pub use event::{WebhookEvent, decode, decode_as};
pub use freshness::{DEFAULT_TOLERANCE_MINUTES, check as check_freshness};
pub use header::{SIGNATURE_VERSION, SignatureHeader, TIMESTAMP_KEY};
pub use signature::{WebhookSignature, compute_signature, headers, matches};
pub use verifier::WebhookVerifier;

/// Re-exported so callers can hand over an already wrapped secret
pub use secrecy::SecretString;

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
