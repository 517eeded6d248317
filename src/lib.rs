// Authsignal - SDK for the Authsignal authentication platform
//
// This library verifies signed Authsignal webhooks and, with the `client`
// feature, calls the Authsignal server API.

// Re-export webhook verification
#[cfg(feature = "webhooks")]
pub use authsignal_webhooks::*;

// Re-export optional crates
#[cfg(feature = "webhooks")]
pub use authsignal_webhooks;

#[cfg(feature = "client")]
pub use authsignal_client;

// Prelude for common imports
pub mod prelude {
    #[cfg(feature = "webhooks")]
    pub use authsignal_webhooks::{
        SignatureHeader, WebhookError, WebhookEvent, WebhookSignature, WebhookVerifier,
    };

    #[cfg(feature = "client")]
    pub use authsignal_client::{
        AuthsignalClient, ClientConfig, ClientError, RetryConfig, TrackRequest,
        ValidateChallengeRequest,
    };
}
