//! # Authsignal Client
//!
//! Async client for the Authsignal server API, sharing its secret key with
//! the webhook verifier.
//!
//! ## Features
//!
//! - **Users**: get, update and delete users
//! - **Actions**: track actions, read and update their state
//! - **Challenges**: validate challenge tokens
//! - **Authenticators**: enroll verified authenticators, remove authenticators
//! - **Retries**: optional retry with backoff on 429 / 5xx and connection errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use authsignal_client::{AuthsignalClient, ClientConfig, TrackRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AuthsignalClient::new(ClientConfig::new("your-api-secret-key"))?;
//!
//!     let response = client
//!         .track(&TrackRequest::new("user-123", "signIn").with_attributes(serde_json::json!({
//!             "redirect_url": "https://example.com/callback",
//!             "ip_address": "1.1.1.1"
//!         })))
//!         .await?;
//!
//!     println!("state: {:?}", response.state);
//!     Ok(())
//! }
//! ```
//!
//! ## Webhooks
//!
//! ```rust,no_run
//! use authsignal_client::{AuthsignalClient, ClientConfig};
//!
//! # fn handle(body: &[u8], signature: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
//! let client = AuthsignalClient::new(ClientConfig::new("your-api-secret-key"))?;
//! let event = client.webhook().construct_event(body, signature)?;
//! println!("{}", event.event_type());
//! # Ok(())
//! # }
//! ```

mod case;
mod client;
mod config;
mod error;
mod retry;
mod types;

pub use case::{camelize_keys, snake_to_camel};
pub use client::AuthsignalClient;
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_API_URL, ENV_API_SECRET_KEY, ENV_API_URL,
    ENV_DEBUG, ENV_RETRY,
};
pub use error::{ClientError, Result};
pub use retry::{BackoffStrategy, RetryConfig};
pub use types::{
    ActionResponse, ActionState, DeleteResponse, EnrollVerifiedAuthenticatorResponse,
    TrackRequest, TrackResponse, UserAttributes, UserAuthenticator, UserResponse,
    ValidateChallengeRequest, ValidateChallengeResponse,
};

/// Prelude for common imports.
///
/// ```
/// use authsignal_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::AuthsignalClient;
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::error::{ClientError, Result};
    pub use crate::retry::{BackoffStrategy, RetryConfig};
    pub use crate::types::{ActionState, TrackRequest, ValidateChallengeRequest};
    pub use authsignal_webhooks::{WebhookError, WebhookEvent, WebhookVerifier};
}
