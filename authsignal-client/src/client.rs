//! Authsignal API client implementation.

use crate::case::camelize_keys;
use crate::types::ApiErrorBody;
use crate::{
    ActionResponse, ClientConfig, ClientError, DeleteResponse,
    EnrollVerifiedAuthenticatorResponse, Result, TrackRequest, TrackResponse, UserAttributes,
    UserResponse, ValidateChallengeRequest, ValidateChallengeResponse,
};
use authsignal_webhooks::WebhookVerifier;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Client for the Authsignal server API.
#[derive(Debug, Clone)]
pub struct AuthsignalClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
}

impl AuthsignalClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let base_url = Url::parse(&config.api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "api_url cannot be used as a base URL: {}",
                config.api_url
            )));
        }

        Ok(Self {
            inner,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Create a client from `AUTHSIGNAL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A webhook verifier keyed with this client's secret.
    pub fn webhook(&self) -> WebhookVerifier {
        WebhookVerifier::from_secret(self.config.api_secret_key.clone())
    }

    /// Get a user's enrollment status and profile.
    ///
    /// `redirect_url` is passed on as the `redirectUrl` query parameter.
    pub async fn get_user(
        &self,
        user_id: &str,
        redirect_url: Option<&str>,
    ) -> Result<UserResponse> {
        let mut url = self.url(&["users", user_id])?;
        if let Some(redirect_url) = redirect_url {
            url.query_pairs_mut()
                .append_pair("redirectUrl", redirect_url);
        }
        self.send(Method::GET, url, None).await
    }

    /// Create or update a user's attributes.
    pub async fn update_user(&self, user_id: &str, attributes: Value) -> Result<UserAttributes> {
        self.request(
            Method::POST,
            &["users", user_id],
            Some(camelize_keys(attributes)),
        )
        .await
    }

    /// Delete a user and their authenticators.
    pub async fn delete_user(&self, user_id: &str) -> Result<DeleteResponse> {
        self.request(Method::DELETE, &["users", user_id], None).await
    }

    /// Get the state of a tracked action.
    pub async fn get_action(
        &self,
        user_id: &str,
        action: &str,
        idempotency_key: &str,
    ) -> Result<ActionResponse> {
        self.request(
            Method::GET,
            &["users", user_id, "actions", action, idempotency_key],
            None,
        )
        .await
    }

    /// Update a tracked action, e.g. `{"state": "REVIEW_SUCCEEDED"}`.
    pub async fn update_action(
        &self,
        user_id: &str,
        action: &str,
        idempotency_key: &str,
        attributes: Value,
    ) -> Result<ActionResponse> {
        self.request(
            Method::PATCH,
            &["users", user_id, "actions", action, idempotency_key],
            Some(camelize_keys(attributes)),
        )
        .await
    }

    /// Track an action and get the rules outcome.
    pub async fn track(&self, request: &TrackRequest) -> Result<TrackResponse> {
        self.request(
            Method::POST,
            &["users", &request.user_id, "actions", &request.action],
            Some(camelize_keys(request.attributes.clone())),
        )
        .await
    }

    /// Validate a challenge token returned by a pre-built UI or client SDK.
    pub async fn validate_challenge(
        &self,
        request: &ValidateChallengeRequest,
    ) -> Result<ValidateChallengeResponse> {
        let body = serde_json::to_value(request)?;
        self.request(Method::POST, &["validate"], Some(body)).await
    }

    /// Enroll an authenticator whose ownership was already verified.
    pub async fn enroll_verified_authenticator(
        &self,
        user_id: &str,
        attributes: Value,
    ) -> Result<EnrollVerifiedAuthenticatorResponse> {
        self.request(
            Method::POST,
            &["users", user_id, "authenticators"],
            Some(camelize_keys(attributes)),
        )
        .await
    }

    /// Remove one of a user's authenticators.
    pub async fn delete_authenticator(
        &self,
        user_id: &str,
        user_authenticator_id: &str,
    ) -> Result<DeleteResponse> {
        self.request(
            Method::DELETE,
            &["users", user_id, "authenticators", user_authenticator_id],
            None,
        )
        .await
    }

    /// Build a URL from percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("api_url cannot be used as a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<T> {
        let url = self.url(segments)?;
        self.send(method, url, body).await
    }

    /// Execute a request, retrying when configured.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T> {
        let mut attempt = 0;

        loop {
            debug!(method = %method, path = url.path(), attempt = attempt + 1, "Authsignal request");

            match self.execute_once(&method, &url, body.as_ref()).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if let Some(retry) = &self.config.retry
                        && retry.should_retry(attempt, &e)
                    {
                        let delay = retry.delay_for_attempt(attempt);
                        debug!(
                            attempt = attempt + 1,
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying Authsignal request"
                        );
                        attempt += 1;
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    warn!(method = %method, path = url.path(), error = %e, "Authsignal request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn execute_once<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<T> {
        let mut request = self
            .inner
            .request(method.clone(), url.clone())
            .basic_auth(self.config.api_secret_key.expose_secret(), None::<&str>)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            if self.config.debug {
                debug!(body = %body, "Authsignal request body");
            }
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if self.config.debug {
            debug!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&bytes),
                "Authsignal response body"
            );
        }

        if !status.is_success() {
            let error: ApiErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                error_code: error.error,
                error_description: error.error_description,
            });
        }

        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Object(Map::new()))?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
