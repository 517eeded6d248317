//! Integration tests for authsignal-client

use authsignal_client::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("secret:")
const BASIC_AUTH: &str = "Basic c2VjcmV0Og==";

fn client_for(server: &MockServer) -> AuthsignalClient {
    let config = ClientConfig::builder()
        .api_secret_key("secret")
        .api_url(server.uri())
        .build()
        .unwrap();
    AuthsignalClient::new(config).unwrap()
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isEnrolled": false,
            "url": "https://www.example.com",
            "accessToken": "xxx"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server).get_user("1", None).await.unwrap();

    assert!(!user.is_enrolled);
    assert_eq!(user.extra.get("url"), Some(&json!("https://www.example.com")));
}

#[tokio::test]
async fn test_get_user_with_redirect_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(query_param("redirectUrl", "https://example.com/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isEnrolled": true,
            "url": "https://example.com/challenge"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server)
        .get_user("1", Some("https://example.com/callback"))
        .await
        .unwrap();

    assert!(user.is_enrolled);
}

#[tokio::test]
async fn test_update_user_camelizes_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/1"))
        .and(body_json(json!({
            "email": "test@example.com",
            "phoneNumber": "+64270000000",
            "custom": { "nested_key": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "test@example.com",
            "phoneNumber": "+64270000000",
            "custom": { "nested_key": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let attributes = client_for(&server)
        .update_user(
            "1",
            json!({
                "email": "test@example.com",
                "phone_number": "+64270000000",
                "custom": { "nested_key": true }
            }),
        )
        .await
        .unwrap();

    assert_eq!(attributes.phone_number.as_deref(), Some("+64270000000"));
}

#[tokio::test]
async fn test_delete_user() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let response = client_for(&server).delete_user("1").await.unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_track() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/123/actions/signIn"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_json(json!({
            "idempotencyKey": "xxxx-xxxx",
            "redirectUrl": "https://wwww.example.com",
            "email": "test@example.com",
            "ipAddress": "1.1.1.1",
            "custom": { "it_could_be_a_bool": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "ALLOW",
            "idempotencyKey": "f7f6ff4c-600f-4d61-99a2-b1157fe43777",
            "ruleIds": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = TrackRequest::new("123", "signIn").with_attributes(json!({
        "idempotency_key": "xxxx-xxxx",
        "redirect_url": "https://wwww.example.com",
        "email": "test@example.com",
        "ip_address": "1.1.1.1",
        "custom": { "it_could_be_a_bool": true }
    }));

    let response = client_for(&server).track(&request).await.unwrap();

    assert_eq!(response.state, ActionState::Allow);
    assert_eq!(response.idempotency_key, "f7f6ff4c-600f-4d61-99a2-b1157fe43777");
    assert!(response.rule_ids.is_empty());
}

#[tokio::test]
async fn test_get_and_update_action() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/123/actions/signIn/key%201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "CHALLENGE_REQUIRED",
            "createdAt": "2022-07-25T03:31:36.219Z",
            "ruleIds": ["rule-1"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/123/actions/signIn/key%201"))
        .and(body_json(json!({ "state": "REVIEW_SUCCEEDED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "REVIEW_SUCCEEDED"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let action = client.get_action("123", "signIn", "key 1").await.unwrap();
    assert_eq!(action.state, ActionState::ChallengeRequired);
    assert_eq!(action.rule_ids, vec!["rule-1"]);

    let action = client
        .update_action("123", "signIn", "key 1", json!({ "state": "REVIEW_SUCCEEDED" }))
        .await
        .unwrap();
    assert!(action.state.is_allowed());
}

#[tokio::test]
async fn test_validate_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate"))
        .and(body_json(json!({ "token": "challenge-token", "userId": "123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isValid": true,
            "state": "CHALLENGE_SUCCEEDED",
            "userId": "123",
            "verificationMethod": "SMS"
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .validate_challenge(&ValidateChallengeRequest::new("challenge-token").with_user_id("123"))
        .await
        .unwrap();

    assert!(response.is_valid);
    assert_eq!(response.state, Some(ActionState::ChallengeSucceeded));
    assert_eq!(response.verification_method.as_deref(), Some("SMS"));
}

#[tokio::test]
async fn test_enroll_verified_authenticator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/1/authenticators"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_json(json!({ "oobChannel": "SMS", "phoneNumber": "+64270000000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authenticator": {
                "userAuthenticatorId": "9b2cfd40-7df2-4658-852d-a0c3456e5a2e",
                "authenticatorType": "OOB",
                "isDefault": true,
                "phoneNumber": "+64270000000",
                "createdAt": "2022-07-25T03:31:36.219Z",
                "oobChannel": "SMS"
            },
            "recoveryCodes": ["xxxx"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .enroll_verified_authenticator(
            "1",
            json!({ "oob_channel": "SMS", "phone_number": "+64270000000" }),
        )
        .await
        .unwrap();

    assert_eq!(
        response.authenticator.user_authenticator_id,
        "9b2cfd40-7df2-4658-852d-a0c3456e5a2e"
    );
    assert!(response.authenticator.is_default);
    assert_eq!(response.recovery_codes, vec!["xxxx"]);
}

#[tokio::test]
async fn test_delete_authenticator_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/1/authenticators/auth-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .delete_authenticator("1", "auth-1")
        .await
        .unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_delete_user_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let response = client_for(&server).delete_user("1").await.unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "not_found",
            "errorDescription": "User not found"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_user("missing", None).await.unwrap_err();

    match err {
        ClientError::Api {
            status,
            error_code,
            error_description,
        } => {
            assert_eq!(status, 404);
            assert_eq!(error_code.as_deref(), Some("not_found"));
            assert_eq!(error_description.as_deref(), Some("User not found"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_error_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_user("1", None).await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_user("1", None).await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_retry_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_secret_key("secret")
        .api_url(server.uri())
        .retry(RetryConfig::constant(3, Duration::from_millis(1)))
        .build()
        .unwrap();
    let client = AuthsignalClient::new(config).unwrap();

    let err = client.get_user("1", None).await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_retry_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isEnrolled": true })))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_secret_key("secret")
        .api_url(server.uri())
        .retry(RetryConfig::immediate(2))
        .debug(true)
        .build()
        .unwrap();
    let client = AuthsignalClient::new(config).unwrap();

    let user = client.get_user("1", None).await.unwrap();
    assert!(user.is_enrolled);
}

#[test]
fn test_config_from_env() {
    unsafe {
        std::env::set_var(ENV_API_SECRET_KEY, "env-secret");
        std::env::set_var(ENV_API_URL, "http://localhost:8080");
        std::env::set_var(ENV_RETRY, "true");
    }

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.api_url, "http://localhost:8080");
    assert!(config.retry.is_some());
    assert!(!config.debug);

    unsafe {
        std::env::remove_var(ENV_API_SECRET_KEY);
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_RETRY);
    }
}
