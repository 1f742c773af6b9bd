//! HTTP client for the managed identity provider (a Cognito user pool).
//!
//! The four operations used here (`SignUp`, `InitiateAuth`, `ConfirmSignUp`,
//! `ResendConfirmationCode`) are app-client calls: a fixed client id, no
//! request signing. The wire shape is `POST <endpoint>/` with an
//! `X-Amz-Target` action header and an `application/x-amz-json-1.1` body.
//!
//! One remote call per operation: no retries, no timeouts beyond reqwest
//! defaults, no circuit breaking. Provider errors are relayed verbatim.

use crate::{cli::globals::GlobalArgs, error::Error};
use anyhow::Result;
use reqwest::{header::CONTENT_TYPE, Client};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{error, instrument};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

fn provider_error_message(json_response: &Value) -> &str {
    json_response
        .get("message")
        .or_else(|| json_response.get("Message"))
        .and_then(Value::as_str)
        .or_else(|| json_response.get("__type").and_then(Value::as_str))
        .unwrap_or("identity provider call failed")
}

#[derive(Debug, Clone)]
pub struct IdpClient {
    http: Client,
    endpoint: String,
    client_id: String,
}

impl IdpClient {
    /// Build the provider client from the process configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let http = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;

        Ok(Self {
            http,
            endpoint: globals.idp_url.clone(),
            client_id: globals.idp_client_id.clone(),
        })
    }

    /// Register a new account with the provider; the confirmation code is
    /// delivered out of band to the given email.
    ///
    /// # Errors
    /// Fails with `Error::Provider` on any remote failure, carrying the
    /// provider's message verbatim.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        username: &str,
        password: &SecretString,
        email: &str,
    ) -> Result<Value, Error> {
        self.call(
            "SignUp",
            json!({
                "ClientId": self.client_id,
                "Username": username,
                "Password": password.expose_secret(),
                "UserAttributes": [
                    {
                        "Name": "email",
                        "Value": email,
                    }
                ],
            }),
        )
        .await
    }

    /// Authenticate with username and password, relaying the provider's
    /// token payload untouched.
    ///
    /// # Errors
    /// Fails with `Error::Provider` on bad credentials or remote failure.
    #[instrument(skip(self, password))]
    pub async fn initiate_auth(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Value, Error> {
        self.call(
            "InitiateAuth",
            json!({
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": self.client_id,
                "AuthParameters": {
                    "USERNAME": username,
                    "PASSWORD": password.expose_secret(),
                },
            }),
        )
        .await
    }

    /// Confirm an account with the code delivered at sign-up.
    ///
    /// # Errors
    /// Fails with `Error::Provider` on an invalid or expired code.
    #[instrument(skip(self))]
    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<Value, Error> {
        self.call(
            "ConfirmSignUp",
            json!({
                "ClientId": self.client_id,
                "Username": username,
                "ConfirmationCode": code,
            }),
        )
        .await
    }

    /// Ask the provider to send a fresh confirmation code.
    ///
    /// # Errors
    /// Fails with `Error::Provider` on remote failure.
    #[instrument(skip(self))]
    pub async fn resend_confirmation_code(&self, username: &str) -> Result<Value, Error> {
        self.call(
            "ResendConfirmationCode",
            json!({
                "ClientId": self.client_id,
                "Username": username,
            }),
        )
        .await
    }

    async fn call(&self, action: &str, payload: Value) -> Result<Value, Error> {
        let body = serde_json::to_vec(&payload).map_err(|e| Error::Provider(e.to_string()))?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{action}"))
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let json_response: Value = response.json().await.unwrap_or_default();

            let message = provider_error_message(&json_response);

            error!("Identity provider {} failed: {}, {}", action, status, message);

            return Err(Error::Provider(message.to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Provider(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };

    fn target(headers: &HeaderMap) -> String {
        headers
            .get("x-amz-target")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    // the amz-json content type is not `application/json`, so the stub reads
    // the raw body instead of using the Json extractor
    async fn stub_provider(headers: HeaderMap, body: String) -> impl IntoResponse {
        let payload: Value = serde_json::from_str(&body).unwrap_or_default();
        match target(&headers).as_str() {
            "AWSCognitoIdentityProviderService.SignUp" => {
                if payload["Username"] == "taken" {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "__type": "UsernameExistsException",
                            "message": "User already exists",
                        })),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "UserConfirmed": false,
                        "UserSub": "8afcedd1-5ca4-4912-a8b0-4b5f9b6fdc14",
                        "ClientId": payload["ClientId"],
                    })),
                )
            }
            "AWSCognitoIdentityProviderService.InitiateAuth" => (
                StatusCode::OK,
                Json(json!({
                    "AuthenticationResult": {
                        "AccessToken": "access",
                        "RefreshToken": "refresh",
                        "TokenType": "Bearer",
                    },
                })),
            ),
            "AWSCognitoIdentityProviderService.ConfirmSignUp" => {
                if payload["ConfirmationCode"] == "123456" {
                    (StatusCode::OK, Json(json!({})))
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "__type": "CodeMismatchException",
                            "message": "Invalid verification code provided, please try again.",
                        })),
                    )
                }
            }
            "AWSCognitoIdentityProviderService.ResendConfirmationCode" => (
                StatusCode::OK,
                Json(json!({
                    "CodeDeliveryDetails": {
                        "Destination": "a***@x***",
                        "DeliveryMedium": "EMAIL",
                    },
                })),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({"__type": "UnknownOperationException"})),
            ),
        }
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/", post(stub_provider));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .expect("serve stub");
        });
        format!("http://{addr}")
    }

    fn client(endpoint: String) -> IdpClient {
        let globals = GlobalArgs::new(endpoint, "test-client-id".to_string());
        IdpClient::new(&globals).expect("build client")
    }

    #[tokio::test]
    async fn sign_up_relays_raw_payload() {
        let idp = client(spawn_stub().await);

        let payload = idp
            .sign_up("alice", &SecretString::from("Pw1!pw1!"), "a@x.com")
            .await
            .expect("sign up should succeed");

        assert_eq!(payload["UserConfirmed"], false);
        assert_eq!(
            payload["UserSub"],
            "8afcedd1-5ca4-4912-a8b0-4b5f9b6fdc14".to_string()
        );
        // the fixed app client id is attached to every call
        assert_eq!(payload["ClientId"], "test-client-id");
    }

    #[tokio::test]
    async fn sign_up_error_message_is_verbatim() {
        let idp = client(spawn_stub().await);

        let err = idp
            .sign_up("taken", &SecretString::from("Pw1!pw1!"), "t@x.com")
            .await
            .expect_err("duplicate username should fail");

        match err {
            Error::Provider(message) => assert_eq!(message, "User already exists"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initiate_auth_relays_tokens() {
        let idp = client(spawn_stub().await);

        let payload = idp
            .initiate_auth("alice", &SecretString::from("Pw1!pw1!"))
            .await
            .expect("login should succeed");

        assert_eq!(payload["AuthenticationResult"]["AccessToken"], "access");
        assert_eq!(payload["AuthenticationResult"]["RefreshToken"], "refresh");
    }

    #[tokio::test]
    async fn confirm_sign_up_checks_code() {
        let idp = client(spawn_stub().await);

        idp.confirm_sign_up("alice", "123456")
            .await
            .expect("valid code should confirm");

        let err = idp
            .confirm_sign_up("alice", "000000")
            .await
            .expect_err("wrong code should fail");
        match err {
            Error::Provider(message) => {
                assert_eq!(message, "Invalid verification code provided, please try again.");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resend_confirmation_code_relays_delivery_details() {
        let idp = client(spawn_stub().await);

        let payload = idp
            .resend_confirmation_code("alice")
            .await
            .expect("resend should succeed");

        assert_eq!(
            payload["CodeDeliveryDetails"]["DeliveryMedium"],
            "EMAIL".to_string()
        );
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_provider_error() {
        // nothing listens on this port
        let idp = client("http://127.0.0.1:9".to_string());

        let err = idp
            .resend_confirmation_code("alice")
            .await
            .expect_err("connection refused should fail");
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn error_message_extraction_prefers_message() {
        let body = json!({"__type": "SomeException", "message": "boom"});
        assert_eq!(provider_error_message(&body), "boom");

        let body = json!({"__type": "SomeException", "Message": "Boom"});
        assert_eq!(provider_error_message(&body), "Boom");

        let body = json!({"__type": "SomeException"});
        assert_eq!(provider_error_message(&body), "SomeException");

        let body = json!({});
        assert_eq!(provider_error_message(&body), "identity provider call failed");
    }
}
