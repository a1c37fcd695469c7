//! OAuth 2.0 username-password flow.
//!
//! A single form-encoded POST to the login endpoint. The response counts as
//! a success when its JSON body carries an `access_token`; anything else is
//! an authentication failure carrying the HTTP status and sanitized body.

use serde::{Deserialize, Serialize};
use sfsoql_client::{sanitize_error_message, SfHttpClient};
use tracing::{info, instrument};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Token response from the password grant.
///
/// The access token is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token used as the bearer token for all later calls.
    pub access_token: String,
    /// Instance URL reported by the login server.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Identity URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Issued-at timestamp, milliseconds since the epoch as a string.
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// OAuth error body, e.g. `{"error":"invalid_grant","error_description":"authentication failure"}`.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Performs the username-password token exchange.
#[derive(Clone)]
pub struct PasswordFlow {
    http: SfHttpClient,
}

impl std::fmt::Debug for PasswordFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordFlow").finish_non_exhaustive()
    }
}

impl PasswordFlow {
    /// Create a flow that sends its request through `http`.
    pub fn new(http: SfHttpClient) -> Self {
        Self { http }
    }

    /// The transport used for the exchange.
    pub fn http(&self) -> &SfHttpClient {
        &self.http
    }

    /// Exchange the credentials for an access token.
    ///
    /// Credentials are not logged; the span only records the username.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn authenticate(&self, credentials: &PasswordCredentials) -> Result<TokenResponse> {
        let password = credentials.password_with_token();
        let request = self.http.post(credentials.login_endpoint()).form([
            ("grant_type", "password"),
            ("client_id", credentials.consumer_key()),
            ("client_secret", credentials.consumer_secret()),
            ("username", credentials.username()),
            ("password", password.as_str()),
        ]);

        let response = self.http.send_raw(request).await?;
        let status = response.status();
        let body = response.text().await?;

        let token = parse_token_response(status, &body)?;

        info!(
            username = %credentials.username(),
            consumer_key = %credentials.consumer_key(),
            status,
            "Access token received"
        );

        Ok(token)
    }
}

/// Decide the outcome of a token response from its status and body.
fn parse_token_response(status: u16, body: &str) -> Result<TokenResponse> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        Error::with_source(
            ErrorKind::Json(format!(
                "token response (HTTP {}) is not valid JSON: {}",
                status, e
            )),
            e,
        )
    })?;

    let has_token = value
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .is_some();

    if has_token {
        return Ok(serde_json::from_value(value)?);
    }

    let oauth_error = match serde_json::from_value::<OAuthErrorResponse>(value) {
        Ok(OAuthErrorResponse {
            error,
            error_description: Some(description),
        }) => Some(format!("{} - {}", error, description)),
        Ok(OAuthErrorResponse { error, .. }) => Some(error),
        Err(_) => None,
    };

    Err(Error::new(ErrorKind::Authentication {
        status,
        oauth_error: oauth_error.map(|summary| sanitize_error_message(&summary)),
        body: sanitize_error_message(body),
    }))
}
