//! Error types for sf-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sf-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-auth operations.
///
/// Error messages are sanitized to prevent accidental credential exposure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if required construction fields were missing or invalid.
    pub fn is_config_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Config(_))
    }

    /// Returns true if the token exchange did not yield an access token.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication { .. })
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Required construction fields are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token endpoint answered without an access token.
    ///
    /// Displays the OAuth error when the body carried one, else the body.
    #[error(
        "Authentication failed (HTTP {status}): {}",
        .oauth_error.as_deref().unwrap_or(.body.as_str())
    )]
    Authentication {
        /// HTTP status of the token response.
        status: u16,
        /// OAuth `error`, joined with `error_description` when present.
        oauth_error: Option<String>,
        /// Sanitized response body.
        body: String,
    },

    /// HTTP error during authentication.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The token response was not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<sfsoql_client::Error> for Error {
    fn from(err: sfsoql_client::Error) -> Self {
        let kind = match &err.kind {
            sfsoql_client::ErrorKind::Config(msg) => ErrorKind::Config(msg.clone()),
            sfsoql_client::ErrorKind::InvalidUrl(msg) => {
                ErrorKind::Config(format!("Invalid URL: {}", msg))
            }
            sfsoql_client::ErrorKind::Json(msg) => ErrorKind::Json(msg.clone()),
            _ => {
                // Sanitize any potential credential exposure
                let message = err.to_string();
                if message.contains("Bearer") || message.contains("token") {
                    ErrorKind::Http("Client error (details redacted for security)".to_string())
                } else {
                    ErrorKind::Http(message)
                }
            }
        };
        Error::with_source(kind, err)
    }
}
