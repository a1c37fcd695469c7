//! Error types for sf-rest.

/// Result type alias for sf-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for REST operations.
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

    /// HTTP status of the failed call, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Client { status, .. } => *status,
            ErrorKind::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if a response body could not be parsed.
    pub fn is_parse_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Json(_))
    }

    /// Returns true if the SOQL text has no usable `SELECT ... FROM` column list.
    pub fn is_malformed_query(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedQuery(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The server answered with a failure status, or the call failed.
    #[error("{message}")]
    Client {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Sanitized description.
        message: String,
    },

    /// The token exchange failed.
    #[error("Authentication failed (HTTP {status}): {message}")]
    Auth {
        /// HTTP status of the token response.
        status: u16,
        /// OAuth error summary, or the sanitized response body.
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A response body was not the JSON document expected.
    #[error("JSON error: {0}")]
    Json(String),

    /// Column names could not be read from the query text.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// A caller-supplied name cannot be used in a request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Construction inputs were missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sfsoql_client::Error> for Error {
    fn from(err: sfsoql_client::Error) -> Self {
        use sfsoql_client::ErrorKind as Client;

        let kind = match &err.kind {
            Client::Json(msg) => ErrorKind::Json(msg.clone()),
            Client::Config(msg) => ErrorKind::Config(msg.clone()),
            Client::InvalidUrl(msg) => ErrorKind::Config(format!("Invalid URL: {}", msg)),
            Client::Timeout => ErrorKind::Timeout,
            Client::Connection(msg) => ErrorKind::Connection(msg.clone()),
            _ => ErrorKind::Client {
                status: err.status(),
                message: err.to_string(),
            },
        };
        Error::with_source(kind, err)
    }
}

impl From<sfsoql_auth::Error> for Error {
    fn from(err: sfsoql_auth::Error) -> Self {
        use sfsoql_auth::ErrorKind as Auth;

        let kind = match &err.kind {
            Auth::Config(msg) => ErrorKind::Config(msg.clone()),
            Auth::Json(msg) => ErrorKind::Json(msg.clone()),
            Auth::Authentication {
                status,
                oauth_error,
                body,
            } => ErrorKind::Auth {
                status: *status,
                message: oauth_error.clone().unwrap_or_else(|| body.clone()),
            },
            Auth::Http(msg) | Auth::Other(msg) => ErrorKind::Client {
                status: None,
                message: msg.clone(),
            },
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
