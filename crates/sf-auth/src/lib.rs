//! # sfsoql-auth
//!
//! Salesforce OAuth 2.0 username-password authentication.
//!
//! ## Security
//!
//! - Passwords, security tokens, consumer secrets and access tokens are
//!   redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Authentication failure bodies are sanitized before they are stored
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfsoql_auth::{EnvSource, PasswordCredentials, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfsoql_auth::Error> {
//!     // SF_LOGIN_ENDPOINT, SF_USERNAME, ... from the environment
//!     let creds = PasswordCredentials::resolve(&EnvSource::default())?;
//!
//!     let session = Session::establish(creds).await?;
//!     println!("connected to {}", session.client().service_url());
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;
mod session;

pub use credentials::{
    field, CredentialSource, EnvSource, PasswordCredentials, PasswordCredentialsBuilder,
};
pub use error::{Error, ErrorKind, Result};
pub use oauth::{PasswordFlow, TokenResponse};
pub use session::Session;

/// Token endpoint for production orgs.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// Token endpoint for sandbox orgs.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com/services/oauth2/token";
