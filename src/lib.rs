//! # sfsoql
//!
//! A Salesforce SOQL handler for Rust.
//!
//! Authenticates once with the OAuth 2.0 username-password flow, then runs
//! SOQL queries with every result page merged into one document, projects
//! results into columns, and updates or creates records.
//!
//! ## Security
//!
//! - Passwords, security tokens, consumer secrets and access tokens are
//!   redacted in Debug output
//! - Tracing spans skip credential parameters and query text
//! - Error messages are sanitized before they are stored
//!
//! ## Crates
//!
//! - **sfsoql-client** - HTTP transport, configuration, URL joining, escaping helpers
//! - **sfsoql-auth** - Credentials, credential sources, password-grant session
//! - **sfsoql-rest** - Query pipeline, column projection, record updates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfsoql::SoqlHandler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfsoql::Error> {
//!     // SF_LOGIN_ENDPOINT, SF_SERVICE_URL, SF_USERNAME, ... from the environment
//!     let handler = SoqlHandler::from_env().await?;
//!
//!     let table = handler
//!         .query_table("SELECT Id, Name FROM Account")
//!         .await?;
//!
//!     for column in table.to_nested() {
//!         println!("{}", column.join(", "));
//!     }
//!
//!     Ok(())
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

// Re-export all crates for convenient access
pub use sfsoql_auth as auth;
pub use sfsoql_client as client;
pub use sfsoql_rest as rest;

pub use sfsoql_auth::{CredentialSource, EnvSource, PasswordCredentials, Session};
pub use sfsoql_client::ClientConfig;
pub use sfsoql_rest::{CreateResult, Error, ErrorKind, QueryResult, Result, Table};

/// An authenticated handle for SOQL queries and record updates.
///
/// Construction authenticates; a handler without a bearer token cannot be
/// created. The token is kept for the handler's lifetime and never
/// refreshed. Calls are sent one at a time and query pages are fetched in
/// order.
#[derive(Debug, Clone)]
pub struct SoqlHandler {
    session: Session,
    rest: sfsoql_rest::SalesforceRestClient,
}

impl SoqlHandler {
    /// Authenticate with the given credentials.
    pub async fn connect(credentials: PasswordCredentials) -> Result<Self> {
        Self::connect_with_config(credentials, ClientConfig::default()).await
    }

    /// Authenticate with the given credentials and HTTP configuration.
    #[instrument(skip(credentials, config), fields(username = %credentials.username()))]
    pub async fn connect_with_config(
        credentials: PasswordCredentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::establish_with_config(credentials, config).await?;
        let rest = sfsoql_rest::SalesforceRestClient::from_session(&session);

        info!(
            service_url = %rest.service_url(),
            api_endpoint = %rest.api_endpoint(),
            "SOQL handler ready"
        );

        Ok(Self { session, rest })
    }

    /// Resolve credentials from a source, then authenticate.
    ///
    /// Every missing required field is reported in one configuration
    /// error, before any request is sent.
    pub async fn from_source(source: &impl CredentialSource) -> Result<Self> {
        let credentials = PasswordCredentials::resolve(source)?;
        Self::connect(credentials).await
    }

    /// Resolve credentials from `SF_*` environment variables, then authenticate.
    pub async fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource::default()).await
    }

    /// The authenticated session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The REST client bound to the session.
    pub fn rest(&self) -> &sfsoql_rest::SalesforceRestClient {
        &self.rest
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Run a query and return the merged result as pretty-printed JSON text.
    pub async fn query_string(&self, soql: &str) -> Result<String> {
        let merged = self.rest.query_merged(soql).await?;
        Ok(serde_json::to_string_pretty(&merged)?)
    }

    /// Run a query and return the merged result document.
    pub async fn query_json(&self, soql: &str) -> Result<Value> {
        self.rest.query_merged(soql).await
    }

    /// Run a query and return the merged result with typed records.
    pub async fn query_result<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        self.rest.query_result(soql).await
    }

    /// Run a query and project it onto the columns it selects.
    pub async fn query_table(&self, soql: &str) -> Result<Table> {
        self.rest.query_table(soql).await
    }

    /// Run a query and return one list per column, header first.
    pub async fn query_columns(&self, soql: &str) -> Result<Vec<Vec<String>>> {
        Ok(self.query_table(soql).await?.to_nested())
    }

    // =========================================================================
    // Record updates
    // =========================================================================

    /// Set one field on a record (XML body). Returns the response body.
    pub async fn patch_value(
        &self,
        record_type: &str,
        record_id: &str,
        field: &str,
        value: &str,
    ) -> Result<String> {
        self.rest
            .patch_value(record_type, record_id, field, value)
            .await
    }

    /// Update a record from a JSON object of field values.
    pub async fn patch_fields<T: Serialize>(
        &self,
        record_type: &str,
        record_id: &str,
        fields: &T,
    ) -> Result<()> {
        self.rest.patch_fields(record_type, record_id, fields).await
    }

    /// Create a record with one field set (XML body). Returns the response body.
    pub async fn post_value(&self, record_type: &str, field: &str, value: &str) -> Result<String> {
        self.rest.post_value(record_type, field, value).await
    }

    /// Create a record from a JSON object of field values.
    pub async fn post_fields<T: Serialize>(
        &self,
        record_type: &str,
        record: &T,
    ) -> Result<CreateResult> {
        self.rest.create(record_type, record).await
    }
}
