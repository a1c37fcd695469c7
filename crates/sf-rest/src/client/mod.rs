//! Salesforce REST API client.
//!
//! This client wraps `SalesforceClient` from `sfsoql-client` and provides
//! the SOQL query pipeline and record mutations.

use sfsoql_auth::Session;
use sfsoql_client::{ClientConfig, SalesforceClient};

use crate::error::Result;

mod crud;
mod query;

/// Salesforce REST API client.
///
/// Provides:
/// - SOQL queries with pagination merged into one result
/// - Column projection of query results
/// - PATCH/POST of record fields as XML or JSON
///
/// # Example
///
/// ```rust,ignore
/// use sfsoql_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::new(
///     "https://myorg.my.salesforce.com",
///     "/services/data/v62.0/",
///     "access_token_here",
/// )?;
///
/// // Query, all pages merged
/// let merged = client.query_merged("SELECT Id, Name FROM Account").await?;
///
/// // Tabular view
/// let table = client.query_table("SELECT Id, Name FROM Account").await?;
///
/// // Update one field
/// client.patch_value("Account", "001xx000003DGb2AAG", "Name", "Updated").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesforceRestClient {
    client: SalesforceClient,
}

impl SalesforceRestClient {
    /// Create a new REST client for a service URL, API endpoint and access token.
    pub fn new(
        service_url: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let client = SalesforceClient::new(service_url, api_endpoint, access_token)?;
        Ok(Self { client })
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(
        service_url: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client =
            SalesforceClient::with_config(service_url, api_endpoint, access_token, config)?;
        Ok(Self { client })
    }

    /// Create a REST client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self { client }
    }

    /// Create a REST client that shares an authenticated session's transport.
    pub fn from_session(session: &Session) -> Self {
        Self::from_client(session.client().clone())
    }

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    /// Get the service URL.
    pub fn service_url(&self) -> &str {
        self.client.service_url()
    }

    /// Get the API endpoint path.
    pub fn api_endpoint(&self) -> &str {
        self.client.api_endpoint()
    }
}
