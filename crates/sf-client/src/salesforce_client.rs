//! High-level Salesforce client with typed HTTP methods.
//!
//! `SalesforceClient` binds the service URL, API endpoint and bearer token
//! to an [`SfHttpClient`]. Every request it builds carries
//! `Authorization: Bearer <token>`.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Request bodies are skipped in tracing spans

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::instrument;

use crate::client::{redact_query, SfHttpClient};
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::response::Response;

const JSON: &str = "application/json";
const XML: &str = "application/xml";

/// Authenticated Salesforce API client.
///
/// URLs are joined the way the REST API hands them out:
/// - `api_url("query?q=...")` → `{service_url}{api_endpoint}query?q=...`
/// - `url("/services/data/v62.0/query/01g...-2000")` → `{service_url}/services/...`
///
/// The service URL is stored without a trailing slash and the API endpoint
/// always starts and ends with one, so both forms join without doubled or
/// missing separators.
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    service_url: String,
    api_endpoint: String,
    access_token: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("service_url", &self.service_url)
            .field("api_endpoint", &self.api_endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new client for the given service URL, API endpoint and token.
    pub fn new(
        service_url: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(service_url, api_endpoint, access_token, ClientConfig::default())
    }

    /// Create a new client with custom HTTP configuration.
    pub fn with_config(
        service_url: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = SfHttpClient::new(config)?;
        Self::from_http(http, service_url, api_endpoint, access_token)
    }

    /// Create a client around an existing HTTP client.
    pub fn from_http(
        http: SfHttpClient,
        service_url: impl Into<String>,
        api_endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let service_url = service_url.into();
        let parsed = url::Url::parse(&service_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::Config(format!(
                "service URL must be http(s), got scheme '{}'",
                parsed.scheme()
            ))));
        }

        Ok(Self {
            http,
            service_url: service_url.trim_end_matches('/').to_string(),
            api_endpoint: normalize_api_endpoint(&api_endpoint.into()),
            access_token: access_token.into(),
        })
    }

    /// Get the service URL (no trailing slash).
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Get the API endpoint path (leading and trailing slash).
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the underlying HTTP client.
    pub fn http(&self) -> &SfHttpClient {
        &self.http
    }

    /// Build the full URL for a path.
    ///
    /// Absolute URLs are returned unchanged; anything else is appended to
    /// the service URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.service_url, path)
        } else {
            format!("{}/{}", self.service_url, path)
        }
    }

    /// Build the REST API URL for a path below the API endpoint.
    ///
    /// Example: `api_url("sobjects/Account")` →
    /// `https://x.my.salesforce.com/services/data/v62.0/sobjects/Account`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.service_url,
            self.api_endpoint,
            path.trim_start_matches('/')
        )
    }

    // =========================================================================
    // Base HTTP Methods (with authentication)
    // =========================================================================

    /// Create a GET request builder with authentication.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.access_token)
    }

    /// Create a POST request builder with authentication.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.access_token)
    }

    /// Create a PATCH request builder with authentication.
    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.http.patch(url).bearer_auth(&self.access_token)
    }

    /// Execute a request and return the raw response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    // =========================================================================
    // Typed JSON Methods
    // =========================================================================

    /// GET request with JSON response deserialization.
    #[instrument(skip(self, url), fields(path = %redact_query(url)))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let full_url = self.url(url);
        let request = self.get(&full_url).accept(JSON);
        let response = self.http.execute(request).await?;
        response.json().await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let full_url = self.url(url);
        let request = self.post(&full_url).accept(JSON).json(body)?;
        let response = self.http.execute(request).await?;
        response.json().await
    }

    /// PATCH request with JSON body.
    ///
    /// Salesforce answers a successful PATCH with 204 No Content.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_json<B: Serialize>(&self, url: &str, body: &B) -> Result<()> {
        let full_url = self.url(url);
        let request = self.patch(&full_url).accept(JSON).json(body)?;
        self.http.execute(request).await?;
        Ok(())
    }

    /// POST request with an XML body; returns the raw response text.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        let full_url = self.url(url);
        let request = self.post(&full_url).accept(XML).xml(body);
        let response = self.http.execute(request).await?;
        response.text().await
    }

    /// PATCH request with an XML body; returns the raw response text,
    /// which is usually empty.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_xml(&self, url: &str, body: String) -> Result<String> {
        let full_url = self.url(url);
        let request = self.patch(&full_url).accept(XML).xml(body);
        let response = self.http.execute(request).await?;
        response.text().await
    }
}

fn normalize_api_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// One page of a SOQL query, or a fully merged result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(
        rename = "nextRecordsUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_records_url: Option<String>,

    /// The records.
    pub records: Vec<T>,
}
