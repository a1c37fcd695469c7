//! Core HTTP client with compression and Salesforce-specific handling.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::{Response, ResponseExt};

/// HTTP client for Salesforce APIs with compression and error handling.
///
/// Requests are sent once; a failed request is reported to the caller
/// as-is.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let accept_compressed = config.compression.enabled && config.compression.accept_compressed;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .min_tls_version(config.min_tls_version.to_reqwest())
            .user_agent(&config.user_agent)
            .gzip(accept_compressed)
            .deflate(accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Create a PATCH request builder.
    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Patch, url)
    }

    /// Execute a request and map non-2xx responses to errors.
    #[instrument(skip(self, request), fields(method = ?request.method))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.send_raw(request).await?;
        response.check_salesforce_error().await
    }

    /// Execute a request and return the response whatever its status.
    ///
    /// Used by callers that need to inspect a failed body themselves, such
    /// as the OAuth token exchange.
    pub async fn send_raw(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.body(serde_json::to_vec(&value)?),
                RequestBody::Text(text) => req.body(text),
                RequestBody::Form(fields) => {
                    let encoded = serde_urlencoded::to_string(&fields).map_err(|e| {
                        Error::with_source(ErrorKind::Other(e.to_string()), e)
                    })?;
                    req.body(encoded)
                }
            };
        }

        if self.config.enable_tracing {
            // The full URL may carry a SOQL query; only the path is logged.
            debug!(
                method = ?request.method,
                path = %redact_query(&request.url),
                "Sending request"
            );
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }
}

/// The URL without its query string, for logging.
pub(crate) fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(path, _)| path).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = SfHttpClient::default_client().unwrap();
        assert!(client.config().compression.enabled);
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let response = client
            .execute(
                client
                    .get(format!("{}/test", mock_server.uri()))
                    .bearer_auth("test-token")
                    .accept("application/json"),
            )
            .await
            .unwrap();
        let value: serde_json::Value = response.json().await.unwrap();

        assert_eq!(value["success"], true);
    }

    #[tokio::test]
    async fn test_form_body_is_urlencoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/form"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string("grant_type=password&password=p%40ss+word"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();
        let response = client
            .execute(
                client
                    .post(format!("{}/form", mock_server.uri()))
                    .form([("grant_type", "password"), ("password", "p@ss word")]),
            )
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_salesforce_error_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!([{
                "errorCode": "MALFORMED_QUERY",
                "message": "unexpected token: FROM",
            }])))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let err = client
            .execute(client.get(format!("{}/error", mock_server.uri())).bearer_auth("token"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::SalesforceApi { .. }));
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();
        let err = client
            .execute(client.get(format!("{}/flaky", mock_server.uri())))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_send_raw_keeps_failed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"invalid_grant\"}"))
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();
        let response = client
            .send_raw(client.post(format!("{}/token", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert!(response.text().await.unwrap().contains("invalid_grant"));
    }

    #[test]
    fn test_redact_query() {
        assert_eq!(
            redact_query("https://x.my.salesforce.com/services/data/v62.0/query?q=SELECT+Id"),
            "https://x.my.salesforce.com/services/data/v62.0/query"
        );
        assert_eq!(redact_query("https://x/y"), "https://x/y");
    }
}
