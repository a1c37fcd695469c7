//! Password-grant credentials and the sources they are resolved from.
//!
//! All credential types implement custom Debug to redact sensitive data.

use std::collections::HashMap;

use crate::error::{Error, ErrorKind, Result};

/// Names of the credential fields, as looked up in a [`CredentialSource`].
pub mod field {
    pub const LOGIN_ENDPOINT: &str = "login_endpoint";
    pub const API_ENDPOINT: &str = "api_endpoint";
    pub const SERVICE_URL: &str = "service_url";
    pub const OAUTH_ENDPOINT: &str = "oauth_endpoint";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const SECURITY_TOKEN: &str = "security_token";
    pub const CONSUMER_KEY: &str = "consumer_key";
    pub const CONSUMER_SECRET: &str = "consumer_secret";

    /// Every field that must be present and non-empty.
    pub const REQUIRED: [&str; 8] = [
        LOGIN_ENDPOINT,
        API_ENDPOINT,
        SERVICE_URL,
        OAUTH_ENDPOINT,
        USERNAME,
        PASSWORD,
        CONSUMER_KEY,
        CONSUMER_SECRET,
    ];
}

/// Something that can supply credential fields by name.
///
/// Implement this for a secret store to plug it into
/// [`PasswordCredentials::resolve`]. Field names are the constants in
/// [`field`].
pub trait CredentialSource {
    /// Look up a field. `None` means the source does not have it.
    fn lookup(&self, name: &str) -> Option<String>;
}

impl CredentialSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: CredentialSource + ?Sized> CredentialSource for &S {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

/// Credential source backed by environment variables.
///
/// A field is read from `{prefix}{FIELD_NAME}`; with the default prefix
/// `login_endpoint` becomes `SF_LOGIN_ENDPOINT`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::with_prefix("SF_")
    }
}

impl EnvSource {
    /// Create a source with a custom variable prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The environment variable a field is read from.
    pub fn var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_ascii_uppercase())
    }
}

impl CredentialSource for EnvSource {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(self.var_name(name)).ok()
    }
}

/// Everything needed for the OAuth 2.0 username-password flow.
///
/// Sensitive fields (password, security token, consumer secret) are
/// redacted in Debug output to prevent accidental exposure in logs.
#[derive(Clone)]
pub struct PasswordCredentials {
    login_endpoint: String,
    api_endpoint: String,
    service_url: String,
    oauth_endpoint: String,
    username: String,
    password: String,
    security_token: Option<String>,
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("login_endpoint", &self.login_endpoint)
            .field("api_endpoint", &self.api_endpoint)
            .field("service_url", &self.service_url)
            .field("oauth_endpoint", &self.oauth_endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Start building credentials field by field.
    pub fn builder() -> PasswordCredentialsBuilder {
        PasswordCredentialsBuilder::default()
    }

    /// Resolve every field by name from a credential source.
    ///
    /// All missing required fields are reported together.
    pub fn resolve(source: &impl CredentialSource) -> Result<Self> {
        let mut builder = Self::builder();
        for name in field::REQUIRED
            .iter()
            .copied()
            .chain(std::iter::once(field::SECURITY_TOKEN))
        {
            if let Some(value) = source.lookup(name) {
                builder.set(name, value);
            }
        }
        builder.build()
    }

    /// Load credentials from `SF_*` environment variables.
    ///
    /// Required: `SF_LOGIN_ENDPOINT`, `SF_API_ENDPOINT`, `SF_SERVICE_URL`,
    /// `SF_OAUTH_ENDPOINT`, `SF_USERNAME`, `SF_PASSWORD`, `SF_CONSUMER_KEY`,
    /// `SF_CONSUMER_SECRET`. Optional: `SF_SECURITY_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::resolve(&EnvSource::default())
    }

    /// Token endpoint the password grant is posted to.
    pub fn login_endpoint(&self) -> &str {
        &self.login_endpoint
    }

    /// REST API base path, e.g. `/services/data/v62.0/`.
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Instance base URL, e.g. `https://myorg.my.salesforce.com/`.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Instance OAuth endpoint.
    pub fn oauth_endpoint(&self) -> &str {
        &self.oauth_endpoint
    }

    /// Login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Connected app consumer key (client_id).
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Whether a security token will be appended to the password.
    pub fn has_security_token(&self) -> bool {
        self.security_token.is_some()
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// Password followed directly by the security token, as the
    /// username-password flow expects.
    pub(crate) fn password_with_token(&self) -> String {
        match &self.security_token {
            Some(token) => format!("{}{}", self.password, token),
            None => self.password.clone(),
        }
    }
}

/// Builder for [`PasswordCredentials`].
#[derive(Default, Clone)]
pub struct PasswordCredentialsBuilder {
    values: HashMap<&'static str, String>,
}

impl std::fmt::Debug for PasswordCredentialsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("PasswordCredentialsBuilder")
            .field("fields_set", &names)
            .finish()
    }
}

impl PasswordCredentialsBuilder {
    fn set(&mut self, name: &str, value: String) {
        let key = field::REQUIRED
            .iter()
            .copied()
            .chain(std::iter::once(field::SECURITY_TOKEN))
            .find(|known| *known == name);
        if let Some(key) = key {
            self.values.insert(key, value);
        }
    }

    fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// Set the token endpoint, e.g. `https://login.salesforce.com/services/oauth2/token`.
    pub fn login_endpoint(self, value: impl Into<String>) -> Self {
        self.with(field::LOGIN_ENDPOINT, value)
    }

    /// Set the REST API base path, e.g. `/services/data/v62.0/`.
    pub fn api_endpoint(self, value: impl Into<String>) -> Self {
        self.with(field::API_ENDPOINT, value)
    }

    /// Set the instance base URL.
    pub fn service_url(self, value: impl Into<String>) -> Self {
        self.with(field::SERVICE_URL, value)
    }

    /// Set the instance OAuth endpoint.
    pub fn oauth_endpoint(self, value: impl Into<String>) -> Self {
        self.with(field::OAUTH_ENDPOINT, value)
    }

    /// Set the login username.
    pub fn username(self, value: impl Into<String>) -> Self {
        self.with(field::USERNAME, value)
    }

    /// Set the login password.
    pub fn password(self, value: impl Into<String>) -> Self {
        self.with(field::PASSWORD, value)
    }

    /// Set the security token appended to the password.
    pub fn security_token(self, value: impl Into<String>) -> Self {
        self.with(field::SECURITY_TOKEN, value)
    }

    /// Set the consumer key (client_id).
    pub fn consumer_key(self, value: impl Into<String>) -> Self {
        self.with(field::CONSUMER_KEY, value)
    }

    /// Set the consumer secret (client_secret).
    pub fn consumer_secret(self, value: impl Into<String>) -> Self {
        self.with(field::CONSUMER_SECRET, value)
    }

    /// Validate and build the credentials.
    ///
    /// Fails with a configuration error naming every required field that
    /// is missing or blank. An empty security token counts as absent.
    pub fn build(mut self) -> Result<PasswordCredentials> {
        let missing: Vec<&str> = field::REQUIRED
            .iter()
            .copied()
            .filter(|name| {
                self.values
                    .get(*name)
                    .map_or(true, |value| value.trim().is_empty())
            })
            .collect();

        if !missing.is_empty() {
            return Err(Error::new(ErrorKind::Config(format!(
                "missing required credential fields: {}",
                missing.join(", ")
            ))));
        }

        for name in [field::LOGIN_ENDPOINT, field::SERVICE_URL] {
            let value = self.values.get(name).map(String::as_str).unwrap_or_default();
            check_http_url(name, value)?;
        }

        let mut take = |name: &str| self.values.remove(name).unwrap_or_default();

        Ok(PasswordCredentials {
            login_endpoint: take(field::LOGIN_ENDPOINT),
            api_endpoint: take(field::API_ENDPOINT),
            service_url: take(field::SERVICE_URL),
            oauth_endpoint: take(field::OAUTH_ENDPOINT),
            username: take(field::USERNAME),
            password: take(field::PASSWORD),
            consumer_key: take(field::CONSUMER_KEY),
            consumer_secret: take(field::CONSUMER_SECRET),
            security_token: Some(take(field::SECURITY_TOKEN)).filter(|t| !t.is_empty()),
        })
    }
}

fn check_http_url(name: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        Error::with_source(
            ErrorKind::Config(format!("{} is not a valid URL: {}", name, e)),
            e,
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::new(ErrorKind::Config(format!(
            "{} must be an http(s) URL, got scheme '{}'",
            name,
            parsed.scheme()
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> PasswordCredentialsBuilder {
        PasswordCredentials::builder()
            .login_endpoint("https://login.salesforce.com/services/oauth2/token")
            .api_endpoint("/services/data/v62.0/")
            .service_url("https://myorg.my.salesforce.com/")
            .oauth_endpoint("https://myorg.my.salesforce.com/services/oauth2/token")
            .username("user@example.com")
            .password("hunter2")
            .consumer_key("client-id")
            .consumer_secret("client-secret")
    }

    #[test]
    fn test_builder_complete() {
        let creds = full_builder().build().unwrap();
        assert_eq!(creds.username(), "user@example.com");
        assert_eq!(creds.api_endpoint(), "/services/data/v62.0/");
        assert_eq!(creds.consumer_key(), "client-id");
        assert!(!creds.has_security_token());
        assert_eq!(creds.password_with_token(), "hunter2");
    }

    #[test]
    fn test_password_and_token_concatenated_without_separator() {
        let creds = full_builder().security_token("TOKEN123").build().unwrap();
        assert!(creds.has_security_token());
        assert_eq!(creds.password_with_token(), "hunter2TOKEN123");
    }

    #[test]
    fn test_empty_security_token_is_absent() {
        let creds = full_builder().security_token("").build().unwrap();
        assert!(!creds.has_security_token());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = PasswordCredentials::builder()
            .login_endpoint("https://login.salesforce.com/services/oauth2/token")
            .username("  ")
            .build()
            .unwrap_err();

        assert!(err.is_config_error());
        let msg = err.to_string();
        for name in [
            "api_endpoint",
            "service_url",
            "oauth_endpoint",
            "username",
            "password",
            "consumer_key",
            "consumer_secret",
        ] {
            assert!(msg.contains(name), "{msg} should mention {name}");
        }
        assert!(!msg.contains("login_endpoint"));
        assert!(!msg.contains("security_token"));
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let err = full_builder().service_url("not a url").build().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("service_url"));

        let err = full_builder()
            .login_endpoint("ftp://login.salesforce.com/token")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("login_endpoint"));
    }

    #[test]
    fn test_resolve_from_map() {
        let mut map: HashMap<String, String> = HashMap::new();
        for (k, v) in [
            (field::LOGIN_ENDPOINT, "https://login.salesforce.com/services/oauth2/token"),
            (field::API_ENDPOINT, "/services/data/v62.0/"),
            (field::SERVICE_URL, "https://myorg.my.salesforce.com"),
            (field::OAUTH_ENDPOINT, "https://myorg.my.salesforce.com/services/oauth2/token"),
            (field::USERNAME, "user@example.com"),
            (field::PASSWORD, "pw"),
            (field::SECURITY_TOKEN, "tok"),
            (field::CONSUMER_KEY, "key"),
            (field::CONSUMER_SECRET, "secret"),
            ("unrelated", "ignored"),
        ] {
            map.insert(k.to_string(), v.to_string());
        }

        let creds = PasswordCredentials::resolve(&map).unwrap();
        assert_eq!(creds.service_url(), "https://myorg.my.salesforce.com");
        assert_eq!(creds.password_with_token(), "pwtok");
    }

    #[test]
    fn test_resolve_from_map_missing_fields() {
        let map: HashMap<String, String> = HashMap::new();
        let err = PasswordCredentials::resolve(&map).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_env_source_var_names() {
        let source = EnvSource::default();
        assert_eq!(source.var_name(field::LOGIN_ENDPOINT), "SF_LOGIN_ENDPOINT");
        assert_eq!(source.var_name(field::CONSUMER_SECRET), "SF_CONSUMER_SECRET");

        let source = EnvSource::with_prefix("SALESFORCE_");
        assert_eq!(source.var_name(field::USERNAME), "SALESFORCE_USERNAME");
    }

    #[test]
    fn test_env_source_lookup() {
        let source = EnvSource::with_prefix("SFSOQL_CREDENTIALS_TEST_");
        std::env::set_var("SFSOQL_CREDENTIALS_TEST_USERNAME", "env-user");
        assert_eq!(source.lookup(field::USERNAME), Some("env-user".to_string()));
        assert_eq!(source.lookup(field::PASSWORD), None);
        std::env::remove_var("SFSOQL_CREDENTIALS_TEST_USERNAME");
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = full_builder()
            .password("super_secret_password")
            .security_token("super_secret_token")
            .consumer_secret("super_secret_consumer")
            .build()
            .unwrap();

        let debug_output = format!("{:?}", creds);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("user@example.com"));
        assert!(!debug_output.contains("super_secret_password"));
        assert!(!debug_output.contains("super_secret_token"));
        assert!(!debug_output.contains("super_secret_consumer"));
    }

    #[test]
    fn test_builder_debug_hides_values() {
        let builder = full_builder();
        let debug_output = format!("{:?}", builder);
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("password"));
    }
}
