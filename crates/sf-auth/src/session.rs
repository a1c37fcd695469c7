//! Authenticated session.
//!
//! A [`Session`] only exists after a successful token exchange, so there is
//! no state in which a client holds credentials but no bearer token. The
//! token is fixed for the lifetime of the session; there is no refresh.

use sfsoql_client::{ClientConfig, SalesforceClient, SfHttpClient};
use tracing::instrument;

use crate::credentials::PasswordCredentials;
use crate::error::Result;
use crate::oauth::{PasswordFlow, TokenResponse};

/// Credentials plus the bearer token obtained for them.
#[derive(Clone)]
pub struct Session {
    credentials: PasswordCredentials,
    token: TokenResponse,
    client: SalesforceClient,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("token", &self.token)
            .field("client", &self.client)
            .finish()
    }
}

impl Session {
    /// Authenticate with the default HTTP configuration.
    pub async fn establish(credentials: PasswordCredentials) -> Result<Self> {
        Self::establish_with_config(credentials, ClientConfig::default()).await
    }

    /// Authenticate using a custom HTTP configuration.
    ///
    /// The same transport is used for the token exchange and for every
    /// later call made through [`Session::client`].
    #[instrument(skip(credentials, config), fields(username = %credentials.username()))]
    pub async fn establish_with_config(
        credentials: PasswordCredentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = SfHttpClient::new(config)?;
        let token = PasswordFlow::new(http.clone())
            .authenticate(&credentials)
            .await?;

        let client = SalesforceClient::from_http(
            http,
            credentials.service_url(),
            credentials.api_endpoint(),
            token.access_token.clone(),
        )?;

        Ok(Self {
            credentials,
            token,
            client,
        })
    }

    /// The credentials this session was established with.
    pub fn credentials(&self) -> &PasswordCredentials {
        &self.credentials
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// The full token response.
    pub fn token(&self) -> &TokenResponse {
        &self.token
    }

    /// Authenticated client bound to the service URL and API endpoint.
    pub fn client(&self) -> &SalesforceClient {
        &self.client
    }
}
