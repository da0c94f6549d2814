//! Type-safe API clients that separate public calls from authenticated ones

use super::{ApiRequest, ClientConfig, ClientError, TokenStore};
use crate::types::AuthResponse;
use reqwest::{Client, ClientBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Callback run after the authenticated client rotated the access token
pub type RefreshHook = Arc<dyn Fn(&AuthResponse) + Send + Sync>;

/// Client for endpoints that never carry the access token
///
/// Used for login, registration, logout and refresh. Nothing sent through it
/// is intercepted, which keeps the refresh call from recursing into itself.
#[derive(Clone)]
pub struct PublicTodoClient {
    client: Client,
    api_root: String,
}

/// Client for the data endpoints
///
/// Attaches the token held in the [`TokenStore`] and, when the server answers
/// 401, refreshes the token once through the public client and resubmits the
/// request with the new one.
#[derive(Clone)]
pub struct AuthenticatedTodoClient {
    public: PublicTodoClient,
    tokens: TokenStore,
    on_refresh: Option<RefreshHook>,
}

impl PublicTodoClient {
    /// Create a new public client
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Configuration("base_url is required".into()));
        }

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            // Keeps the refresh cookie between login and refresh
            let mut builder = ClientBuilder::new()
                .user_agent(config.user_agent.clone())
                .cookie_store(true);
            if let Some(timeout) = config.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            // Browsers own the cookie jar and the user agent; fetch has no timeout
            ClientBuilder::new().build()?
        };

        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    /// Get the API root (base URL plus prefix)
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = check(self.send(&request, None).await?).await?;
        Ok(response.json().await?)
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        check(self.send(&request, None).await?).await?;
        Ok(())
    }

    /// Wrap into an authenticated client sharing this connection pool
    pub fn authenticate(self, tokens: TokenStore) -> AuthenticatedTodoClient {
        AuthenticatedTodoClient {
            public: self,
            tokens,
            on_refresh: None,
        }
    }

    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut builder = request.build(&self.client, &self.api_root);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        debug!(
            method = %request.method(),
            path = request.path(),
            authorized = token.is_some(),
            retried = request.is_retried(),
            "Sending request"
        );
        Ok(builder.send().await?)
    }
}

impl AuthenticatedTodoClient {
    /// Create a new authenticated client over a fresh connection pool
    pub fn new(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ClientError> {
        Ok(PublicTodoClient::new(config)?.authenticate(tokens))
    }

    /// Run `hook` every time a 401 recovery stores a new token
    pub fn with_refresh_hook(mut self, hook: RefreshHook) -> Self {
        self.on_refresh = Some(hook);
        self
    }

    /// Get the API root (base URL plus prefix)
    pub fn api_root(&self) -> &str {
        self.public.api_root()
    }

    /// The token slot this client reads before every request
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Public client sharing this client's connection pool and cookies
    pub fn to_public(&self) -> PublicTodoClient {
        self.public.clone()
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = self.dispatch(request).await?;
        Ok(response.json().await?)
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.dispatch(request).await?;
        Ok(())
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<Response, ClientError> {
        let token = self.tokens.get();
        let response = self.public.send(&request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return check(response).await;
        }

        if request.is_retried() {
            debug!(path = request.path(), "Rejected again after refresh, giving up");
            return check(response).await;
        }

        request.mark_retried();
        debug!(path = request.path(), "Access token rejected, refreshing");

        let refreshed = match self.public.refresh_token().await {
            Ok(refreshed) => refreshed,
            Err(error) => {
                warn!(path = request.path(), "Token refresh failed: {error}");
                return Err(error);
            }
        };

        // The new token must be stored before the request goes out again
        self.tokens.set(refreshed.access_token.clone());
        if let Some(hook) = &self.on_refresh {
            hook(&refreshed);
        }

        let response = self
            .public
            .send(&request, Some(refreshed.access_token.as_str()))
            .await?;
        check(response).await
    }
}

/// Turn a non-success response into the matching error
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status, &body))
    }
}

/// Builder that creates the appropriate client type
#[derive(Default)]
pub struct TypedClientBuilder {
    config: Option<ClientConfig>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL, keeping the default prefix
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config = Some(match self.config.take() {
            Some(mut config) => {
                config.base_url = url;
                config
            }
            None => ClientConfig::new(url),
        });
        self
    }

    /// Use a complete configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicTodoClient, ClientError> {
        let config = self
            .config
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        PublicTodoClient::new(&config)
    }

    /// Build an authenticated client reading from `tokens`
    pub fn build_authenticated(
        self,
        tokens: TokenStore,
    ) -> Result<AuthenticatedTodoClient, ClientError> {
        Ok(self.build_public()?.authenticate(tokens))
    }
}
