//! Login, logout, registration and silent refresh

use super::{Session, SessionStore};
use crate::claims::AccessTokenClaims;
use crate::config::AuthConfig;
use crate::error::{SessionError, SessionResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use todo_http::client::{AuthenticatedTodoClient, ClientConfig, PublicTodoClient, TokenStore};
use todo_http::types::{LoginRequest, RegisterRequest};
use todo_http::{AuthResponse, User};
use tracing::{debug, info, warn};

/// The only writer of session state
///
/// Owns the token slot, the session store and both API clients. Views and
/// the CLI go through [`SessionController::api`] for data calls, so a token
/// rotated by the client's 401 recovery is republished here as well.
#[derive(Clone)]
pub struct SessionController {
    public: PublicTodoClient,
    api: AuthenticatedTodoClient,
    tokens: TokenStore,
    sessions: SessionStore,
}

impl SessionController {
    /// Build the clients for `config` around fresh, empty state
    pub fn new(config: &ClientConfig) -> SessionResult<Self> {
        let tokens = TokenStore::new();
        let sessions = SessionStore::new();
        let public = PublicTodoClient::new(config)?;

        let republish = sessions.clone();
        let api = public
            .clone()
            .authenticate(tokens.clone())
            .with_refresh_hook(Arc::new(move |refreshed: &AuthResponse| {
                match session_from(refreshed) {
                    Ok(session) => {
                        debug!(user = %session.user.username, "Republishing rotated session");
                        republish.set(session);
                    }
                    Err(error) => {
                        // Same user, new token
                        warn!("Rotated token has unreadable claims: {error}");
                        if let Some(mut current) = republish.get() {
                            current.access_token.clone_from(&refreshed.access_token);
                            republish.set(current);
                        }
                    }
                }
            }));

        Ok(Self {
            public,
            api,
            tokens,
            sessions,
        })
    }

    /// Log in and publish the session
    ///
    /// Empty credentials are rejected by the caller, not here.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<Session> {
        let credentials = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.public.login(&credentials).await.inspect_err(|error| {
            warn!(username, "Login failed: {error}");
        })?;

        let session = self.publish(&response)?;
        info!(
            key = AuthConfig::SESSION_KEY,
            user = %session.user.username,
            "Logged in"
        );
        Ok(session)
    }

    /// Create an account; the caller logs in afterwards
    pub async fn register(&self, account: &RegisterRequest) -> SessionResult<User> {
        let user = self.public.register(account).await.inspect_err(|error| {
            warn!(username = %account.username, "Registration failed: {error}");
        })?;
        info!(user = %user.username, "Registered account");
        Ok(user)
    }

    /// Revoke the refresh cookie and drop the session
    ///
    /// The token slot keeps its value: nothing references it once the session
    /// is gone and the next login or refresh overwrites it.
    pub async fn logout(&self) -> SessionResult<()> {
        self.public.logout().await.inspect_err(|error| {
            warn!("Logout failed: {error}");
        })?;
        self.sessions.clear();
        info!(key = AuthConfig::SESSION_KEY, "Logged out");
        Ok(())
    }

    /// Trade the refresh cookie for a new token and publish the session
    ///
    /// Cancelling `cancel` at any point before the state is written makes this
    /// return [`SessionError::Cancelled`] and leaves both stores untouched.
    pub async fn refresh(&self, cancel: &CancellationToken) -> SessionResult<Session> {
        let response = cancellable(cancel, self.public.refresh_token()).await?;

        // The response may have raced with a cancellation
        if cancel.is_cancelled() {
            debug!("Refresh finished after cancellation, discarding");
            return Err(SessionError::Cancelled);
        }

        let session = self.publish(&response)?;
        debug!(user = %session.user.username, "Session refreshed");
        Ok(session)
    }

    /// Startup probe: try to resume a session from the refresh cookie
    ///
    /// Any failure other than cancellation leaves the client anonymous.
    pub async fn restore(&self, cancel: &CancellationToken) -> SessionResult<Option<Session>> {
        match self.refresh(cancel).await {
            Ok(session) => {
                info!(user = %session.user.username, "Session restored");
                Ok(Some(session))
            }
            Err(SessionError::Cancelled) => {
                debug!("Session probe cancelled");
                Err(SessionError::Cancelled)
            }
            Err(error) => {
                debug!("No session to restore: {error}");
                self.sessions.clear();
                Ok(None)
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }

    /// Client for the data endpoints
    pub fn api(&self) -> &AuthenticatedTodoClient {
        &self.api
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Decode first so a bad token leaves no partial state behind
    fn publish(&self, response: &AuthResponse) -> SessionResult<Session> {
        let session = session_from(response)?;
        self.tokens.set(session.access_token.clone());
        self.sessions.set(session.clone());
        Ok(session)
    }
}

fn session_from(response: &AuthResponse) -> SessionResult<Session> {
    let claims = AccessTokenClaims::decode(&response.access_token)?;
    Ok(Session {
        access_token: response.access_token.clone(),
        user: claims.user,
    })
}

async fn cancellable<T, F>(cancel: &CancellationToken, operation: F) -> SessionResult<T>
where
    F: Future<Output = Result<T, todo_http::ClientError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SessionError::Cancelled),
        result = operation => result.map_err(SessionError::from),
    }
}
