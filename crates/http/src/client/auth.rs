//! Authentication API client methods

use super::{ApiRequest, ClientError, PublicTodoClient};
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, User};

impl PublicTodoClient {
    /// Exchange username and password for an access token
    ///
    /// The server also sets the refresh cookie on this response.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let request = ApiRequest::post("/auth/login").form(vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ]);
        self.execute(request).await
    }

    /// Create an account; does not log in
    pub async fn register(&self, account: &RegisterRequest) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/register").json(account)?;
        self.execute(request).await
    }

    /// Revoke the refresh cookie
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::post("/auth/logout")).await
    }

    /// Trade the refresh cookie for a new access token
    pub async fn refresh_token(&self) -> Result<AuthResponse, ClientError> {
        self.execute(ApiRequest::post("/auth/refresh")).await
    }
}
