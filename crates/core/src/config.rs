//! Session configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Key the session record is published under
    pub const SESSION_KEY: &'static str = "me";
}
