//! Todo client core: session lifecycle and access control

pub mod claims;
pub mod config;
pub mod error;
pub mod guards;
pub mod session;

pub use claims::AccessTokenClaims;
pub use config::AuthConfig;
pub use error::{SessionError, SessionResult};
pub use guards::{AppRoute, Guard, GuardDecision, Redirect};
pub use session::{Session, SessionController, SessionStore};

pub use tokio_util::sync::CancellationToken;
