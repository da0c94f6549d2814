//! Todo HTTP module providing the API wire types and the session-aware client
//!
//! The `client` feature carries the reqwest based clients: a public client for
//! the authentication endpoints and an authenticated wrapper that attaches the
//! current access token and recovers once from an expired one.

#[cfg(feature = "client")]
#[macro_use]
extern crate tracing;

pub mod types;

#[cfg(feature = "client")]
pub mod client;

pub use types::{AuthResponse, User};

#[cfg(feature = "client")]
pub use client::{
    ApiRequest, AuthenticatedTodoClient, ClientConfig, PublicTodoClient, TokenStore,
    error::ClientError,
};
