//! Todo HTTP client

pub mod auth;
pub mod config;
pub mod error;
pub mod request;
pub mod todos;
pub mod token;
pub mod typed;

pub use config::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use request::{ApiRequest, RequestBody};
pub use token::TokenStore;
pub use reqwest::StatusCode;
pub use typed::{AuthenticatedTodoClient, PublicTodoClient, RefreshHook, TypedClientBuilder};
