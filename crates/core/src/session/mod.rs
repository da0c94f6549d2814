//! Client-side session lifecycle

mod controller;
mod store;

pub use controller::SessionController;
pub use store::{Session, SessionStore};
