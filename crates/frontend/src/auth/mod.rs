mod context;

pub use context::{SessionContext, SessionProvider, use_session};
