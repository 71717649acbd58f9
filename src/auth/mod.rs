mod service;
mod session;

pub use service::{AuthError, AuthService};
pub use session::{Session, SessionStore, TOKEN_KEY, USER_KEY};
