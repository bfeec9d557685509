//! Adapters to the outside world: the Snacksy REST backend and the Google
//! consent flow.

pub mod console_identity;
pub mod http_backend;
pub mod session_cookies;

pub use console_identity::{CodePrompt, ConsoleIdentityProvider, StdioPrompt, parse_reply};
pub use http_backend::HttpBackend;
pub use session_cookies::SessionCookies;
