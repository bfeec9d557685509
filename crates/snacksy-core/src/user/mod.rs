//! Signed-in user record and its local-storage mirror.

pub mod model;
pub mod store;

pub use model::UserRecord;
pub use store::{SessionStore, USER_STORAGE_KEY};
