//! User record as returned by the backend login exchange.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signed-in user.
///
/// The exact shape is defined by the backend; `google_id` is the only field
/// the client relies on. Unknown fields are preserved so that the record
/// written to local storage round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable identity-provider subject.
    pub google_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Status message from the login endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(google_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            google_id: google_id.into(),
            email,
            message: None,
            extra: Map::new(),
        }
    }

    /// Name shown in the welcome line: email, falling back to the google id.
    pub fn display_name(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => &self.google_id,
        }
    }
}
