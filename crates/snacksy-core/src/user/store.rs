//! Session store: the user record mirrored into local storage.

use std::sync::Arc;

use crate::error::Result;
use crate::storage::LocalStorage;
use crate::user::model::UserRecord;

/// Local storage key holding the serialized user record.
pub const USER_STORAGE_KEY: &str = "user";

/// Reads and writes the signed-in user under [`USER_STORAGE_KEY`].
///
/// Serialization happens only at this boundary; callers deal in
/// [`UserRecord`] values.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn LocalStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Restores the stored user, if any.
    ///
    /// A value that does not parse as a [`UserRecord`] is treated as absent
    /// and deleted. Storage read failures are logged and also treated as
    /// absent.
    pub fn restore(&self) -> Option<UserRecord> {
        let raw = match self.storage.get_item(USER_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to read stored user: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(user) => {
                tracing::debug!("[SessionStore] Restored user {}", user.google_id);
                Some(user)
            }
            Err(e) => {
                tracing::error!("[SessionStore] Error parsing stored user: {}", e);
                if let Err(e) = self.storage.remove_item(USER_STORAGE_KEY) {
                    tracing::warn!("[SessionStore] Failed to remove corrupt user entry: {}", e);
                }
                None
            }
        }
    }

    /// Writes `user` to storage.
    pub fn persist(&self, user: &UserRecord) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(USER_STORAGE_KEY, &raw)
    }

    /// Deletes the stored user.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(USER_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLocalStorage;

    fn store() -> (Arc<MemoryLocalStorage>, SessionStore) {
        let storage = Arc::new(MemoryLocalStorage::new());
        let store = SessionStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_restore_empty() {
        let (_, store) = store();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_persist_then_restore() {
        let (_, store) = store();
        let user = UserRecord::new("g-1", Some("a@b.c".into()));
        store.persist(&user).unwrap();
        assert_eq!(store.restore(), Some(user));
    }

    #[test]
    fn test_corrupt_entry_is_deleted() {
        let (storage, store) = store();
        storage.set_item(USER_STORAGE_KEY, "{not json").unwrap();

        assert!(store.restore().is_none());
        assert_eq!(storage.get_item(USER_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_wrong_shape_is_deleted() {
        let (storage, store) = store();
        storage.set_item(USER_STORAGE_KEY, r#"{"email":"a@b.c"}"#).unwrap();

        assert!(store.restore().is_none());
        assert_eq!(storage.get_item(USER_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let (storage, store) = store();
        store.persist(&UserRecord::new("g-1", None)).unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get_item(USER_STORAGE_KEY).unwrap(), None);
    }
}
