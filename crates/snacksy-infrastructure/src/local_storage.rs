//! File-backed local storage.
//!
//! Keeps the whole key/value map in memory and mirrors every write to a JSON
//! object on disk, so a value written in one run is there in the next.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use snacksy_core::error::{Result, SnacksyError};
use snacksy_core::storage::LocalStorage;

use crate::paths::SnacksyPaths;
use crate::storage::{AtomicFile, AtomicFileError};

type Entries = BTreeMap<String, String>;

/// [`LocalStorage`] persisted to `local_storage.json`.
pub struct FileLocalStorage {
    file: AtomicFile<Entries>,
    cache: RwLock<Entries>,
}

impl FileLocalStorage {
    /// Opens the store at the default location for `paths`.
    pub fn open(paths: &SnacksyPaths) -> Result<Self> {
        Self::open_at(paths.local_storage_file()?)
    }

    /// Opens the store at `path`.
    ///
    /// An unreadable file is discarded with a warning and the store starts
    /// empty.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let file = AtomicFile::<Entries>::json(path);

        let entries = match file.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(AtomicFileError::Format { message, .. }) => {
                tracing::warn!(
                    "[LocalStorage] Discarding unreadable {}: {}",
                    file.path().display(),
                    message
                );
                file.remove()?;
                Entries::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "[LocalStorage] Opened {} ({} keys)",
            file.path().display(),
            entries.len()
        );

        Ok(Self {
            file,
            cache: RwLock::new(entries),
        })
    }

    fn write<F>(&self, f: F) -> Result<()>
    where
        F: Fn(&mut Entries),
    {
        self.file.update(Entries::new(), |entries| {
            f(entries);
            Ok(())
        })?;

        let mut cache = self
            .cache
            .write()
            .map_err(|e| SnacksyError::storage(format!("local storage cache poisoned: {}", e)))?;
        f(&mut *cache);
        Ok(())
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let cache = self
            .cache
            .read()
            .map_err(|e| SnacksyError::storage(format!("local storage cache poisoned: {}", e)))?;
        Ok(cache.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.write(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.write(|entries| {
            entries.remove(key);
        })
    }
}
