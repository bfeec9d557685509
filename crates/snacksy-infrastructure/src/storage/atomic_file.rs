//! Atomic structured-file operations.
//!
//! A thin layer for safe access to small JSON/TOML files: writes go through
//! a temp file + fsync + rename, and read-modify-write cycles hold an
//! exclusive lock file.

use serde::{Serialize, de::DeserializeOwned};
use snacksy_core::SnacksyError;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn name(self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failed.
    #[error("{} error: {message}", format.name())]
    Format { format: FileFormat, message: String },

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicFileError> for SnacksyError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            AtomicFileError::Format { format, message } => SnacksyError::Serialization {
                format: format.name().to_string(),
                message,
            },
            AtomicFileError::Lock(message) => SnacksyError::storage(message),
        }
    }
}

/// A handle to a JSON or TOML file that is replaced atomically.
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and decodes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and decoded
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or decode the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        self.decode(&content).map(Some)
    }

    /// Encodes `data` and replaces the file with it.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = self.encode(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `default_value` is used when the file is missing or blank. The file is
    /// only written when `f` returns `Ok`.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicFileError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicFileError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn decode(&self, content: &str) -> Result<T, AtomicFileError> {
        let format = self.format;
        let result = match format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        result.map_err(|message| AtomicFileError::Format { format, message })
    }

    fn encode(&self, data: &T) -> Result<String, AtomicFileError> {
        let format = self.format;
        let result = match format {
            FileFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::to_string_pretty(data).map_err(|e| e.to_string()),
        };
        result.map_err(|message| AtomicFileError::Format { format, message })
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicFileError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock file released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| AtomicFileError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; removing the file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}
