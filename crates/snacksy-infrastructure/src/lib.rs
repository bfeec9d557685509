//! Storage, configuration and file access for the Snacksy client.

pub mod config_service;
pub mod image_loader;
pub mod local_storage;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigFile, ConfigOverrides, ConfigService, DotenvStatus};
pub use crate::image_loader::load_image;
pub use crate::local_storage::FileLocalStorage;
pub use crate::paths::SnacksyPaths;
