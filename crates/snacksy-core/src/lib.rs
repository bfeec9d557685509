//! Domain types and seams of the Snacksy client.
//!
//! Everything here is free of I/O: concrete storage, HTTP and identity
//! provider implementations live in `snacksy-infrastructure` and
//! `snacksy-interaction`, orchestration in `snacksy-application`.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod feature;
pub mod image;
pub mod storage;
pub mod tags;
pub mod user;
pub mod video;

pub use error::{Result, SnacksyError};
pub use feature::{FeatureError, FeatureState};
