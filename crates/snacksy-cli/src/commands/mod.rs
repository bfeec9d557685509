pub mod config;
pub mod oneshot;
pub mod shell;
