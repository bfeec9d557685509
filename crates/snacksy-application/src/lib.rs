//! Application layer for Snacksy.
//!
//! The three interactive components and the root [`SnacksyApp`] that
//! composes them. Everything talks to the outside world through the seams
//! defined in `snacksy-core`.

pub mod activity_panel;
pub mod app;
pub mod image_tagger;
pub mod session_controller;
pub mod view;

#[cfg(test)]
mod testing;

pub use activity_panel::ActivityPanel;
pub use app::SnacksyApp;
pub use image_tagger::ImageTagger;
pub use session_controller::SessionController;
pub use view::{AppSnapshot, LikedVideoRow, RecommendationCard};
