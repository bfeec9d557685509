//! Video records returned by the backend.

pub mod model;

pub use model::{LikedVideo, Recommendation, watch_url};
