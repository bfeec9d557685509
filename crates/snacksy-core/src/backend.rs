//! Backend API seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::feature::FeatureError;
use crate::image::ImageUpload;
use crate::user::UserRecord;
use crate::video::{LikedVideo, Recommendation};

/// Failure talking to the Snacksy backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Non-2xx response. `detail` is the string `detail` field of the
    /// error body, when there was one.
    #[error("HTTP {status} {reason}")]
    Http {
        status: u16,
        reason: String,
        detail: Option<String>,
    },

    /// Transport failure, or a success body that could not be decoded.
    #[error("{0}")]
    Network(String),
}

impl BackendError {
    /// Converts into the feature error shown to the user.
    ///
    /// `http_fallback` builds the message when the response carried no
    /// detail; `network_fallback` is used when the transport error has no
    /// message of its own.
    pub fn into_feature_error<F>(self, http_fallback: F, network_fallback: &str) -> FeatureError
    where
        F: FnOnce(u16, &str) -> String,
    {
        match self {
            BackendError::Http {
                status,
                reason,
                detail,
            } => FeatureError::Http {
                status,
                message: detail
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| http_fallback(status, &reason)),
            },
            BackendError::Network(message) if message.trim().is_empty() => {
                FeatureError::Network(network_fallback.to_string())
            }
            BackendError::Network(message) => FeatureError::Network(message),
        }
    }
}

/// REST endpoints of the Snacksy backend.
///
/// Credentialed calls rely on the session cookie issued by [`login`]; the
/// implementation is responsible for carrying it.
///
/// [`login`]: SnacksyBackend::login
#[async_trait]
pub trait SnacksyBackend: Send + Sync {
    /// `POST /auth/google/login` with `{ code }`.
    async fn login(&self, code: &str) -> Result<UserRecord, BackendError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), BackendError>;

    /// `POST /api/suggest_video` with the image as multipart field `file`.
    async fn suggest_tags(&self, image: &ImageUpload) -> Result<Vec<String>, BackendError>;

    /// `GET /api/youtube_activity`.
    async fn youtube_activity(&self) -> Result<Vec<LikedVideo>, BackendError>;

    /// `POST /api/recommend_video` with `{ food_tags }`.
    async fn recommend_videos(
        &self,
        food_tags: &[String],
    ) -> Result<Vec<Recommendation>, BackendError>;
}
