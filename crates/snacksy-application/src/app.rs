//! SnacksyApp - root composition.
//!
//! Owns the shared `detected_tags` list and wires the three components
//! together: the tagger reports tags into it, the panel reads it together
//! with the current user.

use std::sync::Arc;

use async_trait::async_trait;
use snacksy_core::auth::IdentityProvider;
use snacksy_core::backend::SnacksyBackend;
use snacksy_core::config::AppConfig;
use snacksy_core::image::ImageUpload;
use snacksy_core::tags::TagsListener;
use snacksy_core::user::{SessionStore, UserRecord};
use snacksy_core::video::{LikedVideo, Recommendation};
use snacksy_core::FeatureError;
use tokio::sync::RwLock;

use crate::activity_panel::ActivityPanel;
use crate::image_tagger::ImageTagger;
use crate::session_controller::SessionController;
use crate::view::AppSnapshot;

/// Receives tags from the tagger. New tags invalidate the recommendations
/// computed for the previous ones.
struct DetectedTags {
    tags: RwLock<Vec<String>>,
    panel: Arc<ActivityPanel>,
}

#[async_trait]
impl TagsListener for DetectedTags {
    async fn tags_detected(&self, tags: &[String]) {
        *self.tags.write().await = tags.to_vec();
        self.panel.clear_recommendations().await;
    }
}

pub struct SnacksyApp {
    session: SessionController,
    tagger: ImageTagger,
    panel: Arc<ActivityPanel>,
    detected: Arc<DetectedTags>,
}

impl SnacksyApp {
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn SnacksyBackend>,
        provider: Arc<dyn IdentityProvider>,
        store: SessionStore,
    ) -> Self {
        let panel = Arc::new(ActivityPanel::new(backend.clone()));
        let detected = Arc::new(DetectedTags {
            tags: RwLock::new(Vec::new()),
            panel: panel.clone(),
        });
        let tagger = ImageTagger::new(backend.clone(), detected.clone());
        let session = SessionController::new(config, provider, backend, store);

        Self {
            session,
            tagger,
            panel,
            detected,
        }
    }

    pub async fn sign_in(&self) -> Result<UserRecord, FeatureError> {
        self.session.sign_in().await
    }

    /// Signs out and clears every feature's results, errors and loading
    /// flags.
    pub async fn sign_out(&self) {
        self.session.sign_out().await;
        self.detected.tags.write().await.clear();
        self.tagger.reset().await;
        self.panel.reset().await;
    }

    pub async fn select_file(&self, file: ImageUpload) {
        self.tagger.select_file(file).await;
    }

    pub async fn upload(&self) -> Result<Vec<String>, FeatureError> {
        self.tagger.upload().await
    }

    pub async fn fetch_activity(&self) -> Result<Vec<LikedVideo>, FeatureError> {
        let user = self.session.current_user().await;
        self.panel.fetch_activity(user.as_ref()).await
    }

    pub async fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, FeatureError> {
        let user = self.session.current_user().await;
        let tags = self.detected_tags().await;
        self.panel.fetch_recommendations(user.as_ref(), &tags).await
    }

    pub async fn detected_tags(&self) -> Vec<String> {
        self.detected.tags.read().await.clone()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            user: self.session.current_user().await,
            auth_error: self.session.auth_error().await,
            sign_in_available: self.session.is_configured(),
            pending_file: self.tagger.pending_file().await,
            uploading: self.tagger.is_uploading().await,
            tagging: self.tagger.tags_state().await,
            detected_tags: self.detected_tags().await,
            activity: self.panel.activity().await,
            recommendations: self.panel.recommendations().await,
        }
    }
}
