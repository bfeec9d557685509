//! ActivityPanel - liked-video history and recommendations.
//!
//! Both fetches may be re-issued at any time. Nothing is cancelled: every
//! request writes its outcome when it settles, so the one that settles last
//! owns the state.

use std::sync::Arc;

use snacksy_core::backend::SnacksyBackend;
use snacksy_core::user::UserRecord;
use snacksy_core::video::{LikedVideo, Recommendation};
use snacksy_core::{FeatureError, FeatureState};
use tokio::sync::RwLock;

pub const SIGN_IN_FOR_ACTIVITY: &str = "Please sign in first to fetch YouTube activity.";
pub const NO_LIKED_VIDEOS: &str = "No liked videos found or activity is empty.";
const ACTIVITY_FAILED: &str = "Failed to fetch YouTube activity.";
const ACTIVITY_NETWORK_ERROR: &str = "Network error while fetching YouTube activity.";

pub const SIGN_IN_FOR_RECOMMENDATIONS: &str = "Please sign in to get recommendations.";
pub const ANALYZE_IMAGE_FIRST: &str = "Please analyze a food image first to get tags.";
pub const NO_RECOMMENDATIONS: &str = "No recommendations found for these tags/activity.";
const RECOMMENDATIONS_FAILED: &str = "Failed to get recommendations.";
const RECOMMENDATIONS_NETWORK_ERROR: &str = "Network error while fetching recommendations.";

pub struct ActivityPanel {
    backend: Arc<dyn SnacksyBackend>,
    activity: RwLock<FeatureState<LikedVideo>>,
    recommendations: RwLock<FeatureState<Recommendation>>,
}

impl ActivityPanel {
    pub fn new(backend: Arc<dyn SnacksyBackend>) -> Self {
        Self {
            backend,
            activity: RwLock::new(FeatureState::Idle),
            recommendations: RwLock::new(FeatureState::Idle),
        }
    }

    /// Fetches the liked-video history of `user`.
    ///
    /// An empty history is a successful result carrying a notice.
    pub async fn fetch_activity(
        &self,
        user: Option<&UserRecord>,
    ) -> Result<Vec<LikedVideo>, FeatureError> {
        if user.is_none() {
            let error = FeatureError::validation(SIGN_IN_FOR_ACTIVITY);
            self.activity.write().await.fail(error.clone());
            return Err(error);
        }

        self.activity.write().await.begin();
        tracing::info!("[ActivityPanel] Fetching YouTube activity");

        match self.backend.youtube_activity().await {
            Ok(videos) => {
                tracing::info!("[ActivityPanel] Received {} liked video(s)", videos.len());
                let notice = videos.is_empty().then(|| NO_LIKED_VIDEOS.to_string());
                self.activity.write().await.succeed(videos.clone(), notice);
                Ok(videos)
            }
            Err(e) => {
                tracing::warn!("[ActivityPanel] Activity fetch failed: {}", e);
                let error = e.into_feature_error(
                    |_, _| ACTIVITY_FAILED.to_string(),
                    ACTIVITY_NETWORK_ERROR,
                );
                self.activity.write().await.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Requests recommendations for `tags` on behalf of `user`.
    ///
    /// The user is checked before the tags. An empty answer is reported as
    /// [`FeatureError::Empty`].
    pub async fn fetch_recommendations(
        &self,
        user: Option<&UserRecord>,
        tags: &[String],
    ) -> Result<Vec<Recommendation>, FeatureError> {
        let precondition = if user.is_none() {
            Some(SIGN_IN_FOR_RECOMMENDATIONS)
        } else if tags.is_empty() {
            Some(ANALYZE_IMAGE_FIRST)
        } else {
            None
        };
        if let Some(message) = precondition {
            let error = FeatureError::validation(message);
            self.recommendations.write().await.fail(error.clone());
            return Err(error);
        }

        self.recommendations.write().await.begin();
        tracing::info!("[ActivityPanel] Requesting recommendations for {:?}", tags);

        match self.backend.recommend_videos(tags).await {
            Ok(recommendations) if recommendations.is_empty() => {
                tracing::info!("[ActivityPanel] No recommendations returned");
                let error = FeatureError::Empty(NO_RECOMMENDATIONS.to_string());
                self.recommendations.write().await.fail(error.clone());
                Err(error)
            }
            Ok(recommendations) => {
                tracing::info!(
                    "[ActivityPanel] Received {} recommendation(s)",
                    recommendations.len()
                );
                self.recommendations
                    .write()
                    .await
                    .succeed(recommendations.clone(), None);
                Ok(recommendations)
            }
            Err(e) => {
                tracing::warn!("[ActivityPanel] Recommendation fetch failed: {}", e);
                let error = e.into_feature_error(
                    |_, _| RECOMMENDATIONS_FAILED.to_string(),
                    RECOMMENDATIONS_NETWORK_ERROR,
                );
                self.recommendations.write().await.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Drops recommendations and their error.
    pub async fn clear_recommendations(&self) {
        self.recommendations.write().await.reset();
    }

    /// Returns both features to idle.
    pub async fn reset(&self) {
        self.activity.write().await.reset();
        self.recommendations.write().await.reset();
    }

    pub async fn activity(&self) -> FeatureState<LikedVideo> {
        self.activity.read().await.clone()
    }

    pub async fn recommendations(&self) -> FeatureState<Recommendation> {
        self.recommendations.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, http_error, liked, user};
    use snacksy_core::backend::BackendError;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn panel() -> (Arc<FakeBackend>, ActivityPanel) {
        let backend = Arc::new(FakeBackend::new());
        (backend.clone(), ActivityPanel::new(backend))
    }

    #[tokio::test]
    async fn test_activity_requires_user() {
        let (backend, panel) = panel();

        let err = panel.fetch_activity(None).await.unwrap_err();

        assert_eq!(err.message(), SIGN_IN_FOR_ACTIVITY);
        assert_eq!(backend.activity_calls.load(Ordering::SeqCst), 0);
        assert!(!panel.activity().await.is_loading());
    }

    #[tokio::test]
    async fn test_activity_success_and_empty_notice() {
        let (backend, panel) = panel();
        let me = user("g-1");
        backend.on_activity(Ok(vec![liked("v1", "Dumplings")]));
        backend.on_activity(Ok(vec![]));

        let videos = panel.fetch_activity(Some(&me)).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(panel.activity().await.items()[0].title, "Dumplings");

        let videos = panel.fetch_activity(Some(&me)).await.unwrap();
        assert!(videos.is_empty());
        let state = panel.activity().await;
        assert!(state.error().is_none());
        assert_eq!(state.notice(), Some(NO_LIKED_VIDEOS));
    }

    #[tokio::test]
    async fn test_activity_errors() {
        let (backend, panel) = panel();
        let me = user("g-1");
        backend.on_activity(Err(http_error(401, "Unauthorized", Some("Not authenticated"))));
        backend.on_activity(Err(http_error(500, "Internal Server Error", None)));
        backend.on_activity(Err(BackendError::Network(String::new())));

        let err = panel.fetch_activity(Some(&me)).await.unwrap_err();
        assert_eq!(err.message(), "Not authenticated");

        let err = panel.fetch_activity(Some(&me)).await.unwrap_err();
        assert_eq!(err.message(), ACTIVITY_FAILED);

        let err = panel.fetch_activity(Some(&me)).await.unwrap_err();
        assert_eq!(err.message(), ACTIVITY_NETWORK_ERROR);
        assert!(!panel.activity().await.is_loading());
    }

    #[tokio::test]
    async fn test_last_settled_activity_wins() {
        let (backend, panel) = panel();
        let panel = Arc::new(panel);
        backend.on_activity_after(Duration::from_millis(150), Ok(vec![liked("slow", "Slow")]));
        backend.on_activity_after(Duration::from_millis(10), Ok(vec![liked("fast", "Fast")]));

        let first = tokio::spawn({
            let panel = panel.clone();
            async move { panel.fetch_activity(Some(&user("g-1"))).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = panel.fetch_activity(Some(&user("g-1"))).await.unwrap();
        assert_eq!(second[0].id, "fast");

        first.await.unwrap().unwrap();
        assert_eq!(panel.activity().await.items()[0].id, "slow");
        assert_eq!(backend.activity_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recommendations_preconditions() {
        let (backend, panel) = panel();

        let err = panel
            .fetch_recommendations(None, &["pizza".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.message(), SIGN_IN_FOR_RECOMMENDATIONS);

        let err = panel
            .fetch_recommendations(Some(&user("g-1")), &[])
            .await
            .unwrap_err();
        assert_eq!(err.message(), ANALYZE_IMAGE_FIRST);

        let err = panel.fetch_recommendations(None, &[]).await.unwrap_err();
        assert_eq!(err.message(), SIGN_IN_FOR_RECOMMENDATIONS);

        assert_eq!(backend.recommend_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_recommendations_is_error_message() {
        let (backend, panel) = panel();
        backend.on_recommend(Ok(vec![]));

        let err = panel
            .fetch_recommendations(Some(&user("g-1")), &["tacos".to_string()])
            .await
            .unwrap_err();

        assert_eq!(err, FeatureError::Empty(NO_RECOMMENDATIONS.to_string()));
        assert_eq!(panel.recommendations().await.error(), Some(&err));
        assert!(panel.recommendations().await.items().is_empty());
    }

    #[tokio::test]
    async fn test_recommendation_errors() {
        let (backend, panel) = panel();
        let me = user("g-1");
        let tags = vec!["pizza".to_string()];
        backend.on_recommend(Err(http_error(422, "Unprocessable Entity", None)));
        backend.on_recommend(Err(BackendError::Network("timed out".into())));
        backend.on_recommend(Err(BackendError::Network(String::new())));

        let err = panel.fetch_recommendations(Some(&me), &tags).await.unwrap_err();
        assert_eq!(err.message(), RECOMMENDATIONS_FAILED);

        let err = panel.fetch_recommendations(Some(&me), &tags).await.unwrap_err();
        assert_eq!(err.message(), "timed out");

        let err = panel.fetch_recommendations(Some(&me), &tags).await.unwrap_err();
        assert_eq!(err.message(), RECOMMENDATIONS_NETWORK_ERROR);
    }

    #[tokio::test]
    async fn test_new_attempt_clears_previous_results() {
        let (backend, panel) = panel();
        let me = user("g-1");
        let tags = vec!["pizza".to_string()];
        backend.on_recommend(Ok(vec![Recommendation::new("abc", "A", "r")]));
        backend.on_recommend(Err(http_error(500, "Internal Server Error", None)));

        panel.fetch_recommendations(Some(&me), &tags).await.unwrap();
        assert_eq!(panel.recommendations().await.items().len(), 1);

        panel.fetch_recommendations(Some(&me), &tags).await.unwrap_err();
        assert!(panel.recommendations().await.items().is_empty());

        panel.clear_recommendations().await;
        assert_eq!(panel.recommendations().await, FeatureState::Idle);
    }
}
