//! ImageTagger - single-file upload to the tagging endpoint.

use std::sync::Arc;

use snacksy_core::backend::SnacksyBackend;
use snacksy_core::image::ImageUpload;
use snacksy_core::tags::TagsListener;
use snacksy_core::{FeatureError, FeatureState};
use tokio::sync::RwLock;

pub const SELECT_IMAGE_FIRST: &str = "Please select an image first.";
pub const NO_TAGS_DETECTED: &str = "No food tags detected for the uploaded image.";
const UPLOAD_NETWORK_ERROR: &str =
    "A network error occurred. Ensure the backend server is running.";

#[derive(Debug, Default)]
struct TaggerState {
    pending: Option<ImageUpload>,
    tags: FeatureState<String>,
    /// Set from submission until the request settles; selecting a file or
    /// resetting never clears it.
    uploading: bool,
}

/// Holds the pending file and the tags of the last upload.
///
/// Every change to the tag list, clearing included, is reported to the
/// listener registered at construction.
pub struct ImageTagger {
    backend: Arc<dyn SnacksyBackend>,
    listener: Arc<dyn TagsListener>,
    state: RwLock<TaggerState>,
}

impl ImageTagger {
    pub fn new(backend: Arc<dyn SnacksyBackend>, listener: Arc<dyn TagsListener>) -> Self {
        Self {
            backend,
            listener,
            state: RwLock::new(TaggerState::default()),
        }
    }

    /// Records `file` as pending and clears tags and errors.
    pub async fn select_file(&self, file: ImageUpload) {
        tracing::debug!(
            "[ImageTagger] Selected {} ({} bytes)",
            file.file_name,
            file.len()
        );
        {
            let mut state = self.state.write().await;
            state.pending = Some(file);
            state.tags.reset();
        }
        self.listener.tags_detected(&[]).await;
    }

    /// Uploads the pending file and reports the detected tags.
    ///
    /// Rejected with [`FeatureError::Busy`] while another upload is in
    /// flight; the state of that upload is left alone.
    pub async fn upload(&self) -> Result<Vec<String>, FeatureError> {
        let image = {
            let mut state = self.state.write().await;
            if state.uploading {
                return Err(FeatureError::Busy);
            }
            let Some(image) = state.pending.clone() else {
                let error = FeatureError::validation(SELECT_IMAGE_FIRST);
                state.tags.fail(error.clone());
                return Err(error);
            };
            state.uploading = true;
            state.tags.begin();
            image
        };
        self.listener.tags_detected(&[]).await;

        tracing::info!("[ImageTagger] Uploading {}", image.file_name);
        match self.backend.suggest_tags(&image).await {
            Ok(tags) => {
                let notice = tags.is_empty().then(|| NO_TAGS_DETECTED.to_string());
                tracing::info!("[ImageTagger] Detected {} tag(s)", tags.len());
                {
                    let mut state = self.state.write().await;
                    state.uploading = false;
                    state.tags.succeed(tags.clone(), notice);
                }
                self.listener.tags_detected(&tags).await;
                Ok(tags)
            }
            Err(e) => {
                tracing::warn!("[ImageTagger] Upload failed: {}", e);
                let error = e.into_feature_error(
                    |status, reason| format!("Error: {} {}", status, reason),
                    UPLOAD_NETWORK_ERROR,
                );
                {
                    let mut state = self.state.write().await;
                    state.uploading = false;
                    state.tags.fail(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Drops tags and errors; the pending file stays selected and an upload
    /// in flight still counts as busy.
    pub async fn reset(&self) {
        self.state.write().await.tags.reset();
    }

    pub async fn pending_file(&self) -> Option<String> {
        self.state
            .read()
            .await
            .pending
            .as_ref()
            .map(|file| file.file_name.clone())
    }

    /// Whether an upload is in flight.
    pub async fn is_uploading(&self) -> bool {
        self.state.read().await.uploading
    }

    pub async fn tags_state(&self) -> FeatureState<String> {
        self.state.read().await.tags.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, RecordingListener, http_error, image};
    use snacksy_core::backend::BackendError;
    use std::time::Duration;

    fn tagger() -> (Arc<FakeBackend>, Arc<RecordingListener>, ImageTagger) {
        let backend = Arc::new(FakeBackend::new());
        let listener = Arc::new(RecordingListener::default());
        let tagger = ImageTagger::new(backend.clone(), listener.clone());
        (backend, listener, tagger)
    }

    #[tokio::test]
    async fn test_upload_without_file_issues_no_request() {
        let (backend, listener, tagger) = tagger();

        let err = tagger.upload().await.unwrap_err();

        assert_eq!(err.message(), SELECT_IMAGE_FIRST);
        assert!(err.is_validation());
        assert_eq!(backend.upload_count(), 0);
        assert!(listener.reports.lock().unwrap().is_empty());
        assert_eq!(tagger.tags_state().await.error(), Some(&err));
    }

    #[tokio::test]
    async fn test_select_file_clears_and_reports() {
        let (backend, listener, tagger) = tagger();
        backend.on_suggest(Ok(vec!["sushi".into()]));
        tagger.select_file(image("a.jpg")).await;
        tagger.upload().await.unwrap();

        tagger.select_file(image("b.jpg")).await;

        assert_eq!(tagger.tags_state().await, FeatureState::Idle);
        assert_eq!(tagger.pending_file().await.as_deref(), Some("b.jpg"));
        let reports = listener.reports.lock().unwrap();
        assert_eq!(reports.last().unwrap(), &Vec::<String>::new());
        assert_eq!(backend.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_reports_cleared_then_detected() {
        let (backend, listener, tagger) = tagger();
        backend.on_suggest(Ok(vec!["pizza".into(), "cheese".into()]));
        tagger.select_file(image("pizza.jpg")).await;

        let tags = tagger.upload().await.unwrap();

        assert_eq!(tags, vec!["pizza".to_string(), "cheese".to_string()]);
        assert_eq!(tagger.tags_state().await.items(), tags.as_slice());
        let reports = listener.reports.lock().unwrap();
        assert_eq!(
            reports.as_slice(),
            [vec![], vec![], vec!["pizza".to_string(), "cheese".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_empty_tags_is_notice_not_error() {
        let (backend, _, tagger) = tagger();
        backend.on_suggest(Ok(vec![]));
        tagger.select_file(image("plate.jpg")).await;

        let tags = tagger.upload().await.unwrap();

        assert!(tags.is_empty());
        let state = tagger.tags_state().await;
        assert!(state.error().is_none());
        assert_eq!(state.notice(), Some(NO_TAGS_DETECTED));
    }

    #[tokio::test]
    async fn test_http_error_detail_or_status_line() {
        let (backend, _, tagger) = tagger();
        backend.on_suggest(Err(http_error(400, "Bad Request", Some("Invalid image file"))));
        backend.on_suggest(Err(http_error(503, "Service Unavailable", None)));
        tagger.select_file(image("x.jpg")).await;

        let err = tagger.upload().await.unwrap_err();
        assert_eq!(err.message(), "Invalid image file");

        let err = tagger.upload().await.unwrap_err();
        assert_eq!(err.message(), "Error: 503 Service Unavailable");
        assert!(tagger.tags_state().await.items().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_fallback() {
        let (backend, _, tagger) = tagger();
        backend.on_suggest(Err(BackendError::Network(String::new())));
        tagger.select_file(image("x.jpg")).await;

        let err = tagger.upload().await.unwrap_err();
        assert_eq!(err.message(), UPLOAD_NETWORK_ERROR);
    }

    #[tokio::test]
    async fn test_second_upload_while_busy_is_rejected() {
        let (backend, _, tagger) = tagger();
        let tagger = Arc::new(tagger);
        backend.on_suggest_after(Duration::from_millis(200), Ok(vec!["ramen".into()]));
        tagger.select_file(image("ramen.jpg")).await;

        let first = tokio::spawn({
            let tagger = tagger.clone();
            async move { tagger.upload().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = tagger.upload().await;
        assert_eq!(second, Err(FeatureError::Busy));

        assert_eq!(first.await.unwrap().unwrap(), vec!["ramen".to_string()]);
        assert_eq!(backend.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_selecting_or_resetting_during_upload_keeps_busy() {
        let (backend, _, tagger) = tagger();
        let tagger = Arc::new(tagger);
        backend.on_suggest_after(Duration::from_millis(200), Ok(vec!["ramen".into()]));
        backend.on_suggest(Ok(vec!["salad".into()]));
        tagger.select_file(image("ramen.jpg")).await;

        let first = tokio::spawn({
            let tagger = tagger.clone();
            async move { tagger.upload().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        tagger.select_file(image("salad.jpg")).await;
        assert!(tagger.is_uploading().await);
        assert_eq!(tagger.upload().await, Err(FeatureError::Busy));
        tagger.reset().await;
        assert_eq!(tagger.upload().await, Err(FeatureError::Busy));

        first.await.unwrap().unwrap();
        assert!(!tagger.is_uploading().await);
        assert_eq!(backend.upload_count(), 1);

        let tags = tagger.upload().await.unwrap();
        assert_eq!(tags, vec!["salad".to_string()]);
        assert_eq!(backend.upload_count(), 2);
    }
}
