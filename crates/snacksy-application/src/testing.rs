//! Fakes for the core seams, shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use snacksy_core::auth::{AuthorizationRequest, IdentityProvider, ProviderError};
use snacksy_core::backend::{BackendError, SnacksyBackend};
use snacksy_core::image::ImageUpload;
use snacksy_core::tags::TagsListener;
use snacksy_core::user::UserRecord;
use snacksy_core::video::{LikedVideo, Recommendation};

type Reply<T> = (Duration, Result<T, BackendError>);

/// Scripted backend. Each endpoint pops its next reply; an empty queue
/// answers with an empty success.
#[derive(Default)]
pub struct FakeBackend {
    login: Mutex<VecDeque<Reply<UserRecord>>>,
    logout: Mutex<VecDeque<Reply<()>>>,
    suggest: Mutex<VecDeque<Reply<Vec<String>>>>,
    activity: Mutex<VecDeque<Reply<Vec<LikedVideo>>>>,
    recommend: Mutex<VecDeque<Reply<Vec<Recommendation>>>>,

    pub login_codes: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<String>>,
    pub recommend_tags: Mutex<Vec<Vec<String>>>,
    pub logout_calls: AtomicUsize,
    pub activity_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_login(&self, reply: Result<UserRecord, BackendError>) {
        self.login.lock().unwrap().push_back((Duration::ZERO, reply));
    }

    pub fn on_logout(&self, reply: Result<(), BackendError>) {
        self.logout.lock().unwrap().push_back((Duration::ZERO, reply));
    }

    pub fn on_suggest(&self, reply: Result<Vec<String>, BackendError>) {
        self.on_suggest_after(Duration::ZERO, reply);
    }

    pub fn on_suggest_after(&self, delay: Duration, reply: Result<Vec<String>, BackendError>) {
        self.suggest.lock().unwrap().push_back((delay, reply));
    }

    pub fn on_activity(&self, reply: Result<Vec<LikedVideo>, BackendError>) {
        self.on_activity_after(Duration::ZERO, reply);
    }

    pub fn on_activity_after(&self, delay: Duration, reply: Result<Vec<LikedVideo>, BackendError>) {
        self.activity.lock().unwrap().push_back((delay, reply));
    }

    pub fn on_recommend(&self, reply: Result<Vec<Recommendation>, BackendError>) {
        self.recommend.lock().unwrap().push_back((Duration::ZERO, reply));
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn recommend_count(&self) -> usize {
        self.recommend_tags.lock().unwrap().len()
    }

    async fn next<T: Default>(queue: &Mutex<VecDeque<Reply<T>>>) -> Result<T, BackendError> {
        let (delay, reply) = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(T::default())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

#[async_trait]
impl SnacksyBackend for FakeBackend {
    async fn login(&self, code: &str) -> Result<UserRecord, BackendError> {
        self.login_codes.lock().unwrap().push(code.to_string());
        let reply = self.login.lock().unwrap().pop_front();
        match reply {
            Some((_, reply)) => reply,
            None => Err(BackendError::Network("no login reply scripted".into())),
        }
    }

    async fn logout(&self) -> Result<(), BackendError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.logout).await
    }

    async fn suggest_tags(&self, image: &ImageUpload) -> Result<Vec<String>, BackendError> {
        self.uploads.lock().unwrap().push(image.file_name.clone());
        Self::next(&self.suggest).await
    }

    async fn youtube_activity(&self) -> Result<Vec<LikedVideo>, BackendError> {
        self.activity_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.activity).await
    }

    async fn recommend_videos(
        &self,
        food_tags: &[String],
    ) -> Result<Vec<Recommendation>, BackendError> {
        self.recommend_tags.lock().unwrap().push(food_tags.to_vec());
        Self::next(&self.recommend).await
    }
}

/// Provider answering with a fixed result.
pub struct FakeProvider {
    reply: Mutex<Result<String, ProviderError>>,
    pub requests: AtomicUsize,
    pub logouts: AtomicUsize,
}

impl FakeProvider {
    pub fn answering(reply: Result<String, ProviderError>) -> Self {
        Self {
            reply: Mutex::new(reply),
            requests: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
        }
    }

    pub fn with_code(code: &str) -> Self {
        Self::answering(Ok(code.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn request_code(&self, _request: &AuthorizationRequest) -> Result<String, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.reply.lock().unwrap().clone()
    }

    fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Listener recording every reported tag list.
#[derive(Default)]
pub struct RecordingListener {
    pub reports: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl TagsListener for RecordingListener {
    async fn tags_detected(&self, tags: &[String]) {
        self.reports.lock().unwrap().push(tags.to_vec());
    }
}

pub fn user(google_id: &str) -> UserRecord {
    UserRecord::new(google_id, Some(format!("{}@example.com", google_id)))
}

pub fn image(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn liked(id: &str, title: &str) -> LikedVideo {
    LikedVideo {
        id: id.to_string(),
        title: title.to_string(),
        channel_title: "Food Channel".to_string(),
        duration: "PT5M".to_string(),
        view_count: "42".to_string(),
        thumbnail: None,
    }
}

pub fn http_error(status: u16, reason: &str, detail: Option<&str>) -> BackendError {
    BackendError::Http {
        status,
        reason: reason.to_string(),
        detail: detail.map(str::to_string),
    }
}
