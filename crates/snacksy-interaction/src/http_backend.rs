//! HttpBackend - REST client for the Snacksy backend.
//!
//! Credentialed endpoints are authenticated by the session cookie the login
//! endpoint sets; the shared [`SessionCookies`] jar carries it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::SET_COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snacksy_core::backend::{BackendError, SnacksyBackend};
use snacksy_core::config::AppConfig;
use snacksy_core::error::{Result, SnacksyError};
use snacksy_core::image::ImageUpload;
use snacksy_core::user::UserRecord;
use snacksy_core::video::{LikedVideo, Recommendation};

use crate::session_cookies::SessionCookies;

const LOGIN_PATH: &str = "/auth/google/login";
const LOGOUT_PATH: &str = "/auth/logout";
const SUGGEST_PATH: &str = "/api/suggest_video";
const ACTIVITY_PATH: &str = "/api/youtube_activity";
const RECOMMEND_PATH: &str = "/api/recommend_video";

/// [`SnacksyBackend`] over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    cookies: Arc<SessionCookies>,
}

impl HttpBackend {
    /// Builds a client for `config.api_base_url` sharing `cookies`.
    pub fn new(config: &AppConfig, cookies: Arc<SessionCookies>) -> Result<Self> {
        let mut builder = Client::builder().cookie_provider(cookies.jar());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SnacksyError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns non-success statuses into
    /// [`BackendError::Http`].
    async fn send(&self, request: RequestBuilder, path: &str) -> std::result::Result<Response, BackendError> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!("[HttpBackend] {} request failed: {}", path, err);
            BackendError::Network(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("[HttpBackend] {} -> {}", path, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = map_http_error(status, &body);
        tracing::warn!("[HttpBackend] {} -> {} ({:?})", path, status, error);
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        path: &str,
    ) -> std::result::Result<T, BackendError> {
        response.json::<T>().await.map_err(|err| {
            BackendError::Network(format!("Failed to parse {} response: {}", path, err))
        })
    }
}

#[async_trait]
impl SnacksyBackend for HttpBackend {
    async fn login(&self, code: &str) -> std::result::Result<UserRecord, BackendError> {
        let request = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { code });
        let response = self.send(request, LOGIN_PATH).await?;
        self.cookies.record_set_cookies(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        let user: UserRecord = Self::decode(response, LOGIN_PATH).await?;

        if let Err(e) = self.cookies.persist() {
            tracing::warn!("[HttpBackend] Failed to persist session cookie: {}", e);
        }
        Ok(user)
    }

    async fn logout(&self) -> std::result::Result<(), BackendError> {
        let request = self.client.post(self.url(LOGOUT_PATH));
        let result = self.send(request, LOGOUT_PATH).await.map(|_| ());

        // The local credential goes away whatever the server said.
        if let Err(e) = self.cookies.clear() {
            tracing::warn!("[HttpBackend] Failed to clear session cookie: {}", e);
        }
        result
    }

    async fn suggest_tags(
        &self,
        image: &ImageUpload,
    ) -> std::result::Result<Vec<String>, BackendError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|err| {
                BackendError::Network(format!(
                    "Invalid content type '{}': {}",
                    image.content_type, err
                ))
            })?;
        let form = Form::new().part("file", part);

        let request = self.client.post(self.url(SUGGEST_PATH)).multipart(form);
        let response = self.send(request, SUGGEST_PATH).await?;
        let body: SuggestResponse = Self::decode(response, SUGGEST_PATH).await?;
        Ok(body.detected_tags.unwrap_or_default())
    }

    async fn youtube_activity(&self) -> std::result::Result<Vec<LikedVideo>, BackendError> {
        let request = self.client.get(self.url(ACTIVITY_PATH));
        let response = self.send(request, ACTIVITY_PATH).await?;
        Self::decode(response, ACTIVITY_PATH).await
    }

    async fn recommend_videos(
        &self,
        food_tags: &[String],
    ) -> std::result::Result<Vec<Recommendation>, BackendError> {
        let request = self
            .client
            .post(self.url(RECOMMEND_PATH))
            .json(&RecommendRequest { food_tags });
        let response = self.send(request, RECOMMEND_PATH).await?;
        Self::decode(response, RECOMMEND_PATH).await
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct RecommendRequest<'a> {
    food_tags: &'a [String],
}

#[derive(Deserialize)]
struct SuggestResponse {
    detected_tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Builds [`BackendError::Http`] from a FastAPI-style error body.
///
/// Only a string `detail` is kept; validation-error arrays and non-JSON
/// bodies fall back to the caller's generic message.
fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(text) => Some(text),
            _ => None,
        });

    BackendError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        detail,
    }
}
