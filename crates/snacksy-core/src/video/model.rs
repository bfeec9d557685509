//! Liked-video and recommendation models.

use serde::{Deserialize, Deserializer, Serialize};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Public watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

/// One entry of the user's liked-video history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    /// ISO 8601 duration as reported by the platform, e.g. `PT4M13S`.
    #[serde(default)]
    pub duration: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub view_count: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl LikedVideo {
    pub fn watch_url(&self) -> String {
        watch_url(&self.id)
    }
}

/// A backend-selected video with a justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

impl Recommendation {
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Title, falling back to the video id when the generator left it out.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.video_id
        } else {
            &self.title
        }
    }

    pub fn watch_url(&self) -> String {
        watch_url(&self.video_id)
    }
}

/// The platform reports view counts as strings; older payloads used numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
