//! Read-only view of the application state for rendering.

use snacksy_core::user::UserRecord;
use snacksy_core::video::{LikedVideo, Recommendation};
use snacksy_core::{FeatureError, FeatureState};

/// Shown when recommendations could be requested but none are on screen.
pub const RECOMMENDATIONS_HINT: &str = "No specific recommendations found for this combination. \
     Try different food or broaden your YouTube activity!";

/// Point-in-time copy of everything the front end displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub user: Option<UserRecord>,
    pub auth_error: Option<FeatureError>,
    pub sign_in_available: bool,
    pub pending_file: Option<String>,
    pub uploading: bool,
    pub tagging: FeatureState<String>,
    pub detected_tags: Vec<String>,
    pub activity: FeatureState<LikedVideo>,
    pub recommendations: FeatureState<Recommendation>,
}

/// One recommendation, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCard {
    pub title: String,
    pub url: String,
    pub reason: String,
}

impl From<&Recommendation> for RecommendationCard {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.display_title().to_string(),
            url: rec.watch_url(),
            reason: rec.reason.clone(),
        }
    }
}

/// One liked video, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedVideoRow {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub duration: String,
    pub views: String,
    pub thumbnail: Option<String>,
}

impl From<&LikedVideo> for LikedVideoRow {
    fn from(video: &LikedVideo) -> Self {
        Self {
            title: video.title.clone(),
            url: video.watch_url(),
            channel: video.channel_title.clone(),
            duration: video.duration.clone(),
            views: video.view_count.clone(),
            thumbnail: video.thumbnail.clone(),
        }
    }
}

impl AppSnapshot {
    /// `Welcome, <email or google id>!` when signed in.
    pub fn welcome_line(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|user| format!("Welcome, {}!", user.display_name()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn can_fetch_activity(&self) -> bool {
        self.is_signed_in() && !self.activity.is_loading()
    }

    pub fn can_recommend(&self) -> bool {
        self.is_signed_in() && !self.detected_tags.is_empty() && !self.recommendations.is_loading()
    }

    pub fn liked_videos(&self) -> Vec<LikedVideoRow> {
        self.activity.items().iter().map(LikedVideoRow::from).collect()
    }

    pub fn recommendation_cards(&self) -> Vec<RecommendationCard> {
        self.recommendations
            .items()
            .iter()
            .map(RecommendationCard::from)
            .collect()
    }

    /// The idle hint under the recommendations button: the user could ask
    /// for recommendations and nothing has been fetched or failed yet.
    pub fn recommendations_hint(&self) -> Option<&'static str> {
        let idle = matches!(self.recommendations, FeatureState::Idle);
        (idle && self.is_signed_in() && !self.detected_tags.is_empty())
            .then_some(RECOMMENDATIONS_HINT)
    }
}
