//! Upward reporting of detected tags.

use async_trait::async_trait;

/// Observer notified whenever the tagging widget replaces its tag list,
/// including when it clears it.
#[async_trait]
pub trait TagsListener: Send + Sync {
    async fn tags_detected(&self, tags: &[String]);
}
