//! Per-feature request state.
//!
//! Every fetch-driven feature (image tagging, liked-video activity,
//! recommendations) moves through the same small state machine:
//!
//! ```text
//! Idle ──begin()──▶ Loading ──succeed()──▶ Ready { items, notice }
//!   ▲                  │
//!   │                  └────fail()──────▶ Failed(FeatureError)
//!   └──────reset()──────────────────────────────┘
//! ```
//!
//! Validation failures skip `Loading` entirely and go straight to `Failed`.
//! Each transition replaces the previous state wholesale, so results from an
//! earlier attempt never survive a new one.

use thiserror::Error;

/// A user-visible failure of one feature.
///
/// The `Display` output is the exact message shown next to the feature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// A precondition was not met; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The identity provider's consent window was dismissed.
    #[error("Login popup was closed before completing authentication.")]
    PopupClosed,

    /// The identity provider reported a failure.
    #[error("{0}")]
    Provider(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("{0}")]
    Network(String),

    /// A successful response that is surfaced as an error-style message
    /// because it carries nothing to show.
    #[error("{0}")]
    Empty(String),

    /// A request for this feature is already in flight.
    #[error("A request is already in progress.")]
    Busy,
}

impl FeatureError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The message rendered for this error.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The request/response state of one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureState<T> {
    /// Nothing requested yet, or cleared.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded. `notice` carries an informational,
    /// non-error message (e.g. an explained empty result).
    Ready {
        items: Vec<T>,
        notice: Option<String>,
    },
    /// The last attempt failed.
    Failed(FeatureError),
}

impl<T> Default for FeatureState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FeatureState<T> {
    /// Enters `Loading`, dropping previous results and errors.
    pub fn begin(&mut self) {
        *self = Self::Loading;
    }

    /// Records a successful response.
    pub fn succeed(&mut self, items: Vec<T>, notice: Option<String>) {
        *self = Self::Ready { items, notice };
    }

    /// Records a failed attempt.
    pub fn fail(&mut self, error: FeatureError) {
        *self = Self::Failed(error);
    }

    /// Returns to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Items of the last successful response, empty in every other state.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready { items, .. } => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&FeatureError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Ready { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }
}
