//! Identity provider trait and the authorization request it serves.

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use uuid::Uuid;

use crate::feature::FeatureError;

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Basic identity plus read-only access to the user's YouTube activity.
pub const SIGN_IN_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/youtube.readonly",
];

const GENERIC_PROVIDER_FAILURE: &str = "Google login failed.";

/// Parameters of one authorization-code request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Anti-forgery token echoed back on the redirect.
    pub state: String,
}

impl AuthorizationRequest {
    /// Creates a request for [`SIGN_IN_SCOPES`] with a fresh `state`.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: SIGN_IN_SCOPES.iter().map(|s| s.to_string()).collect(),
            state: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Space-separated scope string.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Consent URL the user has to visit.
    ///
    /// Offline access with forced consent, so the backend receives a refresh
    /// token it can use for later activity fetches.
    pub fn authorization_url(&self) -> String {
        let scope = self.scope();
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("include_granted_scopes", "true"),
            ("state", self.state.as_str()),
        ];
        match Url::parse_with_params(GOOGLE_AUTH_ENDPOINT, &params) {
            Ok(url) => url.to_string(),
            // The endpoint constant is a valid URL; keep a usable string anyway.
            Err(_) => GOOGLE_AUTH_ENDPOINT.to_string(),
        }
    }
}

/// Failure reported by the identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The user dismissed the consent window.
    #[error("consent window closed")]
    PopupClosed,

    /// Any other provider-side failure.
    #[error("provider failure: error={error:?} description={description:?}")]
    Failed {
        error: Option<String>,
        description: Option<String>,
    },
}

impl ProviderError {
    pub fn failed(error: impl Into<String>, description: Option<String>) -> Self {
        Self::Failed {
            error: Some(error.into()),
            description,
        }
    }

    /// Converts into the auth error shown to the user: the description,
    /// else the error code, else a generic message.
    pub fn into_feature_error(self) -> FeatureError {
        match self {
            ProviderError::PopupClosed => FeatureError::PopupClosed,
            ProviderError::Failed { error, description } => FeatureError::Provider(
                description
                    .filter(|d| !d.is_empty())
                    .or(error.filter(|e| !e.is_empty()))
                    .unwrap_or_else(|| GENERIC_PROVIDER_FAILURE.to_string()),
            ),
        }
    }
}

/// Obtains authorization codes from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the consent flow and returns the authorization code.
    async fn request_code(&self, request: &AuthorizationRequest) -> Result<String, ProviderError>;

    /// Tears down any provider session held locally.
    fn logout(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_covers_youtube_readonly() {
        let request = AuthorizationRequest::new("client", "http://localhost:5173");
        assert_eq!(
            request.scope(),
            "openid email profile https://www.googleapis.com/auth/youtube.readonly"
        );
    }

    #[test]
    fn test_state_is_unique() {
        let a = AuthorizationRequest::new("client", "http://localhost:5173");
        let b = AuthorizationRequest::new("client", "http://localhost:5173");
        assert_ne!(a.state, b.state);
        assert!(!a.state.is_empty());
    }

    #[test]
    fn test_authorization_url_params() {
        let request = AuthorizationRequest::new("my-client.apps", "http://localhost:5173");
        let url = Url::parse(&request.authorization_url()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "my-client.apps");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["redirect_uri"], "http://localhost:5173");
        assert_eq!(pairs["scope"], request.scope());
        assert_eq!(pairs["state"], request.state);
    }

    #[test]
    fn test_provider_error_messages() {
        assert_eq!(
            ProviderError::PopupClosed.into_feature_error(),
            FeatureError::PopupClosed
        );
        assert_eq!(
            ProviderError::failed("access_denied", Some("User denied access".into()))
                .into_feature_error()
                .message(),
            "User denied access"
        );
        assert_eq!(
            ProviderError::failed("access_denied", None)
                .into_feature_error()
                .message(),
            "access_denied"
        );
        assert_eq!(
            ProviderError::Failed {
                error: None,
                description: None
            }
            .into_feature_error()
            .message(),
            "Google login failed."
        );
    }
}
