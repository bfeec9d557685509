//! SessionController - owns the signed-in user.
//!
//! Sign-in runs the identity provider's authorization-code flow and exchanges
//! the code with the backend; the resulting [`UserRecord`] is kept in memory
//! and mirrored to local storage through [`SessionStore`]. The stored record
//! is read back only once, at construction.

use std::sync::Arc;

use snacksy_core::FeatureError;
use snacksy_core::auth::{AuthorizationRequest, IdentityProvider};
use snacksy_core::backend::SnacksyBackend;
use snacksy_core::config::AppConfig;
use snacksy_core::user::{SessionStore, UserRecord};
use tokio::sync::RwLock;

pub const SIGN_IN_NOT_CONFIGURED: &str = "Google sign-in is not configured (missing client id).";
const LOGIN_FAILED_ON_BACKEND: &str = "Login failed on backend.";
const LOGIN_NETWORK_ERROR: &str = "An error occurred during login.";

#[derive(Debug, Default)]
struct SessionState {
    user: Option<UserRecord>,
    auth_error: Option<FeatureError>,
}

/// Mediates sign-in and sign-out and exposes the current user.
pub struct SessionController {
    provider: Arc<dyn IdentityProvider>,
    backend: Arc<dyn SnacksyBackend>,
    store: SessionStore,
    client_id: Option<String>,
    redirect_uri: String,
    state: RwLock<SessionState>,
}

impl SessionController {
    /// Creates the controller and restores the stored user, if any.
    pub fn new(
        config: &AppConfig,
        provider: Arc<dyn IdentityProvider>,
        backend: Arc<dyn SnacksyBackend>,
        store: SessionStore,
    ) -> Self {
        let client_id = config.client_id().map(str::to_string);
        if client_id.is_none() {
            tracing::error!("[Session] Google client id is not configured; sign-in is disabled");
        }

        let user = store.restore();
        if let Some(user) = &user {
            tracing::info!("[Session] Restored session for {}", user.display_name());
        }

        Self {
            provider,
            backend,
            store,
            client_id,
            redirect_uri: config.google_redirect_uri.clone(),
            state: RwLock::new(SessionState {
                user,
                auth_error: None,
            }),
        }
    }

    /// Whether a client id is available for sign-in.
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    pub async fn current_user(&self) -> Option<UserRecord> {
        self.state.read().await.user.clone()
    }

    pub async fn auth_error(&self) -> Option<FeatureError> {
        self.state.read().await.auth_error.clone()
    }

    /// Runs the provider flow and exchanges the code with the backend.
    ///
    /// Any failure leaves no user in memory or storage and is recorded as
    /// the auth error.
    pub async fn sign_in(&self) -> Result<UserRecord, FeatureError> {
        let Some(client_id) = self.client_id.clone() else {
            let error = FeatureError::validation(SIGN_IN_NOT_CONFIGURED);
            self.state.write().await.auth_error = Some(error.clone());
            return Err(error);
        };

        self.state.write().await.auth_error = None;

        let request = AuthorizationRequest::new(client_id, self.redirect_uri.clone());
        tracing::info!("[Session] Requesting authorization code");

        let code = match self.provider.request_code(&request).await {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("[Session] Identity provider error: {}", e);
                return Err(self.fail(e.into_feature_error()).await);
            }
        };

        match self.backend.login(&code).await {
            Ok(user) => {
                if let Err(e) = self.store.persist(&user) {
                    tracing::error!("[Session] Failed to store user record: {}", e);
                    return Err(self.fail(FeatureError::Network(e.to_string())).await);
                }
                tracing::info!("[Session] Signed in as {}", user.display_name());

                let mut state = self.state.write().await;
                state.user = Some(user.clone());
                state.auth_error = None;
                Ok(user)
            }
            Err(e) => {
                tracing::warn!("[Session] Backend login failed: {}", e);
                let error =
                    e.into_feature_error(|_, _| LOGIN_FAILED_ON_BACKEND.to_string(), LOGIN_NETWORK_ERROR);
                Err(self.fail(error).await)
            }
        }
    }

    /// Signs out locally and notifies the backend.
    ///
    /// The backend notification is best effort; the user record and the
    /// auth error are cleared whatever it returns.
    pub async fn sign_out(&self) {
        self.provider.logout();

        if let Err(e) = self.backend.logout().await {
            tracing::warn!("[Session] Backend logout failed: {}", e);
        }

        self.clear_stored();
        let mut state = self.state.write().await;
        state.user = None;
        state.auth_error = None;
        tracing::info!("[Session] Signed out");
    }

    async fn fail(&self, error: FeatureError) -> FeatureError {
        self.clear_stored();
        let mut state = self.state.write().await;
        state.user = None;
        state.auth_error = Some(error.clone());
        error
    }

    fn clear_stored(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("[Session] Failed to remove stored user: {}", e);
        }
    }
}
