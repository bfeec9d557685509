//! Identity provider seam (OAuth authorization-code flow).

pub mod provider;

pub use provider::{
    AuthorizationRequest, GOOGLE_AUTH_ENDPOINT, IdentityProvider, ProviderError, SIGN_IN_SCOPES,
};
