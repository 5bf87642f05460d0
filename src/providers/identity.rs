//! Injected identity SDK capability for redirect-based OAuth login.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by an identity SDK call.
#[derive(Error, Debug, Clone)]
pub enum IdentityCallError {
    #[error("user is not logged in with the identity SDK")]
    NotLoggedIn,
    #[error("{0}")]
    Call(String),
}

/// Profile details returned by the OAuth provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl OAuthProfile {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.picture.is_none()
    }
}

/// Outcome of the redirect return leg.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectResult {
    /// Address derived by the SDK for the authenticated user.
    pub address: String,
    pub profile: OAuthProfile,
}

/// Redirect-based OAuth capability backed by an external identity SDK.
///
/// The SDK owns the whole federated identity protocol. The client only
/// sequences the redirect leg, the return leg, and token issuance.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Start the redirect challenge for `provider` (for example "google").
    /// The browser navigates away; the call resolves when the redirect has
    /// been dispatched.
    async fn login_with_redirect(
        &self,
        provider: &str,
        redirect_uri: &str,
    ) -> Result<(), IdentityCallError>;

    /// Resolve the pending redirect after the browser navigates back.
    async fn redirect_result(&self) -> Result<RedirectResult, IdentityCallError>;

    /// Whether the SDK currently holds an authenticated user.
    async fn is_logged_in(&self) -> Result<bool, IdentityCallError>;

    /// Produce the signature-equivalent token for `message`. This is an
    /// SDK-derived artifact, not a raw wallet signature.
    async fn issue_token(&self, message: &str, account: &str)
        -> Result<String, IdentityCallError>;

    /// Terminate the SDK-side session.
    async fn logout(&self) -> Result<(), IdentityCallError>;
}
