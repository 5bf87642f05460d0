//! Redirect-based OAuth login through the injected identity SDK.
//!
//! The flow has two legs. `begin` dispatches the redirect challenge and the
//! browser navigates away. After it navigates back, `complete` (or `resume`,
//! which first checks for the callback marker in the URL) retrieves the
//! authenticated user and produces the token artifact.

use tracing::info;

use super::AuthClient;
use crate::errors::AuthError;
use crate::providers::identity::IdentityProvider;
use crate::session::{Credential, Session};

/// Query/fragment marker appended to the redirect URI.
pub(crate) const CALLBACK_MARKER: &str = "oauth_callback";

/// Whether a location's search or hash carries the callback marker.
pub(crate) fn has_callback_marker(search: &str, hash: &str) -> bool {
    search.contains(CALLBACK_MARKER) || hash.contains(CALLBACK_MARKER)
}

/// Build the redirect URI for the current page.
pub(crate) fn callback_uri(protocol: &str, host: &str, pathname: &str) -> String {
    format!("{}//{}{}?{}=true", protocol, host, pathname, CALLBACK_MARKER)
}

/// Read the callback marker from the live browser location.
#[cfg(target_arch = "wasm32")]
pub(crate) fn callback_present() -> bool {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return false;
    };
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let present = has_callback_marker(&search, &hash);
    crate::console_debug!("OAuth callback marker present: {}", present);
    present
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn callback_present() -> bool {
    false
}

/// Redirect URI derived from the live browser location, host port included.
#[cfg(target_arch = "wasm32")]
pub(crate) fn current_callback_uri() -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let pathname = location.pathname().ok()?;
    Some(callback_uri(&protocol, &host, &pathname))
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn current_callback_uri() -> Option<String> {
    None
}

fn identity_capability(client: &AuthClient) -> Result<std::rc::Rc<dyn IdentityProvider>, AuthError> {
    if client.config.oauth_api_key.is_none() {
        return Err(AuthError::Configuration {
            message: "Identity SDK not initialized: missing OAuth API key".to_string(),
        });
    }
    client
        .identity
        .clone()
        .ok_or_else(|| AuthError::Configuration {
            message: "Identity SDK not initialized: no IdentityProvider injected".to_string(),
        })
}

fn resolve_redirect_uri(client: &AuthClient) -> Result<String, AuthError> {
    if let Some(redirect) = &client.config.redirect_url {
        return Ok(redirect.clone());
    }
    current_callback_uri().ok_or_else(|| AuthError::Configuration {
        message: "A redirect URL is required outside a browser context".to_string(),
    })
}

/// Dispatch the redirect challenge.
pub(crate) async fn begin_impl(client: &AuthClient, provider: &str) -> Result<(), AuthError> {
    let identity = identity_capability(client)?;
    let redirect_uri = resolve_redirect_uri(client)?;

    info!("Starting OAuth redirect via {}", provider);
    match identity.login_with_redirect(provider, &redirect_uri).await {
        Ok(()) => Ok(()),
        Err(err) => {
            let err = AuthError::Authentication {
                message: err.to_string(),
            };
            client.observers.notify_login_error(&err);
            Err(err)
        }
    }
}

/// Finish the return leg after the browser navigated back.
pub(crate) async fn complete_impl(client: &AuthClient) -> Result<Session, AuthError> {
    let identity = identity_capability(client)?;

    match finish_challenge(client, identity.as_ref()).await {
        Ok(session) => {
            info!("OAuth login complete for {}", session.wallet);
            client.observers.notify_login(&session);
            Ok(session)
        }
        Err(err) => {
            client.observers.notify_login_error(&err);
            Err(err)
        }
    }
}

async fn finish_challenge(
    client: &AuthClient,
    identity: &dyn IdentityProvider,
) -> Result<Session, AuthError> {
    let result = identity
        .redirect_result()
        .await
        .map_err(|e| AuthError::Authentication {
            message: format!("Failed to resolve OAuth redirect: {}", e),
        })?;

    // The token is an SDK-derived artifact, intentionally distinct from a
    // wallet signature.
    let token = identity
        .issue_token(&client.config.message_to_sign, &result.address)
        .await
        .map_err(|e| AuthError::Authentication {
            message: format!("Failed to issue OAuth token: {}", e),
        })?;

    let is_permittee = super::wallet_flow::check_permittee(client, &result.address).await;

    let session = Session {
        wallet: result.address,
        credential: Credential::OauthToken(token),
        is_permittee,
        profile: if result.profile.is_empty() {
            None
        } else {
            Some(result.profile)
        },
    };
    client.sessions.store(&session)?;
    Ok(session)
}

/// Complete a pending login iff the callback marker is present.
pub(crate) async fn resume_impl(client: &AuthClient) -> Result<Option<Session>, AuthError> {
    if !callback_present() {
        return Ok(None);
    }
    complete_impl(client).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_marker_detection() {
        assert!(has_callback_marker("?oauth_callback=true", ""));
        assert!(has_callback_marker("?a=1&oauth_callback=true", ""));
        assert!(has_callback_marker("", "#oauth_callback"));
        assert!(!has_callback_marker("?provider=google", "#top"));
        assert!(!has_callback_marker("", ""));
    }

    #[test]
    fn test_callback_uri_shape() {
        assert_eq!(
            callback_uri("https:", "app.example.com", "/login"),
            "https://app.example.com/login?oauth_callback=true"
        );
        assert_eq!(
            callback_uri("http:", "localhost:8080", "/"),
            "http://localhost:8080/?oauth_callback=true"
        );
    }
}
