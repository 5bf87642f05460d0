//! Locally persisted session state.
//!
//! A session is created by a successful login, written to storage
//! immediately, read back on page load, and removed entirely on logout. The
//! session manager owns the record exclusively; hosts observe it through the
//! facade accessors.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AuthError;
use crate::providers::identity::OAuthProfile;
use crate::providers::storage::KeyValueStore;

pub mod token;

/// Storage keys used by the session manager. The layout mirrors the classic
/// dashboard keys so operators recognize them in devtools; it is not a
/// contract.
mod keys {
    pub const WALLET: &str = "genobank_wallet";
    pub const SIGNATURE: &str = "genobank_signature";
    pub const LOGIN_METHOD: &str = "genobank_login_method";
    pub const IS_PERMITTEE: &str = "genobank_is_permittee";
    pub const PROFILE_EMAIL: &str = "genobank_profile_email";
    pub const PROFILE_NAME: &str = "genobank_profile_name";
    pub const PROFILE_PICTURE: &str = "genobank_profile_picture";

    pub const ALL: [&str; 7] = [
        WALLET,
        SIGNATURE,
        LOGIN_METHOD,
        IS_PERMITTEE,
        PROFILE_EMAIL,
        PROFILE_NAME,
        PROFILE_PICTURE,
    ];
}

/// How the current session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Wallet,
    Oauth,
}

impl LoginMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMethod::Wallet => "wallet",
            LoginMethod::Oauth => "oauth",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "wallet" => Some(LoginMethod::Wallet),
            "oauth" => Some(LoginMethod::Oauth),
            _ => None,
        }
    }
}

/// The signature-equivalent artifact produced by a login flow.
///
/// A raw wallet signature and an SDK-derived token are semantically different
/// values even though remote endpoints accept either as a bearer credential,
/// so the distinction is kept in the type instead of an overloaded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Credential {
    WalletSignature(String),
    OauthToken(String),
}

impl Credential {
    /// Raw bearer value for API query parameters.
    pub fn bearer(&self) -> &str {
        match self {
            Credential::WalletSignature(value) | Credential::OauthToken(value) => value,
        }
    }

    pub fn method(&self) -> LoginMethod {
        match self {
            Credential::WalletSignature(_) => LoginMethod::Wallet,
            Credential::OauthToken(_) => LoginMethod::Oauth,
        }
    }
}

/// The locally persisted record of the current authenticated identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub wallet: String,
    pub credential: Credential,
    pub is_permittee: bool,
    pub profile: Option<OAuthProfile>,
}

impl Session {
    pub fn method(&self) -> LoginMethod {
        self.credential.method()
    }
}

/// Owns the persisted session record.
pub struct SessionManager {
    store: Box<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly established session.
    ///
    /// Writes every field up front; the first failed write surfaces to the
    /// caller without retry or rollback.
    pub fn store(&self, session: &Session) -> Result<(), AuthError> {
        self.store.set(keys::WALLET, &session.wallet)?;
        self.store.set(keys::SIGNATURE, session.credential.bearer())?;
        self.store
            .set(keys::LOGIN_METHOD, session.method().as_str())?;
        self.store.set(
            keys::IS_PERMITTEE,
            if session.is_permittee { "true" } else { "false" },
        )?;
        if let Some(profile) = &session.profile {
            if let Some(email) = &profile.email {
                self.store.set(keys::PROFILE_EMAIL, email)?;
            }
            if let Some(name) = &profile.name {
                self.store.set(keys::PROFILE_NAME, name)?;
            }
            if let Some(picture) = &profile.picture {
                self.store.set(keys::PROFILE_PICTURE, picture)?;
            }
        }
        info!("Session stored for wallet: {}", session.wallet);
        Ok(())
    }

    /// Restore the persisted session, if any.
    ///
    /// A session needs at least the wallet/signature pair. An unknown method
    /// tag is treated as a wallet signature so stale records stay usable.
    pub fn load(&self) -> Option<Session> {
        let wallet = self.store.get(keys::WALLET)?;
        let signature = self.store.get(keys::SIGNATURE)?;

        let method = self
            .store
            .get(keys::LOGIN_METHOD)
            .and_then(|raw| LoginMethod::parse(&raw))
            .unwrap_or_else(|| {
                warn!("Stored session has no usable login method, assuming wallet");
                LoginMethod::Wallet
            });

        let credential = match method {
            LoginMethod::Wallet => Credential::WalletSignature(signature),
            LoginMethod::Oauth => Credential::OauthToken(signature),
        };

        let profile = OAuthProfile {
            email: self.store.get(keys::PROFILE_EMAIL),
            name: self.store.get(keys::PROFILE_NAME),
            picture: self.store.get(keys::PROFILE_PICTURE),
        };

        Some(Session {
            wallet,
            credential,
            is_permittee: self.store.get(keys::IS_PERMITTEE).as_deref() == Some("true"),
            profile: if profile.is_empty() {
                None
            } else {
                Some(profile)
            },
        })
    }

    /// Delete every session key. Safe to call when already logged out.
    pub fn clear(&self) {
        for key in keys::ALL {
            self.store.remove(key);
        }
        info!("Session cleared");
    }

    /// True iff a wallet/signature pair is present.
    pub fn is_logged_in(&self) -> bool {
        self.store.get(keys::WALLET).is_some() && self.store.get(keys::SIGNATURE).is_some()
    }

    pub fn wallet(&self) -> Option<String> {
        self.store.get(keys::WALLET)
    }

    pub fn login_method(&self) -> Option<LoginMethod> {
        self.store
            .get(keys::LOGIN_METHOD)
            .and_then(|raw| LoginMethod::parse(&raw))
    }

    pub fn credential(&self) -> Option<Credential> {
        self.load().map(|session| session.credential)
    }

    pub fn is_permittee(&self) -> bool {
        self.store.get(keys::IS_PERMITTEE).as_deref() == Some("true")
    }
}
