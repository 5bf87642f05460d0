//! Authentication facade.
//!
//! [`AuthClient`] reconciles two structurally different login flows (wallet
//! signature challenge and redirect-based OAuth) into one session record and
//! exposes a uniform query surface over it. Capabilities are injected through
//! [`ProviderSet`]; configuration travels in [`crate::config::AuthConfig`].

use std::cell::Cell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::{AuthConfig, NetworkSpec};
use crate::errors::AuthError;
use crate::providers::identity::IdentityProvider;
use crate::providers::storage::{detect_store, KeyValueStore};
use crate::providers::wallet::{WalletCallError, WalletProvider};
use crate::session::{Credential, LoginMethod, Session, SessionManager};

pub mod observers;
pub(crate) mod oauth_flow;
pub(crate) mod wallet_flow;

pub use observers::AuthObserver;
use observers::ObserverRegistry;

/// Steps of the wallet login sequence, with `Failed` absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Idle,
    RequestingAccounts,
    CheckingNetwork,
    SigningMessage,
    CheckingPermission,
    Complete,
    Failed,
}

/// Capabilities injected at construction time.
///
/// Each capability is optional; an operation that needs a missing one fails
/// with the corresponding error instead of probing the environment.
#[derive(Default)]
pub struct ProviderSet {
    pub wallet: Option<Rc<dyn WalletProvider>>,
    pub identity: Option<Rc<dyn IdentityProvider>>,
    pub storage: Option<Box<dyn KeyValueStore>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(mut self, wallet: Rc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_identity(mut self, identity: Rc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_storage(mut self, storage: Box<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }
}

/// Signing capability behind the current session, for hosts that bind
/// contracts or sign additional payloads with their own chain client.
#[derive(Clone)]
pub enum SignerHandle {
    Wallet(Rc<dyn WalletProvider>),
    Identity(Rc<dyn IdentityProvider>),
}

/// Client-side authentication facade.
pub struct AuthClient {
    pub(crate) config: AuthConfig,
    pub(crate) network: NetworkSpec,
    pub(crate) wallet: Option<Rc<dyn WalletProvider>>,
    pub(crate) identity: Option<Rc<dyn IdentityProvider>>,
    pub(crate) sessions: SessionManager,
    pub(crate) api: ApiClient,
    pub(crate) observers: ObserverRegistry,
    pub(crate) stage: Cell<LoginStage>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .field("network", &self.network)
            .field("stage", &self.stage.get())
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Validate `config`, resolve the network, and assemble the client.
    ///
    /// When no storage backend is injected the client probes localStorage
    /// and degrades to an in-memory map.
    pub fn new(config: AuthConfig, providers: ProviderSet) -> Result<Self, AuthError> {
        let network = config.network_spec()?;
        let api = ApiClient::new(&config.resolved_api_url())?;
        let storage = providers.storage.unwrap_or_else(detect_store);
        let sessions = SessionManager::new(storage);

        if let Some(session) = sessions.load() {
            info!("Restored session for wallet: {}", session.wallet);
        }

        Ok(Self {
            config,
            network,
            wallet: providers.wallet,
            identity: providers.identity,
            sessions,
            api,
            observers: ObserverRegistry::new(),
            stage: Cell::new(LoginStage::Idle),
        })
    }

    /// Register a login lifecycle observer. Observers are invoked in
    /// registration order.
    pub fn add_observer(&self, observer: Rc<dyn AuthObserver>) {
        self.observers.add(observer);
    }

    /// Complete deferred startup work: currently, resuming a pending OAuth
    /// redirect when the callback marker is in the URL and the configuration
    /// asks for it.
    pub async fn initialize(&self) -> Result<Option<Session>, AuthError> {
        if !self.config.auto_resume_oauth {
            return Ok(None);
        }
        self.resume_oauth_login().await
    }

    /// Authenticate through the injected wallet provider.
    pub async fn login_with_wallet(&self) -> Result<Session, AuthError> {
        wallet_flow::login_impl(self).await
    }

    /// Start the redirect-based OAuth challenge for `provider`
    /// (for example "google"). The browser navigates away on success.
    pub async fn login_with_oauth(&self, provider: &str) -> Result<(), AuthError> {
        oauth_flow::begin_impl(self, provider).await
    }

    /// Finish the OAuth return leg after the browser navigated back.
    pub async fn complete_oauth_login(&self) -> Result<Session, AuthError> {
        oauth_flow::complete_impl(self).await
    }

    /// Finish the OAuth return leg iff the callback marker is present in the
    /// current location.
    pub async fn resume_oauth_login(&self) -> Result<Option<Session>, AuthError> {
        oauth_flow::resume_impl(self).await
    }

    /// Stage the wallet login sequence last reached.
    pub fn login_stage(&self) -> LoginStage {
        self.stage.get()
    }

    /// The effective network descriptor.
    pub fn network(&self) -> &NetworkSpec {
        &self.network
    }

    pub fn is_logged_in(&self) -> bool {
        self.sessions.is_logged_in()
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.load()
    }

    pub fn user_wallet(&self) -> Option<String> {
        self.sessions.wallet()
    }

    pub fn login_method(&self) -> Option<LoginMethod> {
        self.sessions.login_method()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.sessions.credential()
    }

    pub fn is_current_user_permittee(&self) -> bool {
        self.sessions.is_permittee()
    }

    /// Clear the session and notify observers. Safe to call when already
    /// logged out. An OAuth session also terminates the SDK-side session;
    /// failure there is logged, not raised.
    pub async fn logout(&self) {
        let method = self.sessions.login_method();
        self.sessions.clear();
        self.stage.set(LoginStage::Idle);

        if method == Some(LoginMethod::Oauth) {
            if let Some(identity) = &self.identity {
                if let Err(err) = identity.logout().await {
                    warn!("Identity SDK logout failed: {}", err);
                }
            }
        }

        self.observers.notify_logout();
    }

    /// Sign `message` with whatever capability produced the current session.
    pub async fn sign_personal_message(&self, message: &str) -> Result<String, AuthError> {
        let session = self.sessions.load().ok_or_else(|| AuthError::Authentication {
            message: "Not logged in or login method is unknown".to_string(),
        })?;

        match session.method() {
            LoginMethod::Wallet => {
                let wallet = self.wallet.clone().ok_or(AuthError::WalletNotDetected)?;
                wallet
                    .sign_message(message, &session.wallet)
                    .await
                    .map_err(|e| match e {
                        WalletCallError::Rejected => AuthError::UserRejected,
                        other => AuthError::Authentication {
                            message: other.to_string(),
                        },
                    })
            }
            LoginMethod::Oauth => {
                let identity = self.identity.clone().ok_or_else(|| AuthError::Configuration {
                    message: "Identity SDK not initialized: no IdentityProvider injected"
                        .to_string(),
                })?;
                identity
                    .issue_token(message, &session.wallet)
                    .await
                    .map_err(|e| AuthError::Authentication {
                        message: e.to_string(),
                    })
            }
        }
    }

    /// The signing capability behind the current session, for contract
    /// binding through the host's own chain client.
    pub fn active_signer(&self) -> Result<SignerHandle, AuthError> {
        let method = self
            .sessions
            .login_method()
            .ok_or_else(|| AuthError::Authentication {
                message: "Not logged in or login method is unknown".to_string(),
            })?;
        match method {
            LoginMethod::Wallet => self
                .wallet
                .clone()
                .map(SignerHandle::Wallet)
                .ok_or(AuthError::WalletNotDetected),
            LoginMethod::Oauth => self
                .identity
                .clone()
                .map(SignerHandle::Identity)
                .ok_or_else(|| AuthError::Configuration {
                    message: "Identity SDK not initialized: no IdentityProvider injected"
                        .to_string(),
                }),
        }
    }

    /// Ask the service whether `address` is flagged as a permittee.
    /// Best-effort: failures degrade to `false`.
    pub async fn validate_permittee(&self, address: &str) -> bool {
        wallet_flow::check_permittee(self, address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::providers::identity::{IdentityCallError, OAuthProfile, RedirectResult};
    use crate::providers::storage::MemoryStore;
    use async_trait::async_trait;
    use std::cell::RefCell;

    // Unroutable local port so permittee checks fail fast and degrade.
    const UNREACHABLE_API: &str = "http://127.0.0.1:9";

    fn test_config() -> AuthConfig {
        AuthConfig {
            api_url: Some(UNREACHABLE_API.to_string()),
            oauth_api_key: Some("pk_test_key".to_string()),
            redirect_url: Some("https://app.example.com/login?oauth_callback=true".to_string()),
            ..AuthConfig::default()
        }
    }

    #[derive(Clone)]
    struct MockWallet {
        accounts: Vec<String>,
        chain: u64,
        sign_error: Option<WalletCallError>,
        switch_error: Option<WalletCallError>,
        switched: Rc<Cell<bool>>,
    }

    impl MockWallet {
        fn on_chain(chain: u64) -> Self {
            Self {
                accounts: vec!["0xuser123".to_string()],
                chain,
                sign_error: None,
                switch_error: None,
                switched: Rc::new(Cell::new(false)),
            }
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for MockWallet {
        async fn request_accounts(&self) -> Result<Vec<String>, WalletCallError> {
            Ok(self.accounts.clone())
        }

        async fn chain_id(&self) -> Result<u64, WalletCallError> {
            Ok(self.chain)
        }

        async fn sign_message(
            &self,
            message: &str,
            _account: &str,
        ) -> Result<String, WalletCallError> {
            match &self.sign_error {
                Some(err) => Err(err.clone()),
                None => Ok(format!("0xsigned:{}", message.len())),
            }
        }

        async fn switch_chain(&self, _network: &NetworkSpec) -> Result<(), WalletCallError> {
            match &self.switch_error {
                Some(err) => Err(err.clone()),
                None => {
                    self.switched.set(true);
                    Ok(())
                }
            }
        }
    }

    #[derive(Default)]
    struct MockIdentity {
        address: String,
        profile: OAuthProfile,
        logout_calls: Rc<Cell<u32>>,
        redirects: RefCell<Vec<(String, String)>>,
    }

    impl MockIdentity {
        fn with_user(address: &str, email: &str) -> Self {
            Self {
                address: address.to_string(),
                profile: OAuthProfile {
                    email: Some(email.to_string()),
                    name: Some("Test User".to_string()),
                    picture: None,
                },
                logout_calls: Rc::new(Cell::new(0)),
                redirects: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for MockIdentity {
        async fn login_with_redirect(
            &self,
            provider: &str,
            redirect_uri: &str,
        ) -> Result<(), IdentityCallError> {
            self.redirects
                .borrow_mut()
                .push((provider.to_string(), redirect_uri.to_string()));
            Ok(())
        }

        async fn redirect_result(&self) -> Result<RedirectResult, IdentityCallError> {
            Ok(RedirectResult {
                address: self.address.clone(),
                profile: self.profile.clone(),
            })
        }

        async fn is_logged_in(&self) -> Result<bool, IdentityCallError> {
            Ok(true)
        }

        async fn issue_token(
            &self,
            message: &str,
            _account: &str,
        ) -> Result<String, IdentityCallError> {
            Ok(format!("sdk-token:{}", message.len()))
        }

        async fn logout(&self) -> Result<(), IdentityCallError> {
            self.logout_calls.set(self.logout_calls.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        logins: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
        logouts: Cell<u32>,
    }

    impl AuthObserver for RecordingObserver {
        fn on_login(&self, session: &Session) {
            self.logins.borrow_mut().push(session.wallet.clone());
        }

        fn on_login_error(&self, error: &AuthError) {
            self.errors.borrow_mut().push(error.to_string());
        }

        fn on_logout(&self) {
            self.logouts.set(self.logouts.get() + 1);
        }
    }

    fn client_with(providers: ProviderSet) -> AuthClient {
        let providers = if providers.storage.is_none() {
            providers.with_storage(Box::new(MemoryStore::new()))
        } else {
            providers
        };
        AuthClient::new(test_config(), providers).unwrap()
    }

    #[tokio::test]
    async fn test_wallet_login_persists_matching_signature() {
        let wallet = Rc::new(MockWallet::on_chain(43113));
        let client = client_with(ProviderSet::new().with_wallet(wallet.clone()));
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        let session = client.login_with_wallet().await.unwrap();

        assert_eq!(session.wallet, "0xuser123");
        let expected_signature = format!("0xsigned:{}", client.config.message_to_sign.len());
        assert_eq!(
            session.credential,
            Credential::WalletSignature(expected_signature.clone())
        );
        assert_eq!(client.login_stage(), LoginStage::Complete);
        // Unreachable permission endpoint degrades to false, login still succeeds
        assert!(!session.is_permittee);

        // Persisted copy matches the value returned by the signing call
        let stored = client.session().unwrap();
        assert_eq!(
            stored.credential,
            Credential::WalletSignature(expected_signature)
        );
        assert_eq!(client.login_method(), Some(LoginMethod::Wallet));
        assert!(client.is_logged_in());
        assert!(!wallet.switched.get());

        assert_eq!(*observer.logins.borrow(), vec!["0xuser123"]);
        assert!(observer.errors.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_wallet_login_without_provider() {
        let client = client_with(ProviderSet::new());
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        let err = client.login_with_wallet().await.unwrap_err();

        assert!(matches!(err, AuthError::WalletNotDetected));
        assert_eq!(err.kind(), ErrorKind::Wallet);
        // Availability errors are raised to the caller alone
        assert!(observer.errors.borrow().is_empty());
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_locked_wallet_fails() {
        let mut wallet = MockWallet::on_chain(43113);
        wallet.accounts = Vec::new();
        let client = client_with(ProviderSet::new().with_wallet(Rc::new(wallet)));

        let err = client.login_with_wallet().await.unwrap_err();
        assert!(matches!(err, AuthError::WalletLocked));
        assert_eq!(client.login_stage(), LoginStage::Failed);
    }

    #[tokio::test]
    async fn test_wrong_chain_without_switch_support() {
        let mut wallet = MockWallet::on_chain(1);
        wallet.switch_error = Some(WalletCallError::SwitchUnsupported);
        let client = client_with(ProviderSet::new().with_wallet(Rc::new(wallet)));
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        let err = client.login_with_wallet().await.unwrap_err();

        match err {
            AuthError::WrongNetwork { expected, actual } => {
                assert_eq!(expected, 43113);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Delivered to the observer channel as well
        let errors = observer.errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Wrong network"));
        drop(errors);
        // Session untouched on failure
        assert!(!client.is_logged_in());
        assert_eq!(client.login_stage(), LoginStage::Failed);
    }

    #[tokio::test]
    async fn test_wrong_chain_with_successful_switch() {
        let wallet = Rc::new(MockWallet::on_chain(1));
        let client = client_with(ProviderSet::new().with_wallet(wallet.clone()));

        let session = client.login_with_wallet().await.unwrap();
        assert!(wallet.switched.get());
        assert_eq!(session.wallet, "0xuser123");
    }

    #[tokio::test]
    async fn test_switch_failure_other_than_unsupported() {
        let mut wallet = MockWallet::on_chain(1);
        wallet.switch_error = Some(WalletCallError::Call("provider exploded".into()));
        let client = client_with(ProviderSet::new().with_wallet(Rc::new(wallet)));

        let err = client.login_with_wallet().await.unwrap_err();
        match err {
            AuthError::SwitchFailed { message } => assert!(message.contains("provider exploded")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_signature_reaches_both_channels() {
        let mut wallet = MockWallet::on_chain(43113);
        wallet.sign_error = Some(WalletCallError::Rejected);
        let client = client_with(ProviderSet::new().with_wallet(Rc::new(wallet)));
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        let err = client.login_with_wallet().await.unwrap_err();

        assert!(matches!(err, AuthError::UserRejected));
        assert_eq!(observer.errors.borrow().len(), 1);
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_oauth_requires_identity_capability() {
        let client = client_with(ProviderSet::new());
        let err = client.login_with_oauth("google").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_oauth_requires_api_key() {
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let mut config = test_config();
        config.oauth_api_key = None;
        let client = AuthClient::new(
            config,
            ProviderSet::new()
                .with_identity(identity)
                .with_storage(Box::new(MemoryStore::new())),
        )
        .unwrap();

        let err = client.login_with_oauth("google").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_oauth_redirect_uses_configured_url() {
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let client = client_with(ProviderSet::new().with_identity(identity.clone()));

        client.login_with_oauth("google").await.unwrap();

        let redirects = identity.redirects.borrow();
        assert_eq!(redirects.len(), 1);
        assert_eq!(redirects[0].0, "google");
        assert_eq!(
            redirects[0].1,
            "https://app.example.com/login?oauth_callback=true"
        );
    }

    #[tokio::test]
    async fn test_oauth_completion_stores_token_session() {
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let client = client_with(ProviderSet::new().with_identity(identity));
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        let session = client.complete_oauth_login().await.unwrap();

        assert_eq!(session.wallet, "0xoauth");
        assert_eq!(session.method(), LoginMethod::Oauth);
        match &session.credential {
            Credential::OauthToken(token) => assert!(token.starts_with("sdk-token:")),
            other => panic!("expected an OAuth token, got {other:?}"),
        }
        let profile = session.profile.as_ref().unwrap();
        assert_eq!(profile.email.as_deref(), Some("user@example.com"));

        // Restored copy keeps the token tag
        let restored = client.session().unwrap();
        assert_eq!(restored.method(), LoginMethod::Oauth);
        assert_eq!(*observer.logins.borrow(), vec!["0xoauth"]);
    }

    #[tokio::test]
    async fn test_session_restored_across_reload() {
        let shared = Rc::new(MemoryStore::new());
        let wallet = Rc::new(MockWallet::on_chain(43113));

        let first = AuthClient::new(
            test_config(),
            ProviderSet::new()
                .with_wallet(wallet.clone())
                .with_storage(Box::new(shared.clone())),
        )
        .unwrap();
        let before = first.login_with_wallet().await.unwrap();

        // A fresh client over the same storage plays the part of a reload
        let second = AuthClient::new(
            test_config(),
            ProviderSet::new().with_storage(Box::new(shared)),
        )
        .unwrap();

        let after = second.session().unwrap();
        assert_eq!(after.wallet, before.wallet);
        assert_eq!(after.credential, before.credential);
        assert_eq!(after.method(), LoginMethod::Wallet);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_reaches_sdk() {
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let logout_calls = identity.logout_calls.clone();
        let client = client_with(ProviderSet::new().with_identity(identity));
        let observer = Rc::new(RecordingObserver::default());
        client.add_observer(observer.clone());

        client.complete_oauth_login().await.unwrap();
        assert!(client.is_logged_in());

        client.logout().await;
        assert!(!client.is_logged_in());
        assert_eq!(logout_calls.get(), 1);

        // Logging out again has no additional storage effect
        client.logout().await;
        assert!(!client.is_logged_in());
        // The SDK is only told once: the second call has no OAuth session
        assert_eq!(logout_calls.get(), 1);
        assert_eq!(observer.logouts.get(), 2);
    }

    #[tokio::test]
    async fn test_sign_personal_message_dispatch() {
        // Wallet session signs through the wallet provider
        let wallet = Rc::new(MockWallet::on_chain(43113));
        let client = client_with(ProviderSet::new().with_wallet(wallet));
        client.login_with_wallet().await.unwrap();
        let signature = client.sign_personal_message("hello").await.unwrap();
        assert_eq!(signature, "0xsigned:5");

        // OAuth session signs through the identity SDK
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let client = client_with(ProviderSet::new().with_identity(identity));
        client.complete_oauth_login().await.unwrap();
        let token = client.sign_personal_message("hello").await.unwrap();
        assert_eq!(token, "sdk-token:5");

        // Logged out fails
        client.logout().await;
        let err = client.sign_personal_message("hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_active_signer_follows_login_method() {
        let wallet = Rc::new(MockWallet::on_chain(43113));
        let client = client_with(ProviderSet::new().with_wallet(wallet));

        assert!(client.active_signer().is_err());

        client.login_with_wallet().await.unwrap();
        match client.active_signer().unwrap() {
            SignerHandle::Wallet(_) => {}
            SignerHandle::Identity(_) => panic!("expected the wallet capability"),
        }
    }

    #[tokio::test]
    async fn test_initialize_without_marker_is_a_no_op() {
        let identity = Rc::new(MockIdentity::with_user("0xoauth", "user@example.com"));
        let client = client_with(ProviderSet::new().with_identity(identity));
        // No browser location outside wasm, so no callback marker
        let resumed = client.initialize().await.unwrap();
        assert!(resumed.is_none());
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = AuthConfig {
            network: "invalid-network".to_string(),
            ..AuthConfig::default()
        };
        let err = AuthClient::new(config, ProviderSet::new().with_storage(Box::new(MemoryStore::new())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_network_accessor() {
        let client = client_with(ProviderSet::new());
        assert_eq!(client.network().chain_id, 43113);
        assert_eq!(client.network().chain_name, "Avalanche Fuji Testnet");
    }
}
