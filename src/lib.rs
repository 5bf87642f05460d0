//! Client-side authentication and dashboard file import for GenoBank-style
//! services.
//!
//! The crate reconciles two structurally different login flows into one
//! persisted session and exposes a uniform query surface over it:
//!
//! - **auth**: wallet signature challenge and redirect-based OAuth, unified
//!   behind [`auth::AuthClient`]
//! - **session**: locally persisted session state with a tagged credential
//! - **providers**: capability seams the host fills at construction time
//! - **api**: REST client for the dashboard vault endpoints
//! - **import**: sequential file importer with retry, byte progress, and
//!   cooperative cancellation
//!
//! The crate is WASM-first: async traits carry no Send bounds, storage is
//! browser localStorage with an in-memory degraded mode, and timers fall
//! back to tokio only off-wasm.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod import;
pub mod providers;
pub mod session;
pub mod utils;

pub use api::{ApiClient, FileScope, FileStream, RemoteFile, VaultSource};
pub use auth::{AuthClient, AuthObserver, LoginStage, ProviderSet, SignerHandle};
pub use config::{AuthConfig, Environment, NativeCurrency, NetworkSpec};
pub use errors::{AuthError, AuthResult, ErrorKind, ImportError, ImportResult};
pub use import::{
    CancelHandle, ChannelReporter, FileImporter, ImportConfig, ImportEvent, ImportObserver,
    ImportState, ImportStats, ImportedFile, NoopObserver,
};
pub use providers::{
    IdentityCallError, IdentityProvider, KeyValueStore, LocalStore, MemoryStore, OAuthProfile,
    RedirectResult, WalletCallError, WalletProvider,
};
pub use session::{Credential, LoginMethod, Session, SessionManager};
pub use utils::format::{format_file_size, shorten_address};
