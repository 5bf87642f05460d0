//! Capability injection seams.
//!
//! The host application supplies provider implementations at construction
//! time instead of the library probing the ambient environment for globals:
//!
//! - **wallet**: signature challenge against an injected wallet provider
//! - **identity**: redirect-based OAuth through an external identity SDK
//! - **storage**: key-value persistence with an in-memory degraded mode

pub mod identity;
pub mod storage;
pub mod wallet;

pub use identity::{IdentityCallError, IdentityProvider, OAuthProfile, RedirectResult};
pub use storage::{detect_store, KeyValueStore, LocalStore, MemoryStore};
pub use wallet::{WalletCallError, WalletProvider};
