//! Injected wallet capability.
//!
//! The host supplies the wallet implementation at construction time. In a
//! browser build that is typically a thin wasm-bindgen bridge over the
//! injected extension provider; tests supply scripted doubles. All key
//! handling and cryptography stays on the provider side.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::NetworkSpec;

/// Errors surfaced by a wallet provider call.
#[derive(Error, Debug, Clone)]
pub enum WalletCallError {
    /// The user dismissed the provider prompt.
    #[error("user rejected the request")]
    Rejected,
    /// The provider cannot switch to or add the requested chain.
    #[error("the provider does not support switching to the requested chain")]
    SwitchUnsupported,
    /// Any other provider failure, with the provider's own message.
    #[error("{0}")]
    Call(String),
}

/// Wallet signature challenge capability.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Request account access. An empty list means the wallet is locked.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletCallError>;

    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64, WalletCallError>;

    /// Sign `message` with the key behind `account` and return the signature.
    async fn sign_message(&self, message: &str, account: &str) -> Result<String, WalletCallError>;

    /// Switch the wallet to `network`, adding the chain first when the
    /// provider supports that.
    async fn switch_chain(&self, network: &NetworkSpec) -> Result<(), WalletCallError>;
}
