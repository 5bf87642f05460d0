//! Wallet signature challenge login.

use tracing::{info, warn};

use super::{AuthClient, LoginStage};
use crate::errors::AuthError;
use crate::providers::wallet::{WalletCallError, WalletProvider};
use crate::session::{Credential, Session};

/// Run the wallet login sequence.
///
/// The wallet-availability check happens before any network call and is
/// raised to the caller alone. Every later failure is delivered to the
/// registered observers and re-raised to the caller.
pub(crate) async fn login_impl(client: &AuthClient) -> Result<Session, AuthError> {
    let wallet = client.wallet.clone().ok_or(AuthError::WalletNotDetected)?;

    match run_challenge(client, wallet.as_ref()).await {
        Ok(session) => {
            client.stage.set(LoginStage::Complete);
            info!("Wallet login complete for {}", session.wallet);
            client.observers.notify_login(&session);
            Ok(session)
        }
        Err(err) => {
            client.stage.set(LoginStage::Failed);
            client.observers.notify_login_error(&err);
            Err(err)
        }
    }
}

async fn run_challenge(
    client: &AuthClient,
    wallet: &dyn WalletProvider,
) -> Result<Session, AuthError> {
    client.stage.set(LoginStage::RequestingAccounts);
    let accounts = wallet.request_accounts().await.map_err(|e| match e {
        WalletCallError::Rejected => AuthError::UserRejected,
        other => AuthError::Authentication {
            message: other.to_string(),
        },
    })?;
    let account = accounts.first().cloned().ok_or(AuthError::WalletLocked)?;

    client.stage.set(LoginStage::CheckingNetwork);
    let expected = client.network.chain_id;
    let actual = wallet.chain_id().await.map_err(|e| AuthError::Authentication {
        message: e.to_string(),
    })?;
    if actual != expected {
        info!(
            "Wallet on chain {}, expected {}; requesting switch",
            actual, expected
        );
        wallet
            .switch_chain(&client.network)
            .await
            .map_err(|e| match e {
                WalletCallError::SwitchUnsupported => AuthError::WrongNetwork { expected, actual },
                other => AuthError::SwitchFailed {
                    message: other.to_string(),
                },
            })?;
    }

    client.stage.set(LoginStage::SigningMessage);
    let signature = wallet
        .sign_message(&client.config.message_to_sign, &account)
        .await
        .map_err(|e| match e {
            WalletCallError::Rejected => AuthError::UserRejected,
            other => AuthError::Authentication {
                message: other.to_string(),
            },
        })?;

    client.stage.set(LoginStage::CheckingPermission);
    let is_permittee = check_permittee(client, &account).await;

    let session = Session {
        wallet: account,
        credential: Credential::WalletSignature(signature),
        is_permittee,
        profile: None,
    };
    client.sessions.store(&session)?;
    Ok(session)
}

/// Best-effort permission lookup. A failure degrades to "not permitted"
/// instead of failing the login.
pub(crate) async fn check_permittee(client: &AuthClient, wallet: &str) -> bool {
    match client.api.validate_permittee(wallet).await {
        Ok(flag) => flag,
        Err(err) => {
            warn!("Permittee check failed for {}: {}", wallet, err);
            false
        }
    }
}
