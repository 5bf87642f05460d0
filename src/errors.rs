//! Error types for authentication and file import operations.
//!
//! Both enums carry enough structure for hosts to route on specific failures
//! (wrong chain IDs, HTTP statuses) while [`ErrorKind`] offers the coarse
//! classification used by generic error handlers.

use thiserror::Error;

/// Coarse error families for hosts that route on classification alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Wallet,
    Network,
    Authentication,
    Dependency,
    Storage,
}

/// Errors raised by the authentication facade.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Missing capability: {message}")]
    Dependency { message: String },

    #[error("Wallet provider not detected. Inject a WalletProvider when constructing the client.")]
    WalletNotDetected,

    #[error("No accounts available. The wallet is locked or access was denied.")]
    WalletLocked,

    #[error("User rejected the signature request")]
    UserRejected,

    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Failed to switch network: {message}")]
    SwitchFailed { message: String },

    #[error("HTTP request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Configuration { .. } => ErrorKind::Configuration,
            AuthError::Dependency { .. } => ErrorKind::Dependency,
            AuthError::WalletNotDetected | AuthError::WalletLocked | AuthError::UserRejected => {
                ErrorKind::Wallet
            }
            AuthError::WrongNetwork { .. }
            | AuthError::SwitchFailed { .. }
            | AuthError::Http { .. }
            | AuthError::Network { .. } => ErrorKind::Network,
            AuthError::Storage { .. } => ErrorKind::Storage,
            AuthError::Serialization { .. } => ErrorKind::Configuration,
            AuthError::Authentication { .. } => ErrorKind::Authentication,
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for facade operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while importing dashboard files.
///
/// The importer classifies failures by their rendered message, so variants
/// keep the upstream status text intact.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("User authentication token required")]
    TokenRequired,

    #[error("Import already in progress")]
    BatchInFlight,

    #[error("Failed to list files: {status} {message}")]
    Listing { status: u16, message: String },

    #[error("Failed to download {file}: {message}")]
    Download { file: String, message: String },

    #[error("Import cancelled by user")]
    Cancelled,

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::TokenRequired | ImportError::Authentication { .. } => {
                ErrorKind::Authentication
            }
            ImportError::BatchInFlight | ImportError::Cancelled => ErrorKind::Configuration,
            ImportError::Listing { .. }
            | ImportError::Download { .. }
            | ImportError::Network { .. } => ErrorKind::Network,
        }
    }
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_kinds() {
        assert_eq!(AuthError::WalletNotDetected.kind(), ErrorKind::Wallet);
        assert_eq!(
            AuthError::WrongNetwork {
                expected: 43113,
                actual: 1
            }
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(
            AuthError::Configuration {
                message: "bad".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            AuthError::Dependency {
                message: "missing".into()
            }
            .kind(),
            ErrorKind::Dependency
        );
    }

    #[test]
    fn test_wrong_network_carries_both_chain_ids() {
        let err = AuthError::WrongNetwork {
            expected: 43113,
            actual: 1,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("43113"));
        assert!(rendered.contains("1"));
    }

    #[test]
    fn test_import_error_kinds() {
        assert_eq!(ImportError::TokenRequired.kind(), ErrorKind::Authentication);
        assert_eq!(
            ImportError::Listing {
                status: 500,
                message: "Internal Server Error".into()
            }
            .kind(),
            ErrorKind::Network
        );
    }
}
