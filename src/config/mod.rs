//! Client configuration.
//!
//! All settings travel in an explicit [`AuthConfig`] passed to the client
//! constructor. Nothing is read from or written to ambient globals.

use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

pub mod networks;

pub use networks::{builtin_spec, is_supported, NativeCurrency, NetworkSpec, SUPPORTED_NETWORKS};

/// Deployment environment selecting endpoints and chain variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Base URL of the chain-facing service API.
    pub fn chain_api_base(&self) -> &'static str {
        match self {
            Environment::Test => "https://api-test.genobank.io",
            Environment::Production => "https://api.genobank.io",
        }
    }

    /// Base URL of the dashboard vault API serving uploaded files.
    pub fn dashboard_api_base(&self) -> &'static str {
        match self {
            Environment::Test => "https://staging.genobank.app",
            Environment::Production => "https://genobank.app",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default text presented to the wallet for the authentication signature.
pub const DEFAULT_MESSAGE_TO_SIGN: &str = "Welcome to GenoBank.io\n\nSign this message to authenticate your wallet.\n\nThis request will not trigger a blockchain transaction or cost any gas fees.";

/// Configuration for [`crate::auth::AuthClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Named network from the built-in catalog.
    pub network: String,
    /// Deployment environment.
    pub environment: Environment,
    /// Overrides the catalog lookup entirely when present.
    pub custom_network: Option<NetworkSpec>,
    /// Message signed during wallet login.
    pub message_to_sign: String,
    /// API key handed to the identity SDK by the host. OAuth login is
    /// unavailable without it.
    pub oauth_api_key: Option<String>,
    /// Explicit OAuth redirect target. Defaults to the current page with a
    /// callback marker appended.
    pub redirect_url: Option<String>,
    /// Overrides the environment-derived dashboard API base URL.
    pub api_url: Option<String>,
    /// Complete a pending OAuth redirect during `initialize()`.
    pub auto_resume_oauth: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            network: "avalanche".to_string(),
            environment: Environment::Test,
            custom_network: None,
            message_to_sign: DEFAULT_MESSAGE_TO_SIGN.to_string(),
            oauth_api_key: None,
            redirect_url: None,
            api_url: None,
            auto_resume_oauth: true,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration before any provider or network call.
    pub fn validate(&self) -> Result<(), AuthError> {
        if let Some(custom) = &self.custom_network {
            let mut missing = Vec::new();
            if custom.chain_id == 0 {
                missing.push("chainId");
            }
            if custom.chain_name.is_empty() {
                missing.push("chainName");
            }
            if custom.rpc_url.is_empty() {
                missing.push("rpcUrl");
            }
            if custom.api_url.is_empty() {
                missing.push("apiUrl");
            }
            if !missing.is_empty() {
                return Err(AuthError::Configuration {
                    message: format!(
                        "Custom network missing required fields: {}",
                        missing.join(", ")
                    ),
                });
            }
            return Ok(());
        }

        if !is_supported(&self.network) {
            return Err(AuthError::Configuration {
                message: format!(
                    "Invalid network: {}. Valid options: {}",
                    self.network,
                    SUPPORTED_NETWORKS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Resolve the effective network descriptor.
    pub fn network_spec(&self) -> Result<NetworkSpec, AuthError> {
        self.validate()?;
        if let Some(custom) = &self.custom_network {
            return Ok(custom.clone());
        }
        builtin_spec(&self.network, self.environment).ok_or_else(|| AuthError::Configuration {
            message: format!(
                "Environment '{}' not found for network '{}'",
                self.environment, self.network
            ),
        })
    }

    /// Base URL of the dashboard vault API after applying overrides.
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| self.environment.dashboard_api_base().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = AuthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network_spec().unwrap().chain_id, 43113);
    }

    #[test]
    fn test_production_environment_switches_endpoints() {
        let config = AuthConfig {
            environment: Environment::Production,
            ..AuthConfig::default()
        };
        assert_eq!(config.network_spec().unwrap().chain_id, 43114);
        assert_eq!(config.resolved_api_url(), "https://genobank.app");
    }

    #[test]
    fn test_invalid_network_rejected() {
        let config = AuthConfig {
            network: "invalid-network".to_string(),
            ..AuthConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_custom_network_bypasses_catalog() {
        let config = AuthConfig {
            network: "custom".to_string(),
            custom_network: Some(NetworkSpec {
                chain_id: 1337,
                chain_name: "Local Devnet".into(),
                rpc_url: "http://localhost:8545".into(),
                api_url: "http://localhost:3001".into(),
                block_explorer: None,
                native_currency: None,
            }),
            ..AuthConfig::default()
        };
        assert_eq!(config.network_spec().unwrap().chain_id, 1337);
    }

    #[test]
    fn test_custom_network_missing_fields_rejected() {
        let config = AuthConfig {
            custom_network: Some(NetworkSpec {
                chain_id: 0,
                chain_name: String::new(),
                rpc_url: "http://localhost:8545".into(),
                api_url: String::new(),
                block_explorer: None,
                native_currency: None,
            }),
            ..AuthConfig::default()
        };
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("chainId"));
        assert!(message.contains("chainName"));
        assert!(message.contains("apiUrl"));
        assert!(!message.contains("rpcUrl"));
    }

    #[test]
    fn test_api_url_override() {
        let config = AuthConfig {
            api_url: Some("http://localhost:3001".into()),
            ..AuthConfig::default()
        };
        assert_eq!(config.resolved_api_url(), "http://localhost:3001");
    }
}
