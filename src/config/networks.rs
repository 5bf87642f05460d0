//! Built-in network reference data.
//!
//! Each supported chain ships a test and a production descriptor. These are
//! immutable reference tables, not user state. Hosts that run against a chain
//! outside this catalog pass a custom [`NetworkSpec`] through the
//! configuration instead.

use serde::{Deserialize, Serialize};

use super::Environment;

/// Native currency descriptor for a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Static descriptor for one (chain, environment) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(rename = "chainName")]
    pub chain_name: String,
    #[serde(rename = "rpcUrl")]
    pub rpc_url: String,
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    #[serde(rename = "blockExplorer", default)]
    pub block_explorer: Option<String>,
    #[serde(rename = "nativeCurrency", default)]
    pub native_currency: Option<NativeCurrency>,
}

/// Network names with built-in descriptors.
pub const SUPPORTED_NETWORKS: [&str; 4] = ["avalanche", "ethereum", "polygon", "bsc"];

pub fn is_supported(network: &str) -> bool {
    SUPPORTED_NETWORKS.contains(&network)
}

/// Look up the built-in descriptor for `network` in `environment`.
pub fn builtin_spec(network: &str, environment: Environment) -> Option<NetworkSpec> {
    let spec = match (network, environment) {
        ("avalanche", Environment::Test) => make_spec(
            43113,
            "Avalanche Fuji Testnet",
            "https://api.avax-test.network/ext/bc/C/rpc",
            "https://testnet.snowtrace.io",
            ("AVAX", "AVAX"),
            environment,
        ),
        ("avalanche", Environment::Production) => make_spec(
            43114,
            "Avalanche C-Chain",
            "https://api.avax.network/ext/bc/C/rpc",
            "https://snowtrace.io",
            ("AVAX", "AVAX"),
            environment,
        ),
        ("ethereum", Environment::Test) => make_spec(
            11155111,
            "Ethereum Sepolia",
            "https://sepolia.infura.io/v3/YOUR_INFURA_KEY",
            "https://sepolia.etherscan.io",
            ("ETH", "ETH"),
            environment,
        ),
        ("ethereum", Environment::Production) => make_spec(
            1,
            "Ethereum Mainnet",
            "https://mainnet.infura.io/v3/YOUR_INFURA_KEY",
            "https://etherscan.io",
            ("ETH", "ETH"),
            environment,
        ),
        ("polygon", Environment::Test) => make_spec(
            80001,
            "Polygon Mumbai",
            "https://rpc-mumbai.maticvigil.com",
            "https://mumbai.polygonscan.com",
            ("MATIC", "MATIC"),
            environment,
        ),
        ("polygon", Environment::Production) => make_spec(
            137,
            "Polygon Mainnet",
            "https://polygon-rpc.com",
            "https://polygonscan.com",
            ("MATIC", "MATIC"),
            environment,
        ),
        ("bsc", Environment::Test) => make_spec(
            97,
            "BSC Testnet",
            "https://data-seed-prebsc-1-s1.binance.org:8545",
            "https://testnet.bscscan.com",
            ("BNB", "BNB"),
            environment,
        ),
        ("bsc", Environment::Production) => make_spec(
            56,
            "Binance Smart Chain",
            "https://bsc-dataseed.binance.org",
            "https://bscscan.com",
            ("BNB", "BNB"),
            environment,
        ),
        _ => return None,
    };
    Some(spec)
}

fn make_spec(
    chain_id: u64,
    chain_name: &str,
    rpc_url: &str,
    block_explorer: &str,
    currency: (&str, &str),
    environment: Environment,
) -> NetworkSpec {
    NetworkSpec {
        chain_id,
        chain_name: chain_name.to_string(),
        rpc_url: rpc_url.to_string(),
        api_url: environment.chain_api_base().to_string(),
        block_explorer: Some(block_explorer.to_string()),
        native_currency: Some(NativeCurrency {
            name: currency.0.to_string(),
            symbol: currency.1.to_string(),
            decimals: 18,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_chain_ids() {
        assert_eq!(
            builtin_spec("avalanche", Environment::Test).unwrap().chain_id,
            43113
        );
        assert_eq!(
            builtin_spec("avalanche", Environment::Production)
                .unwrap()
                .chain_id,
            43114
        );
        assert_eq!(
            builtin_spec("ethereum", Environment::Production)
                .unwrap()
                .chain_id,
            1
        );
        assert_eq!(
            builtin_spec("polygon", Environment::Production)
                .unwrap()
                .chain_id,
            137
        );
        assert_eq!(builtin_spec("bsc", Environment::Test).unwrap().chain_id, 97);
    }

    #[test]
    fn test_unknown_network() {
        assert!(builtin_spec("solana", Environment::Test).is_none());
        assert!(!is_supported("solana"));
        assert!(is_supported("avalanche"));
    }

    #[test]
    fn test_spec_round_trips_through_json() {
        let spec = builtin_spec("avalanche", Environment::Test).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"chainId\":43113"));
        let back: NetworkSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_custom_spec_parses_without_optional_fields() {
        let json = r#"{
            "chainId": 1337,
            "chainName": "Local Devnet",
            "rpcUrl": "http://localhost:8545",
            "apiUrl": "http://localhost:3001"
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.chain_id, 1337);
        assert!(spec.block_explorer.is_none());
        assert!(spec.native_currency.is_none());
    }
}
