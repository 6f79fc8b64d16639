//! Environment configuration.
//!
//! Maps an environment name (`development`, `mainnet`, ...) to the node,
//! wallet and helper endpoints of the matching NEAR network.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENV: &str = "development";
pub const DEFAULT_CONTRACT_NAME: &str = "rust-counter.testnet";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network_id: String,
    pub node_url: String,
    pub contract_name: String,
    #[serde(default)]
    pub wallet_url: Option<String>,
    #[serde(default)]
    pub helper_url: Option<String>,
    #[serde(default)]
    pub explorer_url: Option<String>,
    #[serde(default)]
    pub master_account: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unconfigured environment '{0}'")]
    UnknownEnvironment(String),
}

/// Resolve the network configuration for `env`.
pub fn get_config(env: &str, contract_name: &str) -> Result<NetworkConfig, ConfigError> {
    let contract_name = contract_name.to_owned();
    let config = match env {
        "production" | "mainnet" => public_network("mainnet", "wallet.near.org", contract_name),
        "development" | "testnet" => public_network("testnet", "wallet.testnet.near.org", contract_name),
        "betanet" => public_network("betanet", "wallet.betanet.near.org", contract_name),
        "local" => NetworkConfig {
            network_id: "local".to_owned(),
            node_url: "http://localhost:3030".to_owned(),
            contract_name,
            wallet_url: Some("http://localhost:4000/wallet".to_owned()),
            helper_url: None,
            explorer_url: None,
            master_account: None,
        },
        "test" | "ci" => shared_test("shared-test", "https://rpc.ci-testnet.near.org", contract_name),
        "ci-betanet" => shared_test(
            "shared-test-staging",
            "https://rpc.ci-betanet.near.org",
            contract_name,
        ),
        other => return Err(ConfigError::UnknownEnvironment(other.to_owned())),
    };
    Ok(config)
}

fn public_network(network_id: &str, wallet_host: &str, contract_name: String) -> NetworkConfig {
    NetworkConfig {
        network_id: network_id.to_owned(),
        node_url: format!("https://rpc.{network_id}.near.org"),
        contract_name,
        wallet_url: Some(format!("https://{wallet_host}")),
        helper_url: Some(format!("https://helper.{network_id}.near.org")),
        explorer_url: Some(format!("https://explorer.{network_id}.near.org")),
        master_account: None,
    }
}

fn shared_test(network_id: &str, node_url: &str, contract_name: String) -> NetworkConfig {
    NetworkConfig {
        network_id: network_id.to_owned(),
        node_url: node_url.to_owned(),
        contract_name,
        wallet_url: None,
        helper_url: None,
        explorer_url: None,
        master_account: Some("test.near".to_owned()),
    }
}
