use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;

pub use config::{ConfigError, NetworkConfig, get_config};

/// Local-storage key holding the in-flight account creation record.
pub const TEMP_CREATING_ACCOUNT_KEY: &str = "TEMP_CREATING_ACCOUNT_ID";

/// Gas attached to the `create_account` call, in gas units.
pub const CREATE_ACCOUNT_GAS: &str = "200000000000000";

/// Deposit attached to the `create_account` call, in yoctoNEAR (1 NEAR).
pub const CREATE_ACCOUNT_DEPOSIT: &str = "1000000000000000000000000";

/// Gas attached to counter change methods (30 TGas).
pub const DEFAULT_FUNCTION_CALL_GAS: u64 = 30_000_000_000_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `<name>.<parent>`, e.g. `alice.testnet`.
    pub fn sub_account(name: &str, parent: &str) -> Self {
        Self(format!("{name}.{parent}"))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Persisted checkpoint of an account creation that is waiting on the wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingAccount {
    pub account_id: String,
    pub seed_phrase: String,
    pub secret_key: String,
    pub public_key: String,
}

/// Wallet sign-in result as stored under `<prefix>_wallet_auth_key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletAuthData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub all_keys: Vec<String>,
}

// ── RPC views ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub chain_id: String,
    #[serde(default)]
    pub protocol_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub amount: String,
    #[serde(default)]
    pub locked: String,
    #[serde(default)]
    pub code_hash: String,
    #[serde(default)]
    pub storage_usage: u64,
    #[serde(default)]
    pub block_height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCallPermission {
    #[serde(default)]
    pub allowance: Option<String>,
    pub receiver_id: String,
    #[serde(default)]
    pub method_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessKeyPermission {
    FullAccess,
    FunctionCall(FunctionCallPermission),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessKeyView {
    pub nonce: u64,
    pub permission: AccessKeyPermission,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessKeyInfoView {
    pub public_key: String,
    pub access_key: AccessKeyView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKeyList {
    pub keys: Vec<AccessKeyInfoView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResult {
    pub result: Vec<u8>,
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeaderView {
    pub hash: String,
    pub height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockView {
    pub header: BlockHeaderView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FinalExecutionStatus {
    NotStarted,
    Started,
    Failure(serde_json::Value),
    SuccessValue(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalExecutionOutcome {
    pub status: FinalExecutionStatus,
    #[serde(default)]
    pub transaction: serde_json::Value,
}
