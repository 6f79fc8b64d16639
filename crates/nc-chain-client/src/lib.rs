use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use nc_crypto::PublicKey;
use nc_types::{
    AccessKeyInfoView, AccessKeyList, AccessKeyView, AccountId, AccountView, BlockView, CallResult,
    FinalExecutionOutcome, FinalExecutionStatus, StatusView,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

pub mod error;
pub mod transaction;

pub use error::{ChainError, DESERIALIZE_STATE_MARKER};
pub use transaction::{Action, FunctionCallAction, SignedTransaction, Transaction};

/// Moves a serialized JSON-RPC request to the node and returns the raw body.
///
/// The browser build implements this over `fetch`; tests script it.
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn post(&self, url: &str, body: String) -> Result<String, ChainError>;
}

/// JSON-RPC client for a NEAR node.
pub struct JsonRpcClient {
    node_url: String,
    transport: Rc<dyn RpcTransport>,
    next_id: Cell<u64>,
}

impl JsonRpcClient {
    pub fn new(node_url: &str, transport: Rc<dyn RpcTransport>) -> Self {
        Self {
            node_url: node_url.trim_end_matches('/').to_owned(),
            transport,
            next_id: Cell::new(1),
        }
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = json!({
            "jsonrpc": "2.0",
            "id": id.to_string(),
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let text = self.transport.post(&self.node_url, body.to_string()).await?;
        let envelope: Value = serde_json::from_str(&text)
            .map_err(|e| ChainError::InvalidResponse(format!("{e}: {text}")))?;

        if let Some(error) = envelope.get("error") {
            return Err(ChainError::from_rpc(error));
        }

        let result = envelope
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse(format!("no result in {text}")))?;

        // Older nodes report query failures inside a successful envelope.
        if let Some(message) = result.get("error").and_then(Value::as_str) {
            return Err(ChainError::classify(None, message.to_owned()));
        }

        serde_json::from_value(result)
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))
    }

    pub async fn status(&self) -> Result<StatusView, ChainError> {
        self.call("status", json!([])).await
    }

    /// Account and access-key reads use optimistic finality: the nonce and
    /// account existence must reflect transactions that just executed.
    pub async fn view_account(&self, account_id: &AccountId) -> Result<AccountView, ChainError> {
        self.call(
            "query",
            json!({
                "request_type": "view_account",
                "finality": "optimistic",
                "account_id": account_id.as_str(),
            }),
        )
        .await
    }

    pub async fn view_access_key(
        &self,
        account_id: &AccountId,
        public_key: &PublicKey,
    ) -> Result<AccessKeyView, ChainError> {
        self.call(
            "query",
            json!({
                "request_type": "view_access_key",
                "finality": "optimistic",
                "account_id": account_id.as_str(),
                "public_key": public_key.to_string(),
            }),
        )
        .await
    }

    pub async fn view_access_key_list(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<AccessKeyInfoView>, ChainError> {
        let list: AccessKeyList = self
            .call(
                "query",
                json!({
                    "request_type": "view_access_key_list",
                    "finality": "optimistic",
                    "account_id": account_id.as_str(),
                }),
            )
            .await?;
        Ok(list.keys)
    }

    pub async fn call_function(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: &Value,
    ) -> Result<CallResult, ChainError> {
        self.call(
            "query",
            json!({
                "request_type": "call_function",
                "finality": "optimistic",
                "account_id": contract_id.as_str(),
                "method_name": method_name,
                "args_base64": STANDARD.encode(args.to_string()),
            }),
        )
        .await
    }

    /// Call a view method and decode its JSON return value. An empty or
    /// `null` return decodes to `None`.
    pub async fn view_function<T: DeserializeOwned>(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: &Value,
    ) -> Result<Option<T>, ChainError> {
        let result = self.call_function(contract_id, method_name, args).await?;
        if result.result.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(&result.result)
            .map_err(|e| ChainError::InvalidResponse(format!("{method_name} returned {e}")))
    }

    pub async fn final_block_hash(&self) -> Result<[u8; 32], ChainError> {
        let block: BlockView = self.call("block", json!({ "finality": "final" })).await?;
        let raw = bs58::decode(&block.header.hash)
            .into_vec()
            .map_err(|e| ChainError::InvalidResponse(format!("block hash: {e}")))?;
        raw.as_slice()
            .try_into()
            .map_err(|_| ChainError::InvalidResponse(format!("block hash has {} bytes", raw.len())))
    }

    /// Submit and wait for the final outcome. A `Failure` status is an error.
    pub async fn broadcast_tx_commit(
        &self,
        signed: &SignedTransaction,
    ) -> Result<FinalExecutionOutcome, ChainError> {
        let outcome: FinalExecutionOutcome = self
            .call("broadcast_tx_commit", json!([signed.to_base64()?]))
            .await?;
        if let FinalExecutionStatus::Failure(failure) = &outcome.status {
            return Err(ChainError::classify_failure(failure));
        }
        Ok(outcome)
    }
}

impl ChainError {
    fn classify_failure(failure: &Value) -> Self {
        let text = failure.to_string();
        match Self::classify(None, text) {
            Self::Rpc { message, .. } => Self::TransactionFailed(message),
            other => other,
        }
    }
}
