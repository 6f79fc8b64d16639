use serde_json::Value;

/// Panic message a contract emits when its stored state no longer matches
/// the code's state layout.
pub const DESERIALIZE_STATE_MARKER: &str = "Cannot deserialize the contract state";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    AccountNotFound(String),
    #[error("{0}")]
    AccessKeyNotFound(String),
    #[error("{0}")]
    IncompatibleState(String),
    #[error("not enough allowance: {0}")]
    NotEnoughAllowance(String),
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
    #[error("rpc error {cause}: {message}")]
    Rpc { cause: String, message: String },
    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl ChainError {
    /// Map an RPC error cause (when the node reports one) and message onto a
    /// typed variant. Older nodes only return the message, so the well-known
    /// message fragments are matched as a fallback.
    pub fn classify(cause: Option<&str>, message: String) -> Self {
        if message.contains(DESERIALIZE_STATE_MARKER) {
            return Self::IncompatibleState(message);
        }
        if message.contains("NotEnoughAllowance") {
            return Self::NotEnoughAllowance(message);
        }
        match cause {
            Some("UNKNOWN_ACCOUNT") => Self::AccountNotFound(message),
            Some("UNKNOWN_ACCESS_KEY") => Self::AccessKeyNotFound(message),
            _ if message.contains("does not exist while viewing") => {
                if message.starts_with("access key") {
                    Self::AccessKeyNotFound(message)
                } else {
                    Self::AccountNotFound(message)
                }
            }
            _ => Self::Rpc {
                cause: cause.unwrap_or("UNKNOWN").to_owned(),
                message,
            },
        }
    }

    /// Build from the `error` member of a JSON-RPC response.
    pub(crate) fn from_rpc(error: &Value) -> Self {
        let cause = error.pointer("/cause/name").and_then(Value::as_str);
        let message = match error.get("data") {
            Some(Value::String(data)) => data.clone(),
            Some(Value::Null) | None => error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            Some(other) => other.to_string(),
        };
        Self::classify(cause, message)
    }

    pub fn is_incompatible_state(&self) -> bool {
        matches!(self, Self::IncompatibleState(_))
    }

    pub fn is_account_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_))
    }
}
