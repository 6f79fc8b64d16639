use nc_chain_client::ChainError;
use nc_crypto::CryptoError;
use nc_types::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no account is signed in")]
    NotSignedIn,
    #[error("no access key of {account_id} can sign this call to {receiver_id}")]
    NoMatchingAccessKey {
        account_id: String,
        receiver_id: String,
    },
    #[error("network {0} has no wallet configured")]
    MissingWalletUrl(String),
    #[error("invalid account name '{0}'")]
    InvalidAccountName(String),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("navigation error: {0}")]
    Navigation(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl SessionError {
    pub fn chain(&self) -> Option<&ChainError> {
        match self {
            Self::Chain(err) => Some(err),
            _ => None,
        }
    }
}
