use crate::SessionError;
use crate::storage::KeyValueStore;
use nc_crypto::KeyPair;
use std::rc::Rc;

const KEYSTORE_PREFIX: &str = "near-api-js:keystore:";

/// Account id under which a sign-in key waits for the wallet to return.
pub const PENDING_ACCESS_KEY_PREFIX: &str = "pending_key";

/// Key pairs persisted per `(network, account)`, in the same layout browser
/// wallets for NEAR use, so sessions survive reloads.
pub struct KeyStore {
    storage: Rc<dyn KeyValueStore>,
}

impl KeyStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn storage_key(network_id: &str, account_id: &str) -> String {
        format!("{KEYSTORE_PREFIX}{account_id}:{network_id}")
    }

    pub fn set_key(&self, network_id: &str, account_id: &str, key_pair: &KeyPair) -> Result<(), SessionError> {
        self.storage
            .set_item(&Self::storage_key(network_id, account_id), &key_pair.secret_key())
    }

    pub fn get_key(&self, network_id: &str, account_id: &str) -> Result<Option<KeyPair>, SessionError> {
        match self.storage.get_item(&Self::storage_key(network_id, account_id))? {
            Some(secret) => Ok(Some(secret.parse()?)),
            None => Ok(None),
        }
    }

    pub fn remove_key(&self, network_id: &str, account_id: &str) -> Result<(), SessionError> {
        self.storage.remove_item(&Self::storage_key(network_id, account_id))
    }
}
