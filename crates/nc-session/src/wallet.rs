//! Hosted-wallet session.
//!
//! Sign-in and transaction approval happen on the wallet's own site: this
//! side builds the redirect URLs, parks keys in the key store while the user
//! is away, and picks the result back up from the return URL.

use crate::SessionError;
use crate::account::ConnectedAccount;
use crate::connection::Near;
use crate::keystore::PENDING_ACCESS_KEY_PREFIX;
use crate::navigation::Navigator;
use crate::storage::KeyValueStore;
use nc_chain_client::Transaction;
use nc_crypto::KeyPair;
use nc_types::WalletAuthData;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use url::Url;

const LOCAL_STORAGE_KEY_SUFFIX: &str = "_wallet_auth_key";
const LOGIN_WALLET_URL_SUFFIX: &str = "/login/";
const SIGN_WALLET_URL_SUFFIX: &str = "/sign";
const SIGN_IN_RETURN_PARAMS: [&str; 3] = ["account_id", "public_key", "all_keys"];

pub struct WalletConnection {
    near: Rc<Near>,
    storage: Rc<dyn KeyValueStore>,
    navigator: Rc<dyn Navigator>,
    auth_data_key: String,
    auth_data: RefCell<WalletAuthData>,
}

impl WalletConnection {
    /// Restore the stored wallet session and finish a sign-in if the current
    /// URL is the wallet's return redirect.
    pub fn new(
        near: Rc<Near>,
        storage: Rc<dyn KeyValueStore>,
        navigator: Rc<dyn Navigator>,
        app_key_prefix: Option<&str>,
    ) -> Result<Rc<Self>, SessionError> {
        let prefix = match app_key_prefix {
            Some(prefix) if !prefix.is_empty() => prefix.to_owned(),
            _ if !near.config.contract_name.is_empty() => near.config.contract_name.clone(),
            _ => "default".to_owned(),
        };
        let auth_data_key = format!("{prefix}{LOCAL_STORAGE_KEY_SUFFIX}");

        let auth_data = match storage.get_item(&auth_data_key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key = %auth_data_key, error = %e, "ignoring unreadable wallet auth data");
                WalletAuthData::default()
            }),
            None => WalletAuthData::default(),
        };

        let wallet = Rc::new(Self {
            near,
            storage,
            navigator,
            auth_data_key,
            auth_data: RefCell::new(auth_data),
        });
        wallet.complete_sign_in()?;
        Ok(wallet)
    }

    pub fn near(&self) -> &Rc<Near> {
        &self.near
    }

    /// Signed-in account id, or an empty string.
    pub fn account_id(&self) -> String {
        self.auth_data.borrow().account_id.clone().unwrap_or_default()
    }

    pub fn is_signed_in(&self) -> bool {
        !self.account_id().is_empty()
    }

    /// Public keys the wallet reported for this app at sign-in.
    pub fn all_keys(&self) -> Vec<String> {
        self.auth_data.borrow().all_keys.clone()
    }

    pub fn account(self: &Rc<Self>) -> ConnectedAccount {
        ConnectedAccount::new(Rc::clone(self))
    }

    fn wallet_base_url(&self) -> Result<&str, SessionError> {
        self.near
            .config
            .wallet_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| SessionError::MissingWalletUrl(self.near.config.network_id.clone()))
    }

    /// Send the user to the wallet to authorize a function-call key for
    /// `contract_id`. The key pair is generated here and parked until the
    /// wallet redirects back.
    pub fn request_sign_in(&self, contract_id: &str, title: &str) -> Result<(), SessionError> {
        let current = self.navigator.href();
        let mut url = Url::parse(&format!("{}{LOGIN_WALLET_URL_SUFFIX}", self.wallet_base_url()?))?;
        url.query_pairs_mut()
            .append_pair("success_url", &current)
            .append_pair("failure_url", &current);

        if !contract_id.is_empty() {
            let key_pair = KeyPair::from_random();
            let public_key = key_pair.public_key().to_string();
            self.near.keystore.set_key(
                self.near.network_id(),
                &format!("{PENDING_ACCESS_KEY_PREFIX}{public_key}"),
                &key_pair,
            )?;
            url.query_pairs_mut()
                .append_pair("contract_id", contract_id)
                .append_pair("public_key", &public_key);
        }

        info!(app = title, contract = contract_id, "redirecting to wallet for sign-in");
        self.navigator.assign(url.as_str())
    }

    /// Hand unsigned transactions to the wallet for approval.
    pub fn request_sign_transactions(
        &self,
        transactions: &[Transaction],
        callback_url: Option<&str>,
    ) -> Result<(), SessionError> {
        let current = self.navigator.href();
        let encoded = transactions
            .iter()
            .map(Transaction::to_base64)
            .collect::<Result<Vec<_>, _>>()?
            .join(",");

        let mut url = Url::parse(&format!("{}{SIGN_WALLET_URL_SUFFIX}", self.wallet_base_url()?))?;
        url.query_pairs_mut()
            .append_pair("transactions", &encoded)
            .append_pair("callbackUrl", callback_url.unwrap_or(&current));

        info!(count = transactions.len(), "redirecting to wallet for approval");
        self.navigator.assign(url.as_str())
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        *self.auth_data.borrow_mut() = WalletAuthData::default();
        self.storage.remove_item(&self.auth_data_key)?;
        info!("signed out");
        Ok(())
    }

    fn complete_sign_in(&self) -> Result<(), SessionError> {
        let mut url = Url::parse(&self.navigator.href())?;
        let mut account_id = None;
        let mut public_key = None;
        let mut all_keys = Vec::new();
        let mut kept = Vec::new();

        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "account_id" => account_id = Some(value.into_owned()),
                "public_key" => public_key = Some(value.into_owned()),
                "all_keys" => {
                    all_keys = value
                        .split(',')
                        .filter(|k| !k.is_empty())
                        .map(str::to_owned)
                        .collect()
                }
                _ => kept.push((name.into_owned(), value.into_owned())),
            }
        }

        let returned = url
            .query_pairs()
            .any(|(name, _)| SIGN_IN_RETURN_PARAMS.contains(&name.as_ref()));
        if !returned {
            return Ok(());
        }

        if let Some(account_id) = account_id {
            let auth_data = WalletAuthData {
                account_id: Some(account_id.clone()),
                all_keys,
            };
            let raw = serde_json::to_string(&auth_data)
                .map_err(|e| SessionError::Storage(e.to_string()))?;
            self.storage.set_item(&self.auth_data_key, &raw)?;
            *self.auth_data.borrow_mut() = auth_data;

            if let Some(public_key) = public_key {
                self.move_key_from_temp_to_permanent(&account_id, &public_key)?;
            }
            info!(account = %account_id, "wallet sign-in completed");
        }

        url.set_query(None);
        if !kept.is_empty() {
            url.query_pairs_mut().extend_pairs(kept);
        }
        self.navigator.replace_state(url.as_str())
    }

    fn move_key_from_temp_to_permanent(&self, account_id: &str, public_key: &str) -> Result<(), SessionError> {
        let network_id = self.near.network_id();
        let pending = format!("{PENDING_ACCESS_KEY_PREFIX}{public_key}");
        match self.near.keystore.get_key(network_id, &pending)? {
            Some(key_pair) => {
                self.near.keystore.set_key(network_id, account_id, &key_pair)?;
                self.near.keystore.remove_key(network_id, &pending)?;
                debug!(account = account_id, "moved sign-in key to account");
            }
            None => warn!(public_key, "no parked key for returned sign-in"),
        }
        Ok(())
    }
}
