use crate::SessionError;
use crate::connection::Near;
use crate::contract::CounterContract;
use crate::navigation::Navigator;
use crate::provisioning::AccountProvisioner;
use crate::storage::KeyValueStore;
use crate::wallet::WalletConnection;
use nc_chain_client::RpcTransport;
use nc_types::{AccountId, NetworkConfig};
use std::rc::Rc;
use tracing::info;
use url::Url;

pub const APP_TITLE: &str = "Rust Counter Example";

/// Browser services the session is built on.
#[derive(Clone)]
pub struct Platform {
    pub transport: Rc<dyn RpcTransport>,
    pub storage: Rc<dyn KeyValueStore>,
    pub navigator: Rc<dyn Navigator>,
}

/// Connection, wallet and contract proxy for the lifetime of the page.
pub struct Session {
    pub near: Rc<Near>,
    pub wallet: Rc<WalletConnection>,
    pub contract: CounterContract,
    storage: Rc<dyn KeyValueStore>,
    navigator: Rc<dyn Navigator>,
}

impl Session {
    /// Connect, restore the wallet session and bind the counter contract.
    /// Connection errors propagate; nothing is retried.
    pub async fn bootstrap(config: NetworkConfig, platform: Platform) -> Result<Self, SessionError> {
        let near = Rc::new(
            Near::connect(config, platform.transport, Rc::clone(&platform.storage)).await?,
        );
        let wallet = WalletConnection::new(
            Rc::clone(&near),
            Rc::clone(&platform.storage),
            Rc::clone(&platform.navigator),
            None,
        )?;
        let contract = CounterContract::new(
            Rc::clone(&near),
            wallet.account(),
            AccountId(near.config.contract_name.clone()),
        );
        info!(
            contract = %contract.contract_id(),
            sender = %contract.sender(),
            "session ready"
        );

        Ok(Self {
            near,
            wallet,
            contract,
            storage: platform.storage,
            navigator: platform.navigator,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.near.config
    }

    /// Signed-in account id, empty when signed out.
    pub fn account_id(&self) -> String {
        self.wallet.account_id()
    }

    pub fn storage(&self) -> &Rc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn sign_in(&self) -> Result<(), SessionError> {
        self.wallet
            .request_sign_in(&self.near.config.contract_name, APP_TITLE)
    }

    /// Drop the wallet session and reload the page at its base path.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.wallet.sign_out()?;
        let mut url = Url::parse(&self.navigator.href())?;
        url.set_query(None);
        url.set_fragment(None);
        self.navigator.replace(url.as_str())
    }

    pub fn provisioner(&self) -> AccountProvisioner<'_> {
        AccountProvisioner::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ALICE, AUTH_KEY, CONTRACT, Fixture, PAGE};
    use nc_chain_client::ChainError;

    #[tokio::test]
    async fn bootstrap_binds_contract_to_signed_in_account() {
        let (fixture, _) = Fixture::signed_in();
        let session = fixture.session().await;

        assert_eq!(session.account_id(), ALICE);
        assert_eq!(session.contract.sender().as_str(), ALICE);
        assert_eq!(session.contract.contract_id().as_str(), CONTRACT);
        assert_eq!(fixture.node.calls("status"), 1);
    }

    #[tokio::test]
    async fn bootstrap_without_identity_has_empty_sender() {
        let fixture = Fixture::new();
        let session = fixture.session().await;

        assert!(session.account_id().is_empty());
        assert!(session.contract.sender().is_empty());
    }

    #[tokio::test]
    async fn connection_failure_propagates() {
        let fixture = Fixture::new();
        fixture.node.offline.set(true);

        let err = Session::bootstrap(Fixture::config(), fixture.platform())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Chain(ChainError::Transport(_))));
    }

    #[tokio::test]
    async fn chain_id_mismatch_is_not_fatal() {
        let fixture = Fixture::new();
        *fixture.node.chain_id.borrow_mut() = "mainnet".into();
        assert!(Session::bootstrap(Fixture::config(), fixture.platform()).await.is_ok());
    }

    #[tokio::test]
    async fn sign_in_parks_key_and_redirects_to_wallet_login() {
        let fixture = Fixture::new();
        let session = fixture.session().await;

        session.sign_in().unwrap();

        let target = Url::parse(&fixture.navigator.last_assigned().unwrap()).unwrap();
        assert_eq!(target.host_str(), Some("wallet.testnet.near.org"));
        assert_eq!(target.path(), "/login/");
        let params: Vec<(String, String)> = target.query_pairs().into_owned().collect();
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(param("success_url").as_deref(), Some(PAGE));
        assert_eq!(param("failure_url").as_deref(), Some(PAGE));
        assert_eq!(param("contract_id").as_deref(), Some(CONTRACT));

        let public_key = param("public_key").unwrap();
        let parked = format!("near-api-js:keystore:pending_key{public_key}:testnet");
        assert!(fixture.storage.contains(&parked));
    }

    #[tokio::test]
    async fn sign_out_clears_session_and_reloads_base_path() {
        let (fixture, _) = Fixture::signed_in_at("https://app.example/counter/?tab=2#top");
        let session = fixture.session().await;
        assert_eq!(session.account_id(), ALICE);

        session.sign_out().unwrap();

        assert!(session.account_id().is_empty());
        assert!(!fixture.storage.contains(AUTH_KEY));
        assert_eq!(*fixture.navigator.replaced.borrow(), vec![PAGE.to_owned()]);
    }
}
