use crate::SessionError;
use crate::wallet::WalletConnection;
use nc_chain_client::{Action, ChainError, Transaction};
use nc_crypto::{KeyPair, PublicKey};
use nc_types::{AccessKeyInfoView, AccessKeyPermission, AccessKeyView, AccountId, FinalExecutionOutcome};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum TxOutcome {
    /// Signed with the local key and executed.
    Executed(FinalExecutionOutcome),
    /// Handed to the wallet; the page is navigating away.
    Redirected,
}

/// The signed-in wallet account, able to send transactions either with its
/// local function-call key or by redirecting to the wallet.
pub struct ConnectedAccount {
    wallet: Rc<WalletConnection>,
}

impl ConnectedAccount {
    pub(crate) fn new(wallet: Rc<WalletConnection>) -> Self {
        Self { wallet }
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.wallet.account_id())
    }

    pub async fn function_call(
        &self,
        receiver_id: &AccountId,
        method_name: &str,
        args: &Value,
        gas: u64,
        deposit: u128,
    ) -> Result<TxOutcome, SessionError> {
        let action = Action::function_call(method_name, args, gas, deposit);
        self.sign_and_send_transaction(receiver_id, vec![action]).await
    }

    pub async fn sign_and_send_transaction(
        &self,
        receiver_id: &AccountId,
        actions: Vec<Action>,
    ) -> Result<TxOutcome, SessionError> {
        let account_id = self.account_id();
        if account_id.is_empty() {
            return Err(SessionError::NotSignedIn);
        }

        let near = self.wallet.near();
        let local_key = near.keystore.get_key(near.network_id(), account_id.as_str())?;
        let access_key = self
            .access_key_for_transaction(&account_id, receiver_id, &actions, local_key.as_ref())
            .await?
            .ok_or_else(|| SessionError::NoMatchingAccessKey {
                account_id: account_id.0.clone(),
                receiver_id: receiver_id.0.clone(),
            })?;

        if let Some(local_key) = local_key.as_ref() {
            if local_key.public_key().to_string() == access_key.public_key {
                match self
                    .sign_locally(&account_id, local_key, receiver_id, actions.clone())
                    .await
                {
                    Ok(outcome) => return Ok(TxOutcome::Executed(outcome)),
                    Err(SessionError::Chain(ChainError::NotEnoughAllowance(reason))) => {
                        info!(%reason, "local key allowance exhausted, asking the wallet");
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let public_key: PublicKey = access_key.public_key.parse()?;
        let block_hash = near.rpc.final_block_hash().await?;
        let transaction = Transaction::new(
            &account_id,
            &public_key,
            receiver_id,
            access_key.access_key.nonce + 1,
            block_hash,
            actions,
        );
        self.wallet.request_sign_transactions(&[transaction], None)?;
        Ok(TxOutcome::Redirected)
    }

    async fn sign_locally(
        &self,
        account_id: &AccountId,
        key_pair: &KeyPair,
        receiver_id: &AccountId,
        actions: Vec<Action>,
    ) -> Result<FinalExecutionOutcome, SessionError> {
        let rpc = &self.wallet.near().rpc;
        let access_key = rpc.view_access_key(account_id, &key_pair.public_key()).await?;
        let block_hash = rpc.final_block_hash().await?;
        let signed = Transaction::new(
            account_id,
            &key_pair.public_key(),
            receiver_id,
            access_key.nonce + 1,
            block_hash,
            actions,
        )
        .sign(key_pair)?;

        debug!(signer = %account_id, receiver = %receiver_id, "broadcasting signed transaction");
        Ok(rpc.broadcast_tx_commit(&signed).await?)
    }

    /// Prefer the local key; otherwise any key the wallet reported at sign-in.
    async fn access_key_for_transaction(
        &self,
        account_id: &AccountId,
        receiver_id: &AccountId,
        actions: &[Action],
        local_key: Option<&KeyPair>,
    ) -> Result<Option<AccessKeyInfoView>, SessionError> {
        let access_keys = self.wallet.near().rpc.view_access_key_list(account_id).await?;

        if let Some(local_key) = local_key {
            let local = local_key.public_key().to_string();
            let found = access_keys.iter().find(|key| {
                key.public_key == local && access_key_matches(&key.access_key, receiver_id, actions)
            });
            if let Some(found) = found {
                return Ok(Some(found.clone()));
            }
        }

        let wallet_keys = self.wallet.all_keys();
        Ok(access_keys.into_iter().find(|key| {
            wallet_keys.contains(&key.public_key)
                && access_key_matches(&key.access_key, receiver_id, actions)
        }))
    }
}

/// Whether `access_key` may sign `actions` sent to `receiver_id`.
pub fn access_key_matches(access_key: &AccessKeyView, receiver_id: &AccountId, actions: &[Action]) -> bool {
    match &access_key.permission {
        AccessKeyPermission::FullAccess => true,
        AccessKeyPermission::FunctionCall(permission) => {
            permission.receiver_id == receiver_id.0
                && actions.iter().all(|action| match action {
                    Action::FunctionCall(call) => {
                        call.deposit == 0
                            && (permission.method_names.is_empty()
                                || permission.method_names.contains(&call.method_name))
                    }
                })
        }
    }
}
