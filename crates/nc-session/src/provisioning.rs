//! Account creation through the wallet.
//!
//! Creating `<name>.<network>` needs a deposit, so the wallet has to approve
//! it and the page reloads in between. The flow is a state machine whose only
//! checkpoint is the record stored under [`TEMP_CREATING_ACCOUNT_KEY`]:
//!
//! ```text
//! NotStarted --start--> PendingApproval --resume--> Approved
//!                                       \--resume--> Failed
//! ```
//!
//! `resume` runs on every page load and clears the record once it has been
//! settled either way.

use crate::SessionError;
use crate::account::TxOutcome;
use crate::session::Session;
use nc_crypto::{KeyPair, PublicKey, generate_seed_phrase};
use nc_types::{
    AccountId, CREATE_ACCOUNT_DEPOSIT, CREATE_ACCOUNT_GAS, PendingAccount,
    TEMP_CREATING_ACCOUNT_KEY,
};
use serde_json::json;
use tracing::{info, warn};

const MAX_ACCOUNT_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    pub account_id: AccountId,
    pub public_key: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningState {
    NotStarted,
    PendingApproval(PendingAccount),
    Approved(ProvisionedAccount),
    Failed { account_id: String, reason: String },
}

pub struct AccountProvisioner<'a> {
    session: &'a Session,
}

impl<'a> AccountProvisioner<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// State as recorded locally, without asking the network.
    pub fn state(&self) -> Result<ProvisioningState, SessionError> {
        Ok(match self.load_record()? {
            None => ProvisioningState::NotStarted,
            Some(Ok(record)) => ProvisioningState::PendingApproval(record),
            Some(Err(reason)) => ProvisioningState::Failed {
                account_id: String::new(),
                reason,
            },
        })
    }

    /// Generate keys for `<name>.<network>`, show the seed phrase through
    /// `display`, checkpoint, and ask the network account to create it.
    pub async fn start(
        &self,
        name: &str,
        display: impl FnOnce(&str),
    ) -> Result<ProvisioningState, SessionError> {
        let network_id = self.session.near.network_id().to_owned();
        let account_id = AccountId::sub_account(name, &network_id);
        validate_account_name(name, &account_id)?;

        let gas: u64 = CREATE_ACCOUNT_GAS
            .parse()
            .map_err(|_| SessionError::InvalidAmount(CREATE_ACCOUNT_GAS.to_owned()))?;
        let deposit: u128 = CREATE_ACCOUNT_DEPOSIT
            .parse()
            .map_err(|_| SessionError::InvalidAmount(CREATE_ACCOUNT_DEPOSIT.to_owned()))?;

        let credentials = generate_seed_phrase()?;
        display(&credentials.seed_phrase);

        let record = PendingAccount {
            account_id: account_id.0.clone(),
            seed_phrase: credentials.seed_phrase.clone(),
            secret_key: credentials.secret_key(),
            public_key: credentials.public_key(),
        };
        let raw = serde_json::to_string(&record).map_err(|e| SessionError::Storage(e.to_string()))?;
        self.session.storage().set_item(TEMP_CREATING_ACCOUNT_KEY, &raw)?;

        let outcome = self
            .session
            .wallet
            .account()
            .function_call(
                &AccountId(network_id),
                "create_account",
                &json!({
                    "new_account_id": record.account_id,
                    "new_account_pk": record.public_key,
                }),
                gas,
                deposit,
            )
            .await;

        match outcome {
            Ok(TxOutcome::Redirected) => {
                info!(account = %record.account_id, "account creation awaiting wallet approval");
                Ok(ProvisioningState::PendingApproval(record))
            }
            Ok(TxOutcome::Executed(_)) => self.resume().await,
            Err(err) => {
                self.clear()?;
                Err(err)
            }
        }
    }

    /// Settle a pending creation after the wallet redirected back.
    ///
    /// A missing account means the wallet did not create it; any other probe
    /// failure is returned and the record is kept for the next load.
    pub async fn resume(&self) -> Result<ProvisioningState, SessionError> {
        let record = match self.load_record()? {
            None => return Ok(ProvisioningState::NotStarted),
            Some(Ok(record)) => record,
            Some(Err(reason)) => {
                warn!(%reason, "discarding unreadable account creation record");
                self.clear()?;
                return Ok(ProvisioningState::Failed {
                    account_id: String::new(),
                    reason,
                });
            }
        };

        let near = &self.session.near;
        let account_id = AccountId(record.account_id.clone());
        match near.rpc.view_account(&account_id).await {
            Ok(_) => {
                let key_pair: KeyPair = record.secret_key.parse()?;
                near.keystore
                    .set_key(near.network_id(), account_id.as_str(), &key_pair)?;
                self.clear()?;
                info!(account = %account_id, "account created");
                Ok(ProvisioningState::Approved(ProvisionedAccount {
                    account_id,
                    public_key: key_pair.public_key(),
                }))
            }
            Err(err) if err.is_account_not_found() => {
                self.clear()?;
                warn!(account = %account_id, "account was not created");
                Ok(ProvisioningState::Failed {
                    account_id: record.account_id,
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn load_record(&self) -> Result<Option<Result<PendingAccount, String>>, SessionError> {
        let Some(raw) = self.session.storage().get_item(TEMP_CREATING_ACCOUNT_KEY)? else {
            return Ok(None);
        };
        Ok(Some(
            serde_json::from_str(&raw).map_err(|e| format!("unreadable record: {e}")),
        ))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.session.storage().remove_item(TEMP_CREATING_ACCOUNT_KEY)
    }
}

fn validate_account_name(name: &str, account_id: &AccountId) -> Result<(), SessionError> {
    let separator = |c: char| c == '-' || c == '_';
    let valid = !name.is_empty()
        && account_id.as_str().len() <= MAX_ACCOUNT_ID_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || separator(c))
        && !name.starts_with(separator)
        && !name.ends_with(separator)
        && !name.contains("--")
        && !name.contains("__");
    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidAccountName(name.to_owned()))
    }
}
