use crate::SessionError;
use crate::account::{ConnectedAccount, TxOutcome};
use crate::connection::Near;
use nc_types::{AccountId, DEFAULT_FUNCTION_CALL_GAS};
use serde_json::json;
use std::rc::Rc;

const GET_NUM_METHOD: &str = "get_num";

/// Counter mutations exposed as change methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
}

impl CounterAction {
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Reset => "reset",
        }
    }
}

/// Typed proxy for the counter contract.
pub struct CounterContract {
    near: Rc<Near>,
    account: ConnectedAccount,
    contract_id: AccountId,
    sender: AccountId,
}

impl CounterContract {
    /// `sender` is the account id at construction time, empty when nobody is
    /// signed in.
    pub fn new(near: Rc<Near>, account: ConnectedAccount, contract_id: AccountId) -> Self {
        let sender = account.account_id();
        Self {
            near,
            account,
            contract_id,
            sender,
        }
    }

    pub fn contract_id(&self) -> &AccountId {
        &self.contract_id
    }

    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    /// `None` when the contract returns nothing.
    pub async fn get_num(&self) -> Result<Option<i64>, SessionError> {
        Ok(self
            .near
            .rpc
            .view_function(&self.contract_id, GET_NUM_METHOD, &json!({}))
            .await?)
    }

    pub async fn increment(&self) -> Result<TxOutcome, SessionError> {
        self.call(CounterAction::Increment).await
    }

    pub async fn decrement(&self) -> Result<TxOutcome, SessionError> {
        self.call(CounterAction::Decrement).await
    }

    pub async fn reset(&self) -> Result<TxOutcome, SessionError> {
        self.call(CounterAction::Reset).await
    }

    pub async fn call(&self, action: CounterAction) -> Result<TxOutcome, SessionError> {
        self.account
            .function_call(
                &self.contract_id,
                action.method_name(),
                &json!({}),
                DEFAULT_FUNCTION_CALL_GAS,
                0,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn get_num_reads_the_view_method() {
        let (fixture, _) = Fixture::signed_in();
        fixture.node.counter.set(-4);
        let session = fixture.session().await;

        assert_eq!(session.contract.get_num().await.unwrap(), Some(-4));
        assert_eq!(fixture.node.calls("query:call_function"), 1);
    }

    #[tokio::test]
    async fn each_action_sends_its_change_method() {
        let (fixture, _) = Fixture::signed_in();
        let session = fixture.session().await;

        for action in [CounterAction::Increment, CounterAction::Decrement, CounterAction::Reset] {
            session.contract.call(action).await.unwrap();
            let broadcasts = fixture.node.broadcasts.borrow();
            let sent = broadcasts.last().unwrap();
            let method = action.method_name().as_bytes();
            assert!(sent.windows(method.len()).any(|w| w == method), "{action:?}");
        }
        assert_eq!(fixture.node.broadcasts.borrow().len(), 3);
    }
}
