//! Application core of the counter front end.
//!
//! Everything here is platform-neutral: the browser crate supplies storage,
//! an RPC transport, navigation and a [`ui::CounterView`], and drives these
//! routines from its event handlers.

pub mod account;
pub mod connection;
pub mod contract;
pub mod error;
pub mod hint;
pub mod keystore;
pub mod navigation;
pub mod provisioning;
pub mod session;
pub mod storage;
pub mod ui;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use account::{ConnectedAccount, TxOutcome};
pub use contract::{CounterAction, CounterContract};
pub use error::SessionError;
pub use hint::{remediation_hint, report_error};
pub use navigation::Navigator;
pub use provisioning::{AccountProvisioner, ProvisionedAccount, ProvisioningState};
pub use session::{Platform, Session};
pub use storage::{KeyValueStore, MemoryStore};
pub use ui::{CounterView, Mood, refresh_ui, run_action};
