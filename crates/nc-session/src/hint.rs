use crate::SessionError;
use nc_chain_client::DESERIALIZE_STATE_MARKER;
use tracing::{error, warn};

pub const INCOMPATIBLE_STATE_HINT: &str = "NEAR Warning: the contract/account seems to have state that is not (or no longer) compatible.\n\
This may require deleting and recreating the NEAR account as shown here:\n\
https://stackoverflow.com/a/60767144/711863";

/// Remediation advice for failures that have a known fix.
pub fn remediation_hint(err: &SessionError) -> Option<&'static str> {
    let typed = err.chain().is_some_and(|chain| chain.is_incompatible_state());
    if typed || err.to_string().contains(DESERIALIZE_STATE_MARKER) {
        Some(INCOMPATIBLE_STATE_HINT)
    } else {
        None
    }
}

/// Log a failed contract interaction, preceded by its hint when one applies.
pub fn report_error(err: &SessionError) {
    if let Some(hint) = remediation_hint(err) {
        warn!("{hint}");
    }
    error!(error = %err, "contract call failed");
}
