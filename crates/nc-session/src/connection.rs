use crate::SessionError;
use crate::keystore::KeyStore;
use crate::storage::KeyValueStore;
use nc_chain_client::{JsonRpcClient, RpcTransport};
use nc_types::NetworkConfig;
use std::rc::Rc;
use tracing::{info, warn};

/// Handle to one NEAR network: configuration, RPC client and local keys.
pub struct Near {
    pub config: NetworkConfig,
    pub rpc: JsonRpcClient,
    pub keystore: KeyStore,
}

impl Near {
    /// Open the connection. The node's `status` is probed once so an
    /// unreachable node fails here rather than on the first contract call.
    pub async fn connect(
        config: NetworkConfig,
        transport: Rc<dyn RpcTransport>,
        storage: Rc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let rpc = JsonRpcClient::new(&config.node_url, transport);
        let status = rpc.status().await?;
        if status.chain_id != config.network_id {
            warn!(
                expected = %config.network_id,
                reported = %status.chain_id,
                "node reports a different chain id"
            );
        }
        info!(network = %config.network_id, node = %rpc.node_url(), "connected to NEAR");

        Ok(Self {
            config,
            rpc,
            keystore: KeyStore::new(storage),
        })
    }

    pub fn network_id(&self) -> &str {
        &self.config.network_id
    }
}
