//! Interfaces to the chain state machine, block/snapshot store, block
//! signer, and leader election. All of these are external to the gateway.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The submitted transaction cannot enter the chain. A caller error.
    #[error("invalid transaction: {0}")]
    InvalidTx(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("refusing to sign block: {0}")]
    Refused(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// The consensus/chain state machine, as far as the gateway needs it.
#[async_trait]
pub trait Chain: Send + Sync {
    fn height(&self) -> u64;

    /// Completes once a block at `height` exists. Callers race this against
    /// their cancellation scope.
    async fn block_soon(&self, height: u64);

    async fn add_tx(&self, raw_tx: Bytes) -> Result<(), ChainError>;
}

/// Read access to stored raw blocks and state snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn raw_block(&self, height: u64) -> anyhow::Result<Option<Bytes>>;

    /// Height and byte size of the most recent snapshot, if any.
    async fn latest_snapshot_info(&self) -> anyhow::Result<Option<(u64, u64)>>;

    async fn snapshot(&self, height: u64) -> anyhow::Result<Option<Bytes>>;

    /// Identifier of the network this store belongs to.
    fn network_id(&self) -> String;
}

/// Signs blocks on behalf of this node. Only present on signer nodes.
#[async_trait]
pub trait BlockSigner: Send + Sync {
    async fn sign_block(&self, raw_block: Bytes) -> Result<Vec<u8>, SignError>;
}

/// View of the external leader-election state.
///
/// Leadership can change at any moment; never cache [Leadership::is_leading]
/// across a suspension point. A call delegated to a leader that has since
/// stepped down is handled by that node's own leadership check.
#[async_trait]
pub trait Leadership: Send + Sync {
    fn is_leading(&self) -> bool;

    /// Address of the current leader, resolved externally (e.g. from shared
    /// storage).
    async fn leader_addr(&self) -> anyhow::Result<Url>;

    /// Access token to present when dialing the leader, if the cluster
    /// requires one.
    fn access_token(&self) -> Option<String> {
        None
    }
}
