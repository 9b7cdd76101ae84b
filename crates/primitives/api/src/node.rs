//! Node-to-node RPC response types.
//!
//! Raw blocks, snapshots and block signatures travel as gzip-compressed
//! binary bodies; these JSON types cover the remaining metadata calls.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SnapshotInfoResponse {
    pub height: u64,
    pub size: u64,
    /// Identifies the network the snapshot belongs to; a node must never
    /// restore a snapshot from a different network.
    pub network_id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct GetBlockHeightResponse {
    pub height: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubmitTxResponse {
    pub ok: bool,
}
