//! Shared fakes for gateway tests.

use crate::auth::CredentialVerifier;
use crate::chain::{BlockSigner, Chain, ChainError, Leadership, SignError, SnapshotStore};
use crate::{Gateway, GatewayServerConfig};
use async_trait::async_trait;
use bytes::{Buf, Bytes};
use http_body_util::{BodyExt, Full};
use hyper::Response;
use lc_api::testutil::{test_handler, FakeDomain};
use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

pub(crate) struct FakeChain {
    height: AtomicU64,
    extended: Notify,
    submitted: Mutex<Vec<Bytes>>,
}

impl FakeChain {
    pub fn at_height(height: u64) -> Self {
        Self { height: AtomicU64::new(height), extended: Notify::new(), submitted: Mutex::new(Vec::new()) }
    }

    pub fn extend_to(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
        self.extended.notify_waiters();
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Chain for FakeChain {
    fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    async fn block_soon(&self, height: u64) {
        loop {
            let extended = self.extended.notified();
            if self.height.load(Ordering::SeqCst) >= height {
                return;
            }
            extended.await;
        }
    }

    async fn add_tx(&self, raw_tx: Bytes) -> Result<(), ChainError> {
        if raw_tx.starts_with(b"bad") {
            return Err(ChainError::InvalidTx("undecodable transaction".into()));
        }
        self.submitted.lock().unwrap().push(raw_tx);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    blocks: HashMap<u64, Bytes>,
    snapshots: HashMap<u64, Bytes>,
    snapshot_info: Option<(u64, u64)>,
}

impl FakeStore {
    pub fn with_block(height: u64, raw: &[u8]) -> Self {
        Self { blocks: HashMap::from([(height, Bytes::copy_from_slice(raw))]), ..Default::default() }
    }

    #[allow(dead_code)]
    pub fn with_snapshot(height: u64, data: &[u8]) -> Self {
        Self {
            snapshots: HashMap::from([(height, Bytes::copy_from_slice(data))]),
            snapshot_info: Some((height, data.len() as u64)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SnapshotStore for FakeStore {
    async fn raw_block(&self, height: u64) -> anyhow::Result<Option<Bytes>> {
        Ok(self.blocks.get(&height).cloned())
    }

    async fn latest_snapshot_info(&self) -> anyhow::Result<Option<(u64, u64)>> {
        Ok(self.snapshot_info)
    }

    async fn snapshot(&self, height: u64) -> anyhow::Result<Option<Bytes>> {
        Ok(self.snapshots.get(&height).cloned())
    }

    fn network_id(&self) -> String {
        "testnet".to_string()
    }
}

pub(crate) struct FakeSigner;

#[async_trait]
impl BlockSigner for FakeSigner {
    async fn sign_block(&self, raw_block: Bytes) -> Result<Vec<u8>, SignError> {
        let mut signature = b"signed:".to_vec();
        signature.extend_from_slice(&raw_block);
        Ok(signature)
    }
}

pub(crate) struct FakeLeadership {
    leading: bool,
    leader: Option<Url>,
    token: Option<String>,
}

impl FakeLeadership {
    pub fn leading() -> Self {
        Self { leading: true, leader: None, token: None }
    }

    pub fn following(leader_url: &str, token: &str) -> Self {
        Self { leading: false, leader: Some(Url::parse(leader_url).unwrap()), token: Some(token.to_string()) }
    }
}

#[async_trait]
impl Leadership for FakeLeadership {
    fn is_leading(&self) -> bool {
        self.leading
    }

    async fn leader_addr(&self) -> anyhow::Result<Url> {
        self.leader.clone().ok_or_else(|| anyhow::anyhow!("no leader elected"))
    }

    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

pub(crate) struct AllowAll;

#[async_trait]
impl CredentialVerifier for AllowAll {
    async fn verify(&self, _username: &str, _password: &str) -> anyhow::Result<bool> {
        Ok(true)
    }
}

/// Builds a gateway with authentication disabled and a generous rate limit.
pub(crate) fn test_gateway(
    chain: Arc<dyn Chain>,
    store: Arc<dyn SnapshotStore>,
    signer: Option<Arc<dyn BlockSigner>>,
    leadership: Option<Arc<dyn Leadership>>,
) -> Gateway {
    Gateway::new(
        test_handler(FakeDomain::none()),
        chain,
        store,
        signer,
        leadership.unwrap_or_else(|| Arc::new(FakeLeadership::leading())),
        Arc::new(AllowAll),
        GatewayServerConfig { auth_disabled: true, ..Default::default() },
    )
}

/// Collects a gzip-compressed binary response body.
pub(crate) async fn gunzip(response: Response<Full<Bytes>>) -> Vec<u8> {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(body.reader()).read_to_end(&mut decoded).unwrap();
    decoded
}
