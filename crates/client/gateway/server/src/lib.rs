//! The Lumen node gateway.
//!
//! One HTTP/1 surface carries both the client-facing list/create operations
//! (dispatched onto [lc_api::ApiHandler]) and the node-to-node RPCs:
//! `get-block` (with its block-soon wait), `get-snapshot-info`,
//! `get-snapshot`, `get-height`, `submit-tx` and the leader-only
//! `sign-block`. Every call runs through the same interceptor pipeline
//! (request-id assignment, per-peer rate limiting, authentication) and every
//! failure leaves the boundary as a structured error payload, never a
//! dropped connection.

pub mod auth;
pub mod chain;
pub mod error;
mod handler;
mod helpers;
pub mod limit;
mod router;
mod service;
#[cfg(test)]
pub(crate) mod testutil;

use auth::{ApiAuthn, CredentialVerifier};
use chain::{BlockSigner, Chain, Leadership, SnapshotStore};
use error::GatewayError;
use hyper::header::HeaderMap;
use lc_api::ApiHandler;
use limit::BucketLimiter;
use lp_api::ApiError;
use std::net::SocketAddr;
use std::sync::Arc;

pub use service::{start_server, GatewayServerConfig};

/// Shared state behind every inbound gateway call.
pub struct Gateway {
    pub api: ApiHandler,
    pub chain: Arc<dyn Chain>,
    pub store: Arc<dyn SnapshotStore>,
    /// Present only on nodes configured as block signers.
    pub signer: Option<Arc<dyn BlockSigner>>,
    pub leadership: Arc<dyn Leadership>,
    auth: ApiAuthn,
    limiter: BucketLimiter,
    config: GatewayServerConfig,
}

impl Gateway {
    pub fn new(
        api: ApiHandler,
        chain: Arc<dyn Chain>,
        store: Arc<dyn SnapshotStore>,
        signer: Option<Arc<dyn BlockSigner>>,
        leadership: Arc<dyn Leadership>,
        verifier: Arc<dyn CredentialVerifier>,
        config: GatewayServerConfig,
    ) -> Self {
        Self {
            api,
            chain,
            store,
            signer,
            leadership,
            auth: ApiAuthn::new(verifier, config.auth_disabled),
            limiter: BucketLimiter::new(config.request_limit, config.request_burst),
            config,
        }
    }

    pub fn config(&self) -> &GatewayServerConfig {
        &self.config
    }

    /// Runs the pre-dispatch pipeline: rate limit, then authentication.
    ///
    /// A call whose peer address cannot be determined is rejected outright:
    /// the limiter fails closed, never open.
    pub(crate) async fn intercept(&self, peer: Option<SocketAddr>, headers: &HeaderMap) -> Result<(), GatewayError> {
        let peer = peer.ok_or_else(|| GatewayError::Api(ApiError::rate_limited()))?;
        if !self.limiter.allow(&peer.ip().to_string()) {
            return Err(GatewayError::Api(ApiError::rate_limited()));
        }

        self.auth.authenticate(headers).await
    }
}
