//! Lumen request-processing core.
//!
//! [ApiHandler] turns client requests into paginated, optionally aggregated
//! reads over indexed ledger state and into concurrently-executed batches of
//! ledger mutations. The index, filter compiler, and domain mutation
//! services are injected behind traits; this crate owns the request
//! contracts: cursor semantics, last-page determination, continuation
//! assembly, time-bound defaulting, tailing waits, and per-item failure
//! isolation inside batches.

pub mod accounts;
pub mod assets;
pub mod batch;
pub mod control_programs;
pub mod cursor;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod indexer;
pub mod keys;
pub mod queries;
#[cfg(any(test, feature = "testing"))]
pub mod testutil;

use std::sync::Arc;

use domain::{AccountManager, AssetIssuer, KeyStore};
use filter::FilterCompiler;
use indexer::Indexer;

pub use cursor::{CursorError, OutputsCursor, TxCursor};
pub use filter::{Field, FilterError, Predicate};

/// The API request-processing core.
///
/// One instance is shared by every inbound call; all fields are
/// injected services.
#[derive(Clone)]
pub struct ApiHandler {
    pub indexer: Arc<dyn Indexer>,
    pub filters: Arc<dyn FilterCompiler>,
    pub accounts: Arc<dyn AccountManager>,
    pub assets: Arc<dyn AssetIssuer>,
    pub keys: Arc<dyn KeyStore>,
}

impl ApiHandler {
    pub fn new(
        indexer: Arc<dyn Indexer>,
        filters: Arc<dyn FilterCompiler>,
        accounts: Arc<dyn AccountManager>,
        assets: Arc<dyn AssetIssuer>,
        keys: Arc<dyn KeyStore>,
    ) -> Self {
        Self { indexer, filters, accounts, assets, keys }
    }
}
