//! Interface to the external index/query service.

use crate::cursor::{OutputsCursor, TxCursor};
use crate::filter::{Field, Predicate};
use async_trait::async_trait;
use lp_api::query::TxFeedResponse;
use lp_api::FilterParam;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// The query itself is unacceptable (e.g. parameter count or type
    /// mismatch against the compiled predicate). A caller error.
    #[error("invalid query: {0}")]
    BadQuery(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Queryable projections of ledger entities.
///
/// The index owns storage layout and predicate evaluation; this crate only
/// relies on the paging contract: each method returns at most `limit`
/// entities in the collection's total order, starting strictly after the
/// given cursor, together with the cursor of the last entity returned.
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn accounts(
        &self,
        predicate: &Predicate,
        params: &[FilterParam],
        after: &str,
        limit: usize,
    ) -> Result<(Vec<Value>, String), IndexerError>;

    async fn assets(
        &self,
        predicate: &Predicate,
        params: &[FilterParam],
        after: &str,
        limit: usize,
    ) -> Result<(Vec<Value>, String), IndexerError>;

    /// Group-by summation over all matching outputs as of `timestamp_ms`.
    /// Not paginated: the full result is computed in one call.
    async fn balances(
        &self,
        predicate: &Predicate,
        params: &[FilterParam],
        sum_by: &[Field],
        timestamp_ms: u64,
    ) -> Result<Vec<Value>, IndexerError>;

    /// Resolves the starting cursor for a time-windowed transaction scan:
    /// the position of the first transaction at or after `start_ms`, with
    /// the scan bounded above by `end_ms`.
    async fn lookup_tx_cursor(&self, start_ms: u64, end_ms: u64) -> Result<TxCursor, IndexerError>;

    /// Lists transactions after the cursor. With `ascending_with_long_poll`
    /// set, blocks until at least one matching transaction exists instead of
    /// returning an empty page; the caller owns the deadline.
    async fn transactions(
        &self,
        predicate: &Predicate,
        params: &[FilterParam],
        after: TxCursor,
        limit: usize,
        ascending_with_long_poll: bool,
    ) -> Result<(Vec<Value>, TxCursor), IndexerError>;

    async fn outputs(
        &self,
        predicate: &Predicate,
        params: &[FilterParam],
        timestamp_ms: u64,
        after: Option<OutputsCursor>,
        limit: usize,
    ) -> Result<(Vec<Value>, OutputsCursor), IndexerError>;

    async fn tx_feeds(&self, after: &str, limit: usize) -> Result<(Vec<TxFeedResponse>, String), IndexerError>;
}
