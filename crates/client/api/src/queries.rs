//! List-query handlers: filtered cursor pagination, aggregation, tailing.
//!
//! Every handler follows the same shape: compile the filter, resolve or
//! decode the cursor, run the index query under the request's cancellation
//! scope, reshape the raw entities into their fixed-field-order response
//! types, and echo the query back as the continuation with its cursor
//! advanced. `last_page` is always computed from the returned count against
//! the requested limit; there is no separate "has more" probe.

use crate::cursor::{OutputsCursor, TxCursor};
use crate::errors::run_or_canceled;
use crate::ApiHandler;
use lp_api::query::{
    AccountKeyResponse, AccountResponse, AssetKeyResponse, AssetResponse, ListAccountsQuery, ListAssetsQuery,
    ListBalancesQuery, ListOutputsQuery, ListTxFeedsQuery, ListTxsQuery, TxFeedResponse, TxInputResponse,
    TxOutputResponse, TxResponse, UtxoResponse,
};
use lp_api::{ApiError, Page, DEFAULT_PAGE_SIZE};
use lp_utils::parsers::parse_duration;
use lp_utils::service::ServiceContext;
use serde_json::{Map, Value};

/// Largest instant the index can represent, in milliseconds.
const MAX_TIMESTAMP_MS: u64 = i64::MAX as u64;

/// Substitutes an unset upper time bound with the maximum representable
/// instant and rejects bounds beyond it before any query executes.
fn time_bound_or_max(timestamp_ms: u64) -> Result<u64, ApiError> {
    if timestamp_ms == 0 {
        Ok(MAX_TIMESTAMP_MS)
    } else if timestamp_ms > MAX_TIMESTAMP_MS {
        Err(ApiError::bad_request("timestamp is too large"))
    } else {
        Ok(timestamp_ms)
    }
}

impl ApiHandler {
    /// Lists accounts matching an ad-hoc filter.
    pub async fn list_accounts(
        &self,
        ctx: &ServiceContext,
        q: ListAccountsQuery,
    ) -> Result<Page<AccountResponse, ListAccountsQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;
        let predicate = self.filters.compile(&q.filter)?;

        let (accounts, after) =
            run_or_canceled(ctx, self.indexer.accounts(&predicate, &q.filter_params, &q.after, limit)).await?;

        let items = accounts.into_iter().map(account_response).collect::<Result<Vec<_>, _>>()?;
        let last_page = items.len() < limit;
        Ok(Page { items, last_page, next: ListAccountsQuery { after, ..q } })
    }

    /// Lists assets matching an ad-hoc filter.
    pub async fn list_assets(
        &self,
        ctx: &ServiceContext,
        q: ListAssetsQuery,
    ) -> Result<Page<AssetResponse, ListAssetsQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;
        let predicate = self.filters.compile(&q.filter)?;

        let (assets, after) =
            run_or_canceled(ctx, self.indexer.assets(&predicate, &q.filter_params, &q.after, limit)).await?;

        let items = assets.into_iter().map(asset_response).collect::<Result<Vec<_>, _>>()?;
        let last_page = items.len() < limit;
        Ok(Page { items, last_page, next: ListAssetsQuery { after, ..q } })
    }

    /// Sums matching outputs grouped by `sum_by`.
    ///
    /// An empty `sum_by` would yield a meaningless single total, so it is
    /// replaced with the documented default grouping by asset identity.
    /// Aggregation is computed over the full matching set in one call; the
    /// page is always the last one.
    pub async fn list_balances(
        &self,
        ctx: &ServiceContext,
        mut q: ListBalancesQuery,
    ) -> Result<Page<Value, ListBalancesQuery>, ApiError> {
        let predicate = self.filters.compile(&q.filter)?;

        if q.sum_by.is_empty() {
            q.sum_by = vec!["asset_alias".to_string(), "asset_id".to_string()];
        }

        let mut sum_by = Vec::with_capacity(q.sum_by.len());
        for field in &q.sum_by {
            sum_by.push(self.filters.parse_field(field)?);
        }

        let timestamp = time_bound_or_max(q.timestamp)?;

        let items =
            run_or_canceled(ctx, self.indexer.balances(&predicate, &q.filter_params, &sum_by, timestamp)).await?;

        Ok(Page { items, last_page: true, next: q })
    }

    /// Lists transactions within a time window.
    ///
    /// With no cursor supplied, the starting position is looked up from the
    /// window's lower bound. With `ascending_with_long_poll`, the call
    /// suspends until a matching transaction exists or the `timeout`
    /// duration elapses. The timeout is measured from call start.
    pub async fn list_transactions(
        &self,
        ctx: &ServiceContext,
        q: ListTxsQuery,
    ) -> Result<Page<TxResponse, ListTxsQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;

        let timeout = match q.timeout.as_str() {
            "" => None,
            timeout => {
                Some(parse_duration(timeout).map_err(|err| ApiError::bad_request(format!("parsing timeout: {err}")))?)
            }
        };

        let predicate = self.filters.compile(&q.filter)?;
        let end_time = time_bound_or_max(q.end_time)?;

        // Either decode the provided `after` or look one up for the window.
        let after: TxCursor = if q.after.is_empty() {
            run_or_canceled(ctx, self.indexer.lookup_tx_cursor(q.start_time, end_time)).await?
        } else {
            q.after.parse()?
        };

        let query =
            self.indexer.transactions(&predicate, &q.filter_params, after, limit, q.ascending_with_long_poll);
        let (txs, next_after) = match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, ctx.run_until_cancelled(query)).await {
                Err(_elapsed) => return Err(ApiError::timeout()),
                Ok(None) => return Err(ApiError::canceled()),
                Ok(Some(res)) => res?,
            },
            None => run_or_canceled(ctx, query).await?,
        };

        let items = txs.into_iter().map(tx_response).collect::<Result<Vec<_>, _>>()?;
        let last_page = items.len() < limit;
        Ok(Page { items, last_page, next: ListTxsQuery { after: next_after.to_string(), ..q } })
    }

    /// Lists unspent outputs as of an upper time bound.
    pub async fn list_unspent_outputs(
        &self,
        ctx: &ServiceContext,
        q: ListOutputsQuery,
    ) -> Result<Page<UtxoResponse, ListOutputsQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;
        let predicate = self.filters.compile(&q.filter)?;

        let after: Option<OutputsCursor> = if q.after.is_empty() { None } else { Some(q.after.parse()?) };
        let timestamp = time_bound_or_max(q.timestamp)?;

        let (outputs, next_after) = run_or_canceled(
            ctx,
            self.indexer.outputs(&predicate, &q.filter_params, timestamp, after, limit),
        )
        .await?;

        let items = outputs.into_iter().map(utxo_response).collect::<Result<Vec<_>, _>>()?;
        let last_page = items.len() < limit;
        Ok(Page { items, last_page, next: ListOutputsQuery { after: next_after.to_string(), ..q } })
    }

    /// Lists stored transaction feeds. Feeds take no filter.
    pub async fn list_tx_feeds(
        &self,
        ctx: &ServiceContext,
        q: ListTxFeedsQuery,
    ) -> Result<Page<TxFeedResponse, ListTxFeedsQuery>, ApiError> {
        let limit = DEFAULT_PAGE_SIZE;

        let (feeds, after) = run_or_canceled(ctx, self.indexer.tx_feeds(&q.after, limit)).await?;

        let last_page = feeds.len() < limit;
        Ok(Page { items: feeds, last_page, next: ListTxFeedsQuery { after } })
    }
}

fn take(obj: &mut Map<String, Value>, key: &str) -> Value {
    obj.remove(key).unwrap_or(Value::Null)
}

fn bad_output(entity: &str) -> ApiError {
    tracing::error!(target: "api_errors", "unexpected {entity} shape in index output");
    ApiError::internal("")
}

fn account_response(raw: Value) -> Result<AccountResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("account")) };
    let keys = match obj.remove("keys") {
        Some(Value::Array(keys)) => keys
            .into_iter()
            .filter_map(|key| match key {
                Value::Object(mut key) => Some(AccountKeyResponse {
                    root_xpub: take(&mut key, "root_xpub"),
                    account_xpub: take(&mut key, "account_xpub"),
                    account_derivation_path: take(&mut key, "account_derivation_path"),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(AccountResponse {
        id: take(&mut obj, "id"),
        alias: take(&mut obj, "alias"),
        keys,
        quorum: take(&mut obj, "quorum"),
        tags: take(&mut obj, "tags"),
    })
}

fn asset_response(raw: Value) -> Result<AssetResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("asset")) };
    let keys = match obj.remove("keys") {
        Some(Value::Array(keys)) => keys
            .into_iter()
            .filter_map(|key| match key {
                Value::Object(mut key) => Some(AssetKeyResponse {
                    root_xpub: take(&mut key, "root_xpub"),
                    asset_pubkey: take(&mut key, "asset_pubkey"),
                    asset_derivation_path: take(&mut key, "asset_derivation_path"),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    let alias = match obj.remove("alias") {
        Some(Value::String(alias)) if !alias.is_empty() => Some(alias),
        _ => None,
    };
    Ok(AssetResponse {
        id: take(&mut obj, "id"),
        alias,
        issuance_program: take(&mut obj, "issuance_program"),
        keys,
        quorum: take(&mut obj, "quorum"),
        definition: take(&mut obj, "definition"),
        tags: take(&mut obj, "tags"),
        is_local: take(&mut obj, "is_local"),
    })
}

fn tx_response(raw: Value) -> Result<TxResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("transaction")) };
    let inputs = match obj.remove("inputs") {
        Some(Value::Array(inputs)) => inputs.into_iter().map(tx_input_response).collect::<Result<Vec<_>, _>>()?,
        _ => return Err(bad_output("transaction input list")),
    };
    let outputs = match obj.remove("outputs") {
        Some(Value::Array(outputs)) => outputs.into_iter().map(tx_output_response).collect::<Result<Vec<_>, _>>()?,
        _ => return Err(bad_output("transaction output list")),
    };
    Ok(TxResponse {
        id: take(&mut obj, "id"),
        timestamp: take(&mut obj, "timestamp"),
        block_id: take(&mut obj, "block_id"),
        block_height: take(&mut obj, "block_height"),
        position: take(&mut obj, "position"),
        reference_data: take(&mut obj, "reference_data"),
        is_local: take(&mut obj, "is_local"),
        inputs,
        outputs,
    })
}

fn tx_input_response(raw: Value) -> Result<TxInputResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("transaction input")) };
    Ok(TxInputResponse {
        input_type: take(&mut obj, "type"),
        asset_id: take(&mut obj, "asset_id"),
        asset_alias: take(&mut obj, "asset_alias"),
        asset_definition: take(&mut obj, "asset_definition"),
        asset_tags: take(&mut obj, "asset_tags"),
        asset_is_local: take(&mut obj, "asset_is_local"),
        amount: take(&mut obj, "amount"),
        issuance_program: take(&mut obj, "issuance_program"),
        spent_output: take(&mut obj, "spent_output"),
        account_id: take(&mut obj, "account_id"),
        account_alias: take(&mut obj, "account_alias"),
        account_tags: take(&mut obj, "account_tags"),
        reference_data: take(&mut obj, "reference_data"),
        is_local: take(&mut obj, "is_local"),
    })
}

fn tx_output_response(raw: Value) -> Result<TxOutputResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("transaction output")) };
    Ok(TxOutputResponse {
        output_type: take(&mut obj, "type"),
        purpose: take(&mut obj, "purpose"),
        position: take(&mut obj, "position"),
        asset_id: take(&mut obj, "asset_id"),
        asset_alias: take(&mut obj, "asset_alias"),
        asset_definition: take(&mut obj, "asset_definition"),
        asset_tags: take(&mut obj, "asset_tags"),
        asset_is_local: take(&mut obj, "asset_is_local"),
        amount: take(&mut obj, "amount"),
        account_id: take(&mut obj, "account_id"),
        account_alias: take(&mut obj, "account_alias"),
        account_tags: take(&mut obj, "account_tags"),
        control_program: take(&mut obj, "control_program"),
        reference_data: take(&mut obj, "reference_data"),
        is_local: take(&mut obj, "is_local"),
    })
}

fn utxo_response(raw: Value) -> Result<UtxoResponse, ApiError> {
    let Value::Object(mut obj) = raw else { return Err(bad_output("output")) };
    Ok(UtxoResponse {
        output_type: take(&mut obj, "type"),
        purpose: take(&mut obj, "purpose"),
        transaction_id: take(&mut obj, "transaction_id"),
        position: take(&mut obj, "position"),
        asset_id: take(&mut obj, "asset_id"),
        asset_alias: take(&mut obj, "asset_alias"),
        asset_definition: take(&mut obj, "asset_definition"),
        asset_tags: take(&mut obj, "asset_tags"),
        asset_is_local: take(&mut obj, "asset_is_local"),
        amount: take(&mut obj, "amount"),
        account_id: take(&mut obj, "account_id"),
        account_alias: take(&mut obj, "account_alias"),
        account_tags: take(&mut obj, "account_tags"),
        control_program: take(&mut obj, "control_program"),
        reference_data: take(&mut obj, "reference_data"),
        is_local: take(&mut obj, "is_local"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountManager, Asset, AssetIssuer, DomainError, KeyStore, XPub};
    use crate::filter::{Field, FilterCompiler, FilterError, Predicate};
    use crate::indexer::{Indexer, IndexerError};
    use async_trait::async_trait;
    use lp_api::query::TxFeedResponse;
    use lp_api::{ApiErrorCode, FilterParam};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    struct Filters;

    impl FilterCompiler for Filters {
        fn compile(&self, filter: &str) -> Result<Predicate, FilterError> {
            if filter.contains("!!") {
                return Err(FilterError::Parse(format!("unexpected token in `{filter}`")));
            }
            Ok(Predicate::from_normalized(filter))
        }

        fn parse_field(&self, name: &str) -> Result<Field, FilterError> {
            if name.is_empty() || name.contains(' ') {
                return Err(FilterError::BadField(name.to_string()));
            }
            Ok(Field::from_validated(name))
        }
    }

    #[derive(Default)]
    struct FakeIndexer {
        accounts: Vec<Value>,
        txs: Mutex<Vec<Value>>,
        tx_arrived: Notify,
        balances: Vec<Value>,
        captured_sum_by: Mutex<Vec<String>>,
        lookup_calls: AtomicUsize,
        tx_calls: AtomicUsize,
    }

    fn page_after(items: &[Value], after: &str, limit: usize) -> (Vec<Value>, String) {
        let start: usize = if after.is_empty() { 0 } else { after.parse().unwrap() };
        let end = (start + limit).min(items.len());
        (items[start..end].to_vec(), end.to_string())
    }

    #[async_trait]
    impl Indexer for FakeIndexer {
        async fn accounts(
            &self,
            _predicate: &Predicate,
            _params: &[FilterParam],
            after: &str,
            limit: usize,
        ) -> Result<(Vec<Value>, String), IndexerError> {
            Ok(page_after(&self.accounts, after, limit))
        }

        async fn assets(
            &self,
            _predicate: &Predicate,
            _params: &[FilterParam],
            after: &str,
            limit: usize,
        ) -> Result<(Vec<Value>, String), IndexerError> {
            Ok(page_after(&self.accounts, after, limit))
        }

        async fn balances(
            &self,
            _predicate: &Predicate,
            _params: &[FilterParam],
            sum_by: &[Field],
            _timestamp_ms: u64,
        ) -> Result<Vec<Value>, IndexerError> {
            *self.captured_sum_by.lock().unwrap() = sum_by.iter().map(|f| f.as_str().to_string()).collect();
            Ok(self.balances.clone())
        }

        async fn lookup_tx_cursor(&self, start_ms: u64, end_ms: u64) -> Result<TxCursor, IndexerError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            Ok(TxCursor { from_block_height: start_ms, from_position: 0, stop_block_height: end_ms })
        }

        async fn transactions(
            &self,
            _predicate: &Predicate,
            _params: &[FilterParam],
            after: TxCursor,
            _limit: usize,
            ascending_with_long_poll: bool,
        ) -> Result<(Vec<Value>, TxCursor), IndexerError> {
            self.tx_calls.fetch_add(1, Ordering::SeqCst);
            loop {
                {
                    let txs = self.txs.lock().unwrap();
                    if !txs.is_empty() || !ascending_with_long_poll {
                        let next = TxCursor { from_position: after.from_position + txs.len() as u32, ..after };
                        return Ok((txs.clone(), next));
                    }
                }
                self.tx_arrived.notified().await;
            }
        }

        async fn outputs(
            &self,
            _predicate: &Predicate,
            _params: &[FilterParam],
            _timestamp_ms: u64,
            after: Option<OutputsCursor>,
            _limit: usize,
        ) -> Result<(Vec<Value>, OutputsCursor), IndexerError> {
            Ok((vec![json!({"type": "control", "amount": 5})], after.unwrap_or_default()))
        }

        async fn tx_feeds(&self, _after: &str, _limit: usize) -> Result<(Vec<TxFeedResponse>, String), IndexerError> {
            Ok((vec![TxFeedResponse { id: "feed1".into(), alias: None, filter: String::new(), after: String::new() }], "1".into()))
        }
    }

    struct NoDomain;

    #[async_trait]
    impl AccountManager for NoDomain {
        async fn create(
            &self,
            _root_xpubs: &[String],
            _quorum: u32,
            _alias: Option<&str>,
            _tags: Map<String, Value>,
            _client_token: Option<&str>,
        ) -> Result<Account, DomainError> {
            unreachable!("not used by query tests")
        }

        async fn find_by_alias(&self, _alias: &str) -> Result<Account, DomainError> {
            unreachable!("not used by query tests")
        }

        async fn create_control_program(&self, _account_id: &str, _change: bool) -> Result<String, DomainError> {
            unreachable!("not used by query tests")
        }
    }

    #[async_trait]
    impl AssetIssuer for NoDomain {
        async fn define(
            &self,
            _root_xpubs: &[String],
            _quorum: u32,
            _definition: Map<String, Value>,
            _alias: Option<&str>,
            _tags: Map<String, Value>,
            _client_token: Option<&str>,
        ) -> Result<Asset, DomainError> {
            unreachable!("not used by query tests")
        }
    }

    #[async_trait]
    impl KeyStore for NoDomain {
        async fn create_key(&self, _alias: Option<&str>) -> Result<XPub, DomainError> {
            unreachable!("not used by query tests")
        }

        async fn list_keys(
            &self,
            _aliases: &[String],
            _after: &str,
            _limit: usize,
        ) -> Result<(Vec<XPub>, String), DomainError> {
            unreachable!("not used by query tests")
        }

        async fn delete_key(&self, _xpub: &str) -> Result<(), DomainError> {
            unreachable!("not used by query tests")
        }
    }

    fn handler(indexer: Arc<FakeIndexer>) -> ApiHandler {
        let domain = Arc::new(NoDomain);
        ApiHandler::new(indexer, Arc::new(Filters), domain.clone(), domain.clone(), domain)
    }

    #[tokio::test]
    async fn pagination_visits_every_account_exactly_once() {
        let total = DEFAULT_PAGE_SIZE * 2 + 50;
        let indexer =
            Arc::new(FakeIndexer { accounts: (0..total).map(|i| json!({"id": format!("acc{i}")})).collect(), ..Default::default() });
        let handler = handler(indexer);
        let ctx = ServiceContext::new();

        let mut seen = Vec::new();
        let mut pages = 0;
        let mut q = ListAccountsQuery::default();
        loop {
            let page = handler.list_accounts(&ctx, q).await.unwrap();
            pages += 1;
            seen.extend(page.items.iter().map(|item| item.id.as_str().unwrap().to_string()));
            if page.last_page {
                break;
            }
            q = page.next;
        }

        assert_eq!(pages, 3);
        assert_eq!(seen.len(), total);
        for (i, id) in seen.iter().enumerate() {
            assert_eq!(id, &format!("acc{i}"));
        }
    }

    #[tokio::test]
    async fn bad_filter_is_a_caller_error() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();
        let err = handler
            .list_accounts(&ctx, ListAccountsQuery { filter: "!!".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn balances_default_to_grouping_by_asset_identity() {
        let indexer = Arc::new(FakeIndexer { balances: vec![json!({"amount": 10})], ..Default::default() });
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        let page = handler.list_balances(&ctx, ListBalancesQuery::default()).await.unwrap();
        assert!(page.last_page);
        assert_eq!(*indexer.captured_sum_by.lock().unwrap(), vec!["asset_alias".to_string(), "asset_id".to_string()]);
        // The continuation echoes the substituted default.
        assert_eq!(page.next.sum_by, vec!["asset_alias".to_string(), "asset_id".to_string()]);
    }

    #[tokio::test]
    async fn balances_reject_unknown_grouping_fields() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();
        let err = handler
            .list_balances(&ctx, ListBalancesQuery { sum_by: vec!["no such field".into()], ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn oversized_time_bound_is_rejected_before_querying() {
        let indexer = Arc::new(FakeIndexer::default());
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        let err = handler
            .list_transactions(&ctx, ListTxsQuery { end_time: u64::MAX, ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
        assert_eq!(indexer.lookup_calls.load(Ordering::SeqCst), 0);
        assert_eq!(indexer.tx_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_cursor_is_resolved_from_the_time_window() {
        let indexer = Arc::new(FakeIndexer::default());
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        let page = handler
            .list_transactions(&ctx, ListTxsQuery { start_time: 7, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(indexer.lookup_calls.load(Ordering::SeqCst), 1);
        // Unset upper bound behaves as the maximum representable instant.
        assert_eq!(page.next.after, format!("7:0-{}", i64::MAX));
    }

    #[tokio::test]
    async fn explicit_cursor_skips_the_lookup() {
        let indexer = Arc::new(FakeIndexer::default());
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        handler
            .list_transactions(&ctx, ListTxsQuery { after: "5:1-900".into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(indexer.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_cursor_is_a_caller_error() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();
        let err = handler
            .list_transactions(&ctx, ListTxsQuery { after: "not-a-cursor".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn malformed_timeout_fails_before_any_wait() {
        let indexer = Arc::new(FakeIndexer::default());
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        let err = handler
            .list_transactions(
                &ctx,
                ListTxsQuery { timeout: "5parsecs".into(), ascending_with_long_poll: true, ..Default::default() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::BadRequest);
        assert_eq!(indexer.tx_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tailing_query_times_out_with_a_timeout_error() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();

        let err = handler
            .list_transactions(
                &ctx,
                ListTxsQuery { timeout: "5s".into(), ascending_with_long_poll: true, ..Default::default() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ApiErrorCode::Timeout);
    }

    #[tokio::test]
    async fn tailing_query_returns_a_late_arriving_transaction() {
        let indexer = Arc::new(FakeIndexer::default());
        let handler = handler(indexer.clone());
        let ctx = ServiceContext::new();

        let committer = {
            let indexer = Arc::clone(&indexer);
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                indexer.txs.lock().unwrap().push(json!({"id": "tx1", "inputs": [], "outputs": []}));
                indexer.tx_arrived.notify_one();
            })
        };

        let page = handler
            .list_transactions(
                &ctx,
                ListTxsQuery { timeout: "30s".into(), ascending_with_long_poll: true, ..Default::default() },
            )
            .await
            .unwrap();
        committer.await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, json!("tx1"));
    }

    #[tokio::test]
    async fn canceled_tailing_query_reports_cancellation() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();

        let canceller = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                ctx.cancel_global();
            })
        };

        let err = handler
            .list_transactions(&ctx, ListTxsQuery { ascending_with_long_poll: true, ..Default::default() })
            .await
            .unwrap_err();
        canceller.await.unwrap();
        assert_eq!(err.code, ApiErrorCode::Canceled);
    }

    #[tokio::test]
    async fn outputs_echo_an_advanced_cursor() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();

        let page = handler
            .list_unspent_outputs(&ctx, ListOutputsQuery { after: "3:1:0".into(), ..Default::default() })
            .await
            .unwrap();
        assert!(page.last_page);
        assert_eq!(page.next.after, "3:1:0");
        assert_eq!(page.items[0].amount, json!(5));
    }

    #[tokio::test]
    async fn tx_feeds_are_listed_without_a_filter() {
        let handler = handler(Arc::new(FakeIndexer::default()));
        let ctx = ServiceContext::new();

        let page = handler.list_tx_feeds(&ctx, ListTxFeedsQuery::default()).await.unwrap();
        assert_eq!(page.items[0].id, "feed1");
        assert!(page.last_page);
    }

    #[test]
    fn tx_reshaping_orders_account_fields_between_amount_and_reference_data() {
        let raw = json!({
            "id": "tx1",
            "timestamp": 99,
            "inputs": [{"type": "spend", "amount": 5, "account_id": "acc1", "asset_id": "a1"}],
            "outputs": [],
        });
        let resp = tx_response(raw).unwrap();
        let json = serde_json::to_string(&resp.inputs[0]).unwrap();
        assert_eq!(
            json,
            r#"{"type":"spend","asset_id":"a1","asset_definition":null,"asset_is_local":null,"amount":5,"account_id":"acc1","reference_data":null,"is_local":null}"#
        );
    }

    #[test]
    fn non_object_transactions_are_an_internal_error() {
        let err = tx_response(json!("not an object")).unwrap_err();
        assert_eq!(err.code, ApiErrorCode::Internal);
    }
}
