//! Shared fakes for handler tests.

use crate::cursor::{OutputsCursor, TxCursor};
use crate::domain::{Account, AccountManager, Asset, AssetIssuer, DomainError, KeyStore, XPub};
use crate::filter::{Field, FilterCompiler, FilterError, Predicate};
use crate::indexer::{Indexer, IndexerError};
use crate::ApiHandler;
use async_trait::async_trait;
use lp_api::query::TxFeedResponse;
use lp_api::FilterParam;
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct FakeDomain {
    pub accounts: Arc<dyn AccountManager>,
    pub assets: Arc<dyn AssetIssuer>,
    pub keys: Arc<dyn KeyStore>,
}

impl FakeDomain {
    pub fn none() -> Self {
        Self { accounts: Arc::new(Unused), assets: Arc::new(Unused), keys: Arc::new(Unused) }
    }

    pub fn accounts(accounts: Arc<dyn AccountManager>) -> Self {
        Self { accounts, assets: Arc::new(Unused), keys: Arc::new(Unused) }
    }

    pub fn assets(assets: Arc<dyn AssetIssuer>) -> Self {
        Self { accounts: Arc::new(Unused), assets, keys: Arc::new(Unused) }
    }

    pub fn keys(keys: Arc<dyn KeyStore>) -> Self {
        Self { accounts: Arc::new(Unused), assets: Arc::new(Unused), keys }
    }
}

pub fn test_handler(domain: FakeDomain) -> ApiHandler {
    ApiHandler::new(Arc::new(Unused), Arc::new(AnyFilter), domain.accounts, domain.assets, domain.keys)
}

/// Accepts any filter and any field name.
pub struct AnyFilter;

impl FilterCompiler for AnyFilter {
    fn compile(&self, filter: &str) -> Result<Predicate, FilterError> {
        Ok(Predicate::from_normalized(filter))
    }

    fn parse_field(&self, name: &str) -> Result<Field, FilterError> {
        Ok(Field::from_validated(name))
    }
}

/// Placeholder service for the collaborators a test does not exercise.
pub struct Unused;

#[async_trait]
impl AccountManager for Unused {
    async fn create(
        &self,
        _root_xpubs: &[String],
        _quorum: u32,
        _alias: Option<&str>,
        _tags: Map<String, Value>,
        _client_token: Option<&str>,
    ) -> Result<Account, DomainError> {
        unreachable!("account manager not under test")
    }

    async fn find_by_alias(&self, _alias: &str) -> Result<Account, DomainError> {
        unreachable!("account manager not under test")
    }

    async fn create_control_program(&self, _account_id: &str, _change: bool) -> Result<String, DomainError> {
        unreachable!("account manager not under test")
    }
}

#[async_trait]
impl AssetIssuer for Unused {
    async fn define(
        &self,
        _root_xpubs: &[String],
        _quorum: u32,
        _definition: Map<String, Value>,
        _alias: Option<&str>,
        _tags: Map<String, Value>,
        _client_token: Option<&str>,
    ) -> Result<Asset, DomainError> {
        unreachable!("asset issuer not under test")
    }
}

#[async_trait]
impl KeyStore for Unused {
    async fn create_key(&self, _alias: Option<&str>) -> Result<XPub, DomainError> {
        unreachable!("key store not under test")
    }

    async fn list_keys(
        &self,
        _aliases: &[String],
        _after: &str,
        _limit: usize,
    ) -> Result<(Vec<XPub>, String), DomainError> {
        unreachable!("key store not under test")
    }

    async fn delete_key(&self, _xpub: &str) -> Result<(), DomainError> {
        unreachable!("key store not under test")
    }
}

#[async_trait]
impl Indexer for Unused {
    async fn accounts(
        &self,
        _predicate: &Predicate,
        _params: &[FilterParam],
        _after: &str,
        _limit: usize,
    ) -> Result<(Vec<Value>, String), IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn assets(
        &self,
        _predicate: &Predicate,
        _params: &[FilterParam],
        _after: &str,
        _limit: usize,
    ) -> Result<(Vec<Value>, String), IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn balances(
        &self,
        _predicate: &Predicate,
        _params: &[FilterParam],
        _sum_by: &[Field],
        _timestamp_ms: u64,
    ) -> Result<Vec<Value>, IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn lookup_tx_cursor(&self, _start_ms: u64, _end_ms: u64) -> Result<TxCursor, IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn transactions(
        &self,
        _predicate: &Predicate,
        _params: &[FilterParam],
        _after: TxCursor,
        _limit: usize,
        _ascending_with_long_poll: bool,
    ) -> Result<(Vec<Value>, TxCursor), IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn outputs(
        &self,
        _predicate: &Predicate,
        _params: &[FilterParam],
        _timestamp_ms: u64,
        _after: Option<OutputsCursor>,
        _limit: usize,
    ) -> Result<(Vec<Value>, OutputsCursor), IndexerError> {
        unreachable!("indexer not under test")
    }

    async fn tx_feeds(&self, _after: &str, _limit: usize) -> Result<(Vec<TxFeedResponse>, String), IndexerError> {
        unreachable!("indexer not under test")
    }
}
