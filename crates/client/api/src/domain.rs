//! Interfaces to the domain mutation services.
//!
//! Account/asset domain logic (signer quorums, key derivation) and key
//! management live outside this crate; the traits below are the contract the
//! request-processing core consumes.

use async_trait::async_trait;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The request is unacceptable as stated (bad alias, bad key material,
    /// quorum larger than the key set). A caller error.
    #[error("{0}")]
    Invalid(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub alias: Option<String>,
    pub quorum: u32,
    pub keys: Vec<AccountKey>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountKey {
    pub root_xpub: String,
    pub account_xpub: String,
    pub derivation_path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub alias: Option<String>,
    pub issuance_program: String,
    pub quorum: u32,
    pub keys: Vec<AssetKey>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetKey {
    pub root_xpub: String,
    pub asset_pubkey: String,
    pub derivation_path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XPub {
    pub xpub: String,
    pub alias: Option<String>,
}

#[async_trait]
pub trait AccountManager: Send + Sync {
    /// Creates an account. `client_token` is a caller-supplied idempotency
    /// token: resubmitting the same token returns the original account.
    async fn create(
        &self,
        root_xpubs: &[String],
        quorum: u32,
        alias: Option<&str>,
        tags: Map<String, Value>,
        client_token: Option<&str>,
    ) -> Result<Account, DomainError>;

    async fn find_by_alias(&self, alias: &str) -> Result<Account, DomainError>;

    /// Creates a new control program under the account, returned in its
    /// canonical text encoding.
    async fn create_control_program(&self, account_id: &str, change: bool) -> Result<String, DomainError>;
}

#[async_trait]
pub trait AssetIssuer: Send + Sync {
    async fn define(
        &self,
        root_xpubs: &[String],
        quorum: u32,
        definition: Map<String, Value>,
        alias: Option<&str>,
        tags: Map<String, Value>,
        client_token: Option<&str>,
    ) -> Result<Asset, DomainError>;
}

#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn create_key(&self, alias: Option<&str>) -> Result<XPub, DomainError>;

    async fn list_keys(&self, aliases: &[String], after: &str, limit: usize)
        -> Result<(Vec<XPub>, String), DomainError>;

    async fn delete_key(&self, xpub: &str) -> Result<(), DomainError>;
}
