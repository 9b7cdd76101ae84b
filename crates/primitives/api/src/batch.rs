//! Batch create requests and the per-item result envelope.
//!
//! A batch is a convenience grouping, not a transaction: sub-requests are
//! independent, and the response is a same-length, same-order sequence where
//! each slot holds the item's success payload or its isolated error.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// One slot of a batch response.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BatchResult<T> {
    Error { error: ApiError },
    Success(T),
}

impl<T> BatchResult<T> {
    pub fn err(error: ApiError) -> Self {
        Self::Error { error }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            Self::Error { error } => Some(error),
            Self::Success(_) => None,
        }
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Error { .. } => None,
            Self::Success(value) => Some(value),
        }
    }
}

impl<T> From<Result<T, ApiError>> for BatchResult<T> {
    fn from(res: Result<T, ApiError>) -> Self {
        match res {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Error { error },
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateAccountsRequest {
    pub requests: Vec<CreateAccountRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateAccountRequest {
    pub root_xpubs: Vec<String>,
    pub quorum: u32,
    pub alias: Option<String>,
    /// Arbitrary tag document. Kept raw so a malformed document fails only
    /// this item, not the whole batch.
    pub tags: Option<Box<RawValue>>,
    /// Caller-supplied idempotency token.
    pub client_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateAssetsRequest {
    pub requests: Vec<CreateAssetRequest>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateAssetRequest {
    pub root_xpubs: Vec<String>,
    pub quorum: u32,
    pub alias: Option<String>,
    pub definition: Option<Box<RawValue>>,
    pub tags: Option<Box<RawValue>>,
    pub client_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateControlProgramsRequest {
    pub requests: Vec<CreateControlProgramRequest>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CreateControlProgramRequest {
    Account {
        #[serde(default)]
        account_id: String,
        #[serde(default)]
        account_alias: String,
    },
}

/// Batch-create success payload for one account. Field order is fixed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Account {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub keys: Vec<AccountKey>,
    pub quorum: u32,
    pub tags: Option<Box<RawValue>>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccountKey {
    pub root_xpub: String,
    pub account_xpub: String,
    pub account_derivation_path: Vec<String>,
}

/// Batch-create success payload for one asset. Field order is fixed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Asset {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub issuance_program: String,
    pub keys: Vec<AssetKey>,
    pub quorum: u32,
    pub definition: Option<Box<RawValue>>,
    pub tags: Option<Box<RawValue>>,
    pub is_local: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AssetKey {
    pub asset_pubkey: String,
    pub root_xpub: String,
    pub asset_derivation_path: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ControlProgram {
    pub control_program: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreateKeyRequest {
    pub alias: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeleteKeyRequest {
    pub xpub: String,
}
