//! Batch account creation.

use crate::batch::run_batch;
use crate::domain::AccountManager;
use crate::errors::run_or_canceled;
use crate::ApiHandler;
use lp_api::batch::{Account, AccountKey, BatchResult, CreateAccountRequest, CreateAccountsRequest};
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use serde_json::{Map, Value};
use std::sync::Arc;

impl ApiHandler {
    /// Creates the requested accounts concurrently. Slot `i` of the result
    /// holds the account created for request `i` or that item's error.
    pub async fn create_accounts(
        &self,
        ctx: &ServiceContext,
        req: CreateAccountsRequest,
    ) -> Vec<BatchResult<Account>> {
        let accounts = Arc::clone(&self.accounts);
        run_batch(ctx, req.requests, move |subctx, item| {
            let accounts = Arc::clone(&accounts);
            create_account(accounts, subctx, item)
        })
        .await
    }
}

/// Decodes tag documents before touching the domain service: a malformed
/// document is this item's failure, never the batch's.
pub(crate) fn decode_tags(raw: Option<&serde_json::value::RawValue>, what: &str) -> Result<Map<String, Value>, ApiError> {
    match raw {
        None => Ok(Map::new()),
        Some(raw) => serde_json::from_str(raw.get())
            .map_err(|err| ApiError::bad_request(format!("invalid {what} document: {err}"))),
    }
}

async fn create_account(
    accounts: Arc<dyn AccountManager>,
    ctx: ServiceContext,
    req: CreateAccountRequest,
) -> Result<Account, ApiError> {
    let tags = decode_tags(req.tags.as_deref(), "tags")?;

    let account = run_or_canceled(
        &ctx,
        accounts.create(&req.root_xpubs, req.quorum, req.alias.as_deref(), tags, req.client_token.as_deref()),
    )
    .await?;

    Ok(Account {
        id: account.id,
        alias: account.alias,
        keys: account
            .keys
            .into_iter()
            .map(|key| AccountKey {
                root_xpub: key.root_xpub,
                account_xpub: key.account_xpub,
                account_derivation_path: key.derivation_path,
            })
            .collect(),
        quorum: account.quorum,
        tags: req.tags,
    })
}
