//! Batch asset definition.

use crate::accounts::decode_tags;
use crate::batch::run_batch;
use crate::domain::AssetIssuer;
use crate::errors::run_or_canceled;
use crate::ApiHandler;
use lp_api::batch::{Asset, AssetKey, BatchResult, CreateAssetRequest, CreateAssetsRequest};
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use std::sync::Arc;

impl ApiHandler {
    /// Defines the requested assets concurrently, one isolated slot per
    /// request.
    pub async fn create_assets(&self, ctx: &ServiceContext, req: CreateAssetsRequest) -> Vec<BatchResult<Asset>> {
        let assets = Arc::clone(&self.assets);
        run_batch(ctx, req.requests, move |subctx, item| {
            let assets = Arc::clone(&assets);
            create_asset(assets, subctx, item)
        })
        .await
    }
}

async fn create_asset(
    assets: Arc<dyn AssetIssuer>,
    ctx: ServiceContext,
    req: CreateAssetRequest,
) -> Result<Asset, ApiError> {
    let tags = decode_tags(req.tags.as_deref(), "tags")?;
    let definition = decode_tags(req.definition.as_deref(), "definition")?;

    let asset = run_or_canceled(
        &ctx,
        assets.define(&req.root_xpubs, req.quorum, definition, req.alias.as_deref(), tags, req.client_token.as_deref()),
    )
    .await?;

    Ok(Asset {
        id: asset.id,
        alias: asset.alias,
        issuance_program: asset.issuance_program,
        keys: asset
            .keys
            .into_iter()
            .map(|key| AssetKey {
                asset_pubkey: key.asset_pubkey,
                root_xpub: key.root_xpub,
                asset_derivation_path: key.derivation_path,
            })
            .collect(),
        quorum: asset.quorum,
        definition: req.definition,
        tags: req.tags,
        is_local: true,
    })
}
