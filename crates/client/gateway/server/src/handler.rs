//! Node-to-node RPC handlers.

use crate::error::GatewayError;
use crate::helpers::{create_bytes_response, create_json_response, height_from_params};
use crate::Gateway;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use lc_gateway_client::NodeProvider;
use lp_api::node::{GetBlockHeightResponse, SnapshotInfoResponse, SubmitTxResponse};
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use std::collections::HashMap;

/// Serves the raw encoded block at the requested height, holding the call
/// open until that block exists. Shutdown or a dropped caller interrupts the
/// wait with a wait-canceled error rather than hanging.
pub(crate) async fn handle_get_block(
    params: &HashMap<String, String>,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Result<Response<Full<Bytes>>, GatewayError> {
    let height = height_from_params(params)?;

    ctx.run_until_cancelled(gw.chain.block_soon(height)).await.ok_or(GatewayError::WaitCanceled)?;

    let raw = gw
        .store
        .raw_block(height)
        .await?
        .ok_or_else(|| GatewayError::Api(ApiError::not_found(format!("block at height {height}"))))?;

    Ok(create_bytes_response(StatusCode::OK, &raw))
}

pub(crate) async fn handle_get_snapshot_info(gw: &Gateway) -> Result<Response<Full<Bytes>>, GatewayError> {
    let (height, size) = gw
        .store
        .latest_snapshot_info()
        .await?
        .ok_or_else(|| GatewayError::Api(ApiError::not_found("no snapshot available")))?;

    let info = SnapshotInfoResponse { height, size, network_id: gw.store.network_id() };
    Ok(create_json_response(StatusCode::OK, &info))
}

pub(crate) async fn handle_get_snapshot(
    params: &HashMap<String, String>,
    gw: &Gateway,
) -> Result<Response<Full<Bytes>>, GatewayError> {
    let height = height_from_params(params)?;

    let data = gw
        .store
        .snapshot(height)
        .await?
        .ok_or_else(|| GatewayError::Api(ApiError::not_found(format!("snapshot at height {height}"))))?;

    Ok(create_bytes_response(StatusCode::OK, &data))
}

pub(crate) async fn handle_get_height(gw: &Gateway) -> Result<Response<Full<Bytes>>, GatewayError> {
    Ok(create_json_response(StatusCode::OK, &GetBlockHeightResponse { height: gw.chain.height() }))
}

pub(crate) async fn handle_submit_tx(
    raw_tx: Bytes,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Result<Response<Full<Bytes>>, GatewayError> {
    ctx.run_until_cancelled(gw.chain.add_tx(raw_tx)).await.ok_or(GatewayError::WaitCanceled)??;
    Ok(create_json_response(StatusCode::OK, &SubmitTxResponse { ok: true }))
}

/// Signs a block, executing locally when this node leads and forwarding the
/// call verbatim to the current leader otherwise.
pub(crate) async fn handle_sign_block(
    raw_block: Bytes,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Result<Response<Full<Bytes>>, GatewayError> {
    if !gw.leadership.is_leading() {
        let addr =
            gw.leadership.leader_addr().await.map_err(|err| GatewayError::Delegation(format!("{err:#}")))?;

        // The provider lives only for this one forwarded call; its
        // connection is released on every exit path.
        let mut provider = NodeProvider::new(addr);
        if let Some(token) = gw.leadership.access_token() {
            provider = provider.with_access_token(&token)?;
        }

        let signature =
            ctx.run_until_cancelled(provider.sign_block(raw_block)).await.ok_or(GatewayError::WaitCanceled)??;
        return Ok(create_bytes_response(StatusCode::OK, &signature));
    }

    let Some(signer) = &gw.signer else {
        return Err(GatewayError::Api(ApiError::unavailable("this node is not configured as a block signer")));
    };

    let signature =
        ctx.run_until_cancelled(signer.sign_block(raw_block)).await.ok_or(GatewayError::WaitCanceled)??;
    Ok(create_bytes_response(StatusCode::OK, &signature))
}
