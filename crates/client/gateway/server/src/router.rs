use crate::error::GatewayError;
use crate::handler::{
    handle_get_block, handle_get_height, handle_get_snapshot, handle_get_snapshot_info, handle_sign_block,
    handle_submit_tx,
};
use crate::helpers::{
    create_json_response, decode_json_body, get_params_from_request, not_found_response, read_request_body,
};
use crate::Gateway;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response, StatusCode};
use lp_utils::service::ServiceContext;
use std::net::SocketAddr;

/// Routes one inbound call through the interceptor pipeline and on to its
/// handler. Always resolves to a response: handler errors are translated
/// into structured error envelopes here.
pub(crate) async fn main_router<B>(
    req: Request<B>,
    peer: Option<SocketAddr>,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Response<Full<Bytes>>
where
    B: hyper::body::Body + Send,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    let path = req.uri().path().split('/').filter(|segment| !segment.is_empty()).collect::<Vec<_>>().join("/");

    if path == "health" {
        return Response::new(Full::new(Bytes::from_static(b"OK")));
    }

    if let Err(err) = gw.intercept(peer, req.headers()).await {
        tracing::debug!(target: "gateway_calls", "{path}: rejected: {err}");
        return err.into();
    }

    let res = match path.strip_prefix("node/") {
        Some(node_path) => node_router(req, node_path, gw, ctx).await,
        None => api_router(req, &path, gw, ctx).await,
    };
    res.unwrap_or_else(Into::into)
}

/// Router for the node-to-node RPC surface.
async fn node_router<B>(
    req: Request<B>,
    path: &str,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Result<Response<Full<Bytes>>, GatewayError>
where
    B: hyper::body::Body + Send,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    match (req.method(), path) {
        (&Method::GET, "get-block") => handle_get_block(&get_params_from_request(&req), gw, ctx).await,
        (&Method::GET, "get-snapshot-info") => handle_get_snapshot_info(gw).await,
        (&Method::GET, "get-snapshot") => handle_get_snapshot(&get_params_from_request(&req), gw).await,
        (&Method::GET, "get-height") => handle_get_height(gw).await,
        (&Method::POST, "submit-tx") => {
            let raw = read_request_body(req).await?;
            handle_submit_tx(raw, gw, ctx).await
        }
        (&Method::POST, "sign-block") => {
            let raw = read_request_body(req).await?;
            handle_sign_block(raw, gw, ctx).await
        }
        _ => {
            tracing::debug!(target: "gateway_calls", "node RPC received invalid request: {path}");
            Ok(not_found_response())
        }
    }
}

/// Router for the client-facing list/create operations.
async fn api_router<B>(
    req: Request<B>,
    path: &str,
    gw: &Gateway,
    ctx: &ServiceContext,
) -> Result<Response<Full<Bytes>>, GatewayError>
where
    B: hyper::body::Body + Send,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    match (req.method(), path) {
        (&Method::POST, "list-accounts") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_accounts(ctx, q).await?))
        }
        (&Method::POST, "list-assets") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_assets(ctx, q).await?))
        }
        (&Method::POST, "list-balances") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_balances(ctx, q).await?))
        }
        (&Method::POST, "list-transactions") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_transactions(ctx, q).await?))
        }
        (&Method::POST, "list-unspent-outputs") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_unspent_outputs(ctx, q).await?))
        }
        (&Method::POST, "list-transaction-feeds") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_tx_feeds(ctx, q).await?))
        }
        (&Method::POST, "list-keys") => {
            let q = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.list_keys(ctx, q).await?))
        }
        (&Method::POST, "create-accounts") => {
            let body = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.create_accounts(ctx, body).await))
        }
        (&Method::POST, "create-assets") => {
            let body = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.create_assets(ctx, body).await))
        }
        (&Method::POST, "create-control-programs") => {
            let body = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.create_control_programs(ctx, body).await))
        }
        (&Method::POST, "create-key") => {
            let body = decode_json_body(req).await?;
            Ok(create_json_response(StatusCode::OK, &gw.api.create_key(ctx, body).await?))
        }
        (&Method::POST, "delete-key") => {
            let body = decode_json_body(req).await?;
            gw.api.delete_key(ctx, body).await?;
            Ok(create_json_response(StatusCode::OK, &serde_json::json!({})))
        }
        _ => {
            tracing::debug!(target: "gateway_calls", "received invalid request: {path}");
            Ok(not_found_response())
        }
    }
}
