use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Instant,
};

use anyhow::Context;
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use lp_utils::service::ServiceContext;
use tokio::net::TcpListener;
use tracing::Instrument;

use super::router::main_router;
use crate::Gateway;

#[derive(Debug, Clone)]
pub struct GatewayServerConfig {
    /// Listen on all interfaces instead of loopback only.
    pub gateway_external: bool,
    pub gateway_port: u16,
    /// Sustained per-peer request rate, per second.
    pub request_limit: u64,
    /// Per-peer burst capacity.
    pub request_burst: u64,
    /// Admit calls without credentials. Local development only.
    pub auth_disabled: bool,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            gateway_external: false,
            gateway_port: 1999,
            request_limit: 500,
            request_burst: 100,
            auth_disabled: false,
        }
    }
}

pub async fn start_server(gateway: Arc<Gateway>, ctx: ServiceContext) -> anyhow::Result<()> {
    let listen_addr = if gateway.config().gateway_external {
        Ipv4Addr::UNSPECIFIED // listen on 0.0.0.0
    } else {
        Ipv4Addr::LOCALHOST
    };
    let addr = SocketAddr::new(listen_addr.into(), gateway.config().gateway_port);
    let listener = TcpListener::bind(addr).await.with_context(|| format!("Opening socket server at {addr}"))?;

    let addr = listener.local_addr().context("Getting the bound-to address")?;
    tracing::info!("🌐 Gateway endpoint started at {}", addr);

    while let Some(res) = ctx.run_until_cancelled(listener.accept()).await {
        // Handle new incoming connections
        if let Ok((stream, peer_addr)) = res {
            let io = TokioIo::new(stream);

            let gateway = Arc::clone(&gateway);
            let ctx = ctx.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let gateway = Arc::clone(&gateway);
                    let ctx = ctx.child();
                    async move {
                        let path = req.uri().path().to_string();
                        let start = Instant::now();

                        let span = tracing::info_span!(
                            target: "gateway_calls",
                            "request",
                            request_id = %lp_utils::request_id(),
                            peer = %peer_addr,
                        );
                        let res = main_router(req, Some(peer_addr), &gateway, &ctx).instrument(span).await;

                        let status = res.status().as_u16() as i64;
                        let response_time = start.elapsed().as_micros();

                        tracing::debug!(
                            target: "gateway_calls",
                            method = &path,
                            status = status,
                            response_time = response_time,
                            "{path} {status} - {response_time} micros"
                        );

                        Ok::<_, Infallible>(res)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!("Error serving connection: {:#}", err);
                }
            });
        }
    }

    Ok(())
}
