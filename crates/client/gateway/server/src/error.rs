use crate::chain::{ChainError, SignError};
use crate::helpers::create_json_response;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use lc_gateway_client::NodeClientError;
use lp_api::ApiError;

/// Failure of one gateway call. Converted into a structured error response
/// at the boundary; the connection always carries a well-formed envelope.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A block-soon or tailing wait was interrupted by shutdown or a
    /// dropped caller.
    #[error("waiting was interrupted")]
    WaitCanceled,
    /// Leader delegation failed before the leader produced a response.
    #[error("delegating to leader: {0}")]
    Delegation(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            Self::Api(err) => err.clone(),
            Self::WaitCanceled => ApiError::canceled(),
            Self::Delegation(msg) => ApiError::unavailable(format!("delegating to leader: {msg}")),
            Self::Internal(msg) => {
                tracing::error!(target: "gateway_errors", "Internal server error: {msg}");
                ApiError::internal("")
            }
        }
    }
}

impl From<GatewayError> for Response<Full<Bytes>> {
    fn from(err: GatewayError) -> Response<Full<Bytes>> {
        let api = err.to_api_error();
        create_json_response(api.http_status(), &api)
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<ChainError> for GatewayError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidTx(msg) => Self::Api(ApiError::bad_request(msg)),
            ChainError::Internal(err) => Self::Internal(format!("{err:#}")),
        }
    }
}

impl From<SignError> for GatewayError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Refused(msg) => Self::Api(ApiError::bad_request(msg)),
            SignError::Internal(err) => Self::Internal(format!("{err:#}")),
        }
    }
}

impl From<NodeClientError> for GatewayError {
    fn from(err: NodeClientError) -> Self {
        match err {
            // The leader answered with a structured error: hand it to the
            // original caller unchanged.
            NodeClientError::Api(api) => Self::Api(api),
            other => Self::Delegation(other.to_string()),
        }
    }
}
