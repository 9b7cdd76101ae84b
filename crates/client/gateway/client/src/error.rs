use hyper::StatusCode;
use lp_api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum NodeClientError {
    /// Structured error returned by the remote node.
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid access token, expected `username:password`")]
    InvalidToken,
    #[error("invalid URL: {0}")]
    InvalidUrl(url::Url),
    #[error("HTTP error: {0:#}")]
    Http(#[from] hyper::http::Error),
    #[error("error calling node: {0:#}")]
    Call(Box<dyn std::error::Error + Send + Sync>),
    #[error("error reading response body: {0:#}")]
    Body(#[from] hyper::Error),
    #[error("error decoding response: {0:#}")]
    Decode(#[from] serde_json::Error),
    #[error("error decompressing response: {0}")]
    Decompress(std::io::Error),
    #[error("failed to parse returned error with http status {http_status}: {serde_error:#}")]
    InvalidErrorPayload { http_status: StatusCode, serde_error: serde_json::Error },
}
