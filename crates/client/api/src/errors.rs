//! Conversions from internal failure values into the wire error payload.
//!
//! Every handler in this crate reports failures as [ApiError]; the gateway
//! serializes them into the response envelope unchanged. Caller errors keep
//! their message, internal errors are logged here and replaced by a generic
//! payload so internals do not leak to clients.

use crate::cursor::CursorError;
use crate::domain::DomainError;
use crate::filter::FilterError;
use crate::indexer::IndexerError;
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use std::future::Future;

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        ApiError::bad_request("decoding `after`").with_detail(err.to_string())
    }
}

impl From<IndexerError> for ApiError {
    fn from(err: IndexerError) -> Self {
        match err {
            IndexerError::BadQuery(msg) => ApiError::bad_request(msg),
            IndexerError::Internal(err) => {
                tracing::error!(target: "api_errors", "index error: {err:#}");
                ApiError::internal("")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Invalid(msg) => ApiError::bad_request(msg),
            DomainError::NotFound(msg) => ApiError::not_found(msg),
            DomainError::Internal(err) => {
                tracing::error!(target: "api_errors", "domain error: {err:#}");
                ApiError::internal("")
            }
        }
    }
}

/// Awaits a service call under the request's cancellation scope, mapping
/// cancellation to its distinct error kind.
pub(crate) async fn run_or_canceled<T, E>(
    ctx: &ServiceContext,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<T, ApiError>
where
    E: Into<ApiError>,
{
    match ctx.run_until_cancelled(fut).await {
        Some(res) => res.map_err(Into::into),
        None => Err(ApiError::canceled()),
    }
}
