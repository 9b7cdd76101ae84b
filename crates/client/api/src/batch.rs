//! Fan-out/join execution of independent batch items.
//!
//! One task per item, joined before returning. Slot `i` of the output always
//! corresponds to item `i` of the input regardless of completion order, and
//! every slot is filled: an error return or a panic inside an item becomes
//! that slot's structured error without disturbing sibling items. Items may
//! interleave their side effects freely; a batch carries no cross-item
//! atomicity.

use lp_api::batch::BatchResult;
use lp_api::ApiError;
use lp_utils::service::ServiceContext;
use std::future::Future;
use tracing::Instrument;

/// Runs `op` once per request, concurrently, and assembles the ordered
/// response slice. Each item gets its own child cancellation scope and its
/// own sub-request id on the tracing span. An empty batch returns
/// immediately.
pub async fn run_batch<R, T, F, Fut>(ctx: &ServiceContext, requests: Vec<R>, op: F) -> Vec<BatchResult<T>>
where
    R: Send + 'static,
    T: Send + 'static,
    F: Fn(ServiceContext, R) -> Fut,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let mut handles = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        let span = tracing::info_span!(target: "batch", "batch_item", index, sub_request_id = %lp_utils::request_id());
        handles.push(tokio::spawn(op(ctx.child(), request).instrument(span)));
    }

    let mut responses = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        responses.push(match handle.await {
            Ok(res) => res.into(),
            Err(err) if err.is_panic() => {
                tracing::error!(target: "batch", index, "batch item panicked: {err}");
                BatchResult::err(ApiError::internal("unexpected error processing batch item"))
            }
            Err(_aborted) => BatchResult::err(ApiError::canceled()),
        });
    }
    responses
}
