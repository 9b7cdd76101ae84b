//! Request-scope cancellation context.
//!
//! Every inbound gateway call runs under a [ServiceContext]. Suspending
//! operations (index queries, the block-soon wait, tailing transaction
//! queries, leader-delegated forwarding) race against it so that shutdown or
//! a dropped caller unblocks them promptly instead of leaving the call
//! hanging.

use std::future::Future;

/// Cancellation context associated to a service or a single call.
///
/// # Scope
///
/// You can create a hierarchy of contexts by calling [ServiceContext::child].
/// Contexts are said to be in the same _local scope_ if they inherit the same
/// `token_local` cancellation token; cancelling a local scope does not affect
/// the rest of the app.
///
/// All contexts which descend from the same root are in the same _global
/// scope_: cancelling it (node shutdown) cancels every call in flight.
///
/// > A parent context can always cancel all of its children, but a child
/// > context cannot cancel its parent.
#[derive(Clone, Debug, Default)]
pub struct ServiceContext {
    token_global: tokio_util::sync::CancellationToken,
    token_local: Option<tokio_util::sync::CancellationToken>,
}

impl ServiceContext {
    pub fn new() -> Self {
        Self { token_global: tokio_util::sync::CancellationToken::new(), token_local: None }
    }

    /// Stops all calls under the same global context scope.
    pub fn cancel_global(&self) {
        tracing::info!("🔌 Gracefully shutting down in-flight calls");

        self.token_global.cancel();
    }

    /// Stops all calls under the same local context scope.
    ///
    /// A local context is created by calling [ServiceContext::child] and
    /// allows you to reduce the scope of cancellation only to those calls
    /// which use the new context.
    pub fn cancel_local(&self) {
        self.token_local.as_ref().unwrap_or(&self.token_global).cancel();
    }

    /// A future which completes once this context has been cancelled, either
    /// locally or through the global scope.
    pub async fn cancelled(&self) {
        if let Some(token_local) = &self.token_local {
            tokio::select! {
                _ = self.token_global.cancelled() => {},
                _ = token_local.cancelled() => {}
            }
        } else {
            self.token_global.cancelled().await
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token_global.is_cancelled() || self.token_local.as_ref().map(|t| t.is_cancelled()).unwrap_or(false)
    }

    /// Runs a future until this context is cancelled.
    ///
    /// The future must be cancel-safe: it is dropped mid-flight if the
    /// context is cancelled first.
    ///
    /// Returns the future's output wrapped in [Some], or [None] on
    /// cancellation.
    pub async fn run_until_cancelled<T, F>(&self, f: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            res = f => Some(res),
            _ = self.cancelled() => None
        }
    }

    /// Copies the context into a new local scope.
    ///
    /// Any call which uses this new context can be cancelled without
    /// affecting the rest of the global scope. Batch items each run under
    /// their own child context.
    pub fn child(&self) -> Self {
        let token_local = self.token_local.as_ref().unwrap_or(&self.token_global).child_token();

        Self { token_global: self.token_global.clone(), token_local: Some(token_local) }
    }
}
