//! Requests waiting for an explicit authorization, and authorizations waiting for a request.

use crate::error::{Result, WalletError};
use futures::future::join_all;
use headless_rpc::{error::RpcError, request::RequestParams};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// The method and params of a request held in the queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub params: RequestParams,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, params: RequestParams) -> Self {
        Self { method: method.into(), params }
    }
}

/// What the request should do once resolved.
#[derive(Debug)]
pub(crate) enum Decision {
    Authorize,
    Reject(RpcError),
}

/// A decision, plus the channel to report back on once the request was processed.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub decision: Decision,
    pub done: oneshot::Sender<()>,
}

/// Outcome of [`PendingRequests::admit`].
#[derive(Debug)]
pub(crate) enum Admission {
    /// A pending action was already recorded for the method.
    Resolved(Resolution),
    /// The request was queued, the receiver yields its resolution.
    Queued(oneshot::Receiver<Resolution>),
}

#[derive(Debug)]
struct PendingRequest {
    info: RequestInfo,
    resolver: oneshot::Sender<Resolution>,
}

impl PendingRequest {
    /// Whether the caller waiting on this request went away.
    fn is_dropped(&self) -> bool {
        self.resolver.is_closed()
    }
}

#[derive(Debug)]
struct PendingAction {
    method: String,
    resolution: Resolution,
}

#[derive(Debug, Default)]
struct QueueInner {
    requests: VecDeque<PendingRequest>,
    actions: VecDeque<PendingAction>,
}

impl QueueInner {
    /// Removes the oldest live request for `method`, discarding dropped ones on the way.
    fn consume_first(&mut self, method: &str) -> Option<PendingRequest> {
        self.requests.retain(|req| !req.is_dropped());
        let idx = self.requests.iter().position(|req| req.info.method == method)?;
        self.requests.remove(idx)
    }

    fn consume_action(&mut self, method: &str) -> Option<PendingAction> {
        let idx = self.actions.iter().position(|act| act.method == method)?;
        self.actions.remove(idx)
    }

    /// Hands `resolution` to the first live request for `method`, or records it as an action.
    fn dispatch(&mut self, method: &str, mut resolution: Resolution) {
        while let Some(req) = self.consume_first(method) {
            match req.resolver.send(resolution) {
                Ok(()) => {
                    trace!(target: "wallet::queue", method, "resolved pending request");
                    return
                }
                // receiver dropped between the liveness check and the send
                Err(unsent) => resolution = unsent,
            }
        }
        debug!(target: "wallet::queue", method, "no pending request, recording action");
        self.actions.push_back(PendingAction { method: method.to_string(), resolution });
    }

    /// Drains every live request in FIFO order.
    fn drain(&mut self) -> Vec<PendingRequest> {
        self.requests.drain(..).filter(|req| !req.is_dropped()).collect()
    }
}

/// The shared queue of pending requests and pending actions.
#[derive(Clone, Debug, Default)]
pub struct PendingRequests {
    inner: Arc<Mutex<QueueInner>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches `info` against a recorded action or queues it.
    ///
    /// Both happen under a single lock, so an `authorize` racing with the arrival of the request
    /// resolves it exactly once.
    pub(crate) fn admit(&self, info: RequestInfo) -> Admission {
        let mut inner = self.inner.lock();
        if let Some(action) = inner.consume_action(&info.method) {
            debug!(target: "wallet::queue", method = %info.method, "matched pending action");
            return Admission::Resolved(action.resolution);
        }
        let (resolver, rx) = oneshot::channel();
        debug!(target: "wallet::queue", method = %info.method, "queued request");
        inner.requests.push_back(PendingRequest { info, resolver });
        Admission::Queued(rx)
    }

    /// Number of queued requests, optionally only those for `method`.
    pub fn count(&self, method: Option<&str>) -> usize {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|req| !req.is_dropped())
            .filter(|req| method.is_none_or(|m| req.info.method == m))
            .count()
    }

    /// Number of recorded actions that no request has consumed yet.
    pub fn action_count(&self, method: Option<&str>) -> usize {
        self.inner.lock().actions.iter().filter(|act| method.is_none_or(|m| act.method == m)).count()
    }

    /// Snapshot of the queued requests in arrival order.
    pub fn requests(&self) -> Vec<RequestInfo> {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|req| !req.is_dropped())
            .map(|req| req.info.clone())
            .collect()
    }

    /// Authorizes the oldest request for `method`.
    ///
    /// The authorization is recorded immediately. If no request for `method` is queued it is kept
    /// as a pending action for the next one. The returned future completes once the authorized
    /// request has been processed.
    pub fn authorize(&self, method: &str) -> impl Future<Output = Result<()>> + Send + use<> {
        let done = self.resolve(method, Decision::Authorize);
        let method = method.to_string();
        async move { done.await.map_err(|_| WalletError::RequestDropped(method)) }
    }

    /// Rejects the oldest request for `method` with `reason`.
    ///
    /// Like [`Self::authorize`] the rejection is recorded immediately and may precede the
    /// request. The returned future completes once the request has been rejected.
    pub fn reject(&self, method: &str, reason: RpcError) -> impl Future<Output = ()> + Send + use<> {
        let done = self.resolve(method, Decision::Reject(reason));
        async move {
            let _ = done.await;
        }
    }

    /// Authorizes every queued request in FIFO order.
    pub fn authorize_all(&self) -> impl Future<Output = Result<()>> + Send + use<> {
        let pending = self.resolve_all(|| Decision::Authorize);
        async move {
            let methods = pending.iter().map(|(method, _)| method.clone()).collect::<Vec<_>>();
            let results = join_all(pending.into_iter().map(|(_, done)| done)).await;
            for (method, res) in methods.into_iter().zip(results) {
                res.map_err(|_| WalletError::RequestDropped(method))?;
            }
            Ok(())
        }
    }

    /// Rejects every queued request in FIFO order.
    pub fn reject_all(&self, reason: RpcError) -> impl Future<Output = ()> + Send + use<> {
        let pending = self.resolve_all(|| Decision::Reject(reason.clone()));
        async move {
            join_all(pending.into_iter().map(|(_, done)| done)).await;
        }
    }

    fn resolve(&self, method: &str, decision: Decision) -> oneshot::Receiver<()> {
        let (done, rx) = oneshot::channel();
        self.inner.lock().dispatch(method, Resolution { decision, done });
        rx
    }

    /// Drains the queue, handing each live request a decision. Returns the completion receivers.
    fn resolve_all(&self, decision: impl Fn() -> Decision) -> Vec<(String, oneshot::Receiver<()>)> {
        let drained = self.inner.lock().drain();
        debug!(target: "wallet::queue", count = drained.len(), "resolving all pending requests");
        drained
            .into_iter()
            .filter_map(|req| {
                let (done, rx) = oneshot::channel();
                req.resolver.send(Resolution { decision: decision(), done }).ok()?;
                Some((req.info.method, rx))
            })
            .collect()
    }
}
