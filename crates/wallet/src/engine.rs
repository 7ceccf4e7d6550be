//! The request pipeline: an ordered chain of [`Middleware`].

use async_trait::async_trait;
use headless_rpc::{error::RpcError, request::RpcMethodCall, response::ResponseResult};
use std::{fmt, sync::Arc};

/// A handler in the request pipeline.
///
/// A middleware either resolves the call itself, or delegates to the rest of the chain through
/// [`Next::run`] and may inspect or replace what comes back.
#[async_trait]
pub trait Middleware: Send + Sync + fmt::Debug {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult;
}

/// The remainder of the chain after the current middleware.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
}

impl Next<'_> {
    /// Passes `call` to the next middleware.
    pub async fn run(self, call: &RpcMethodCall) -> ResponseResult {
        match self.chain.split_first() {
            Some((middleware, rest)) => middleware.handle(call, Next { chain: rest }).await,
            // the chain ends with a terminal handler, running past it is a wiring bug
            None => ResponseResult::Error(RpcError::internal_error_with(format!(
                "no middleware resolved {}",
                call.method
            ))),
        }
    }

    /// Number of middleware left.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chain.iter()).finish()
    }
}

/// Runs calls through a fixed chain of middleware.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `middleware` to the end of the chain.
    #[must_use]
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.push(middleware);
        self
    }

    pub fn push<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.push(Arc::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Runs `call` through the whole chain.
    pub async fn handle(&self, call: &RpcMethodCall) -> ResponseResult {
        Next { chain: &self.middleware }.run(call).await
    }
}
