use crate::{
    config::LogSink,
    engine::{Middleware, Next},
};
use async_trait::async_trait;
use headless_rpc::{request::RpcMethodCall, response::ResponseResult};
use tracing::{info, trace};

/// Logs every request when `debug` is enabled.
#[derive(Debug)]
pub struct Logger {
    debug: bool,
    sink: Option<LogSink>,
}

impl Logger {
    pub fn new(debug: bool, sink: Option<LogSink>) -> Self {
        Self { debug, sink }
    }
}

#[async_trait]
impl Middleware for Logger {
    async fn handle(&self, call: &RpcMethodCall, next: Next<'_>) -> ResponseResult {
        if self.debug {
            info!(target: "wallet::rpc", method = %call.method, "request");
            if let Some(sink) = &self.sink {
                sink.log(&format!("Request: {}", call.method));
            }
        }
        trace!(target: "wallet::rpc", params = ?call.params, "params");
        let res = next.run(call).await;
        if let ResponseResult::Error(err) = &res {
            trace!(target: "wallet::rpc", method = %call.method, code = err.code.code(), "failed: {}", err.message);
        }
        res
    }
}
