//! Transport executor: three strategies for performing a described call.
//!
//! # Design
//! `ApiClient` wraps the one long-lived `ureq::Agent` and exposes the same
//! call three ways: `execute` delivers the outcome to a completion callback,
//! `execute_stream` emits events to a subscriber behind a cancellable
//! `Subscription`, and `execute_async` suspends the calling task until the
//! outcome is ready. All three run the identical perform-and-classify path
//! on a worker thread, so a given response classifies the same regardless of
//! strategy, and all three decode through the descriptor's own decode rule.
//!
//! The agent is built with `http_status_as_error(false)` so non-2xx statuses
//! arrive as data and status classification stays in one place. No timeouts
//! are configured anywhere; calls rely on the transport's defaults.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::http::{HttpMethod, RequestDescriptor};

/// Events delivered by the stream strategy.
///
/// A call emits at most one `Value`, then `Completed`; a failed call emits a
/// single `Failed` and nothing else.
#[derive(Debug)]
pub enum StreamEvent<M> {
    /// The decoded model.
    Value(M),
    /// Terminal success signal, delivered after `Value`.
    Completed,
    /// Terminal failure signal, delivered instead of any value.
    Failed(ApiError),
}

/// Handle for an in-flight stream-strategy call.
///
/// Cancelling suppresses all further event delivery. Best-effort only: a
/// request already on the wire is not torn down, its result is discarded.
/// Dropping the handle cancels it, so the subscriber stays alive only as
/// long as someone holds the `Subscription`.
#[derive(Debug)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Executor for `RequestDescriptor` values.
///
/// Holds the shared transport agent. Construct once at startup and clone
/// where needed; clones share the same connection pool.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Callback strategy: perform the call and invoke `completion` exactly
    /// once with the outcome.
    ///
    /// The callback runs on the worker thread the transport completes on;
    /// callers that need a particular context redispatch themselves.
    pub fn execute<M, F>(&self, descriptor: RequestDescriptor<M>, completion: F)
    where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<M, ApiError>) + Send + 'static,
    {
        let agent = self.agent.clone();
        thread::spawn(move || completion(perform(&agent, &descriptor)));
    }

    /// Stream strategy: perform the call and deliver `StreamEvent`s to
    /// `on_event`: `Value` then `Completed` on success, `Failed` otherwise.
    ///
    /// The returned `Subscription` suppresses delivery once cancelled (or
    /// dropped). Events arrive on the worker thread.
    pub fn execute_stream<M, F>(&self, descriptor: RequestDescriptor<M>, mut on_event: F) -> Subscription
    where
        M: DeserializeOwned + Send + 'static,
        F: FnMut(StreamEvent<M>) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let agent = self.agent.clone();
        thread::spawn(move || {
            if flag.load(Ordering::SeqCst) {
                return;
            }
            let outcome = perform(&agent, &descriptor);
            if flag.load(Ordering::SeqCst) {
                return;
            }
            match outcome {
                Ok(model) => {
                    on_event(StreamEvent::Value(model));
                    on_event(StreamEvent::Completed);
                }
                Err(error) => on_event(StreamEvent::Failed(error)),
            }
        });
        Subscription { cancelled }
    }

    /// Suspend/resume strategy: perform the call while the calling task is
    /// suspended, and resume it with the outcome.
    ///
    /// The blocking I/O happens on a worker thread; only the logical task
    /// waits. Usable from any async runtime.
    pub async fn execute_async<M>(&self, descriptor: RequestDescriptor<M>) -> Result<M, ApiError>
    where
        M: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let agent = self.agent.clone();
        thread::spawn(move || {
            let _ = tx.send(perform(&agent, &descriptor));
        });
        rx.await.unwrap_or_else(|_| {
            Err(ApiError::Transport("worker exited before completing".to_string()))
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The single perform-and-classify path shared by all three strategies.
///
/// Issue the request, classify anything that prevents a usable response,
/// reject non-2xx statuses without reading the body, and decode a success
/// body through the descriptor.
fn perform<M: DeserializeOwned>(
    agent: &ureq::Agent,
    descriptor: &RequestDescriptor<M>,
) -> Result<M, ApiError> {
    let result = match (descriptor.method(), descriptor.body()) {
        (HttpMethod::Get, _) => {
            let mut request = agent.get(descriptor.url());
            for (name, value) in descriptor.headers() {
                request = request.header(name.as_str(), value.as_str());
            }
            request.call()
        }
        (HttpMethod::Delete, _) => {
            let mut request = agent.delete(descriptor.url());
            for (name, value) in descriptor.headers() {
                request = request.header(name.as_str(), value.as_str());
            }
            request.call()
        }
        (HttpMethod::Post, body) => {
            let mut request = agent.post(descriptor.url());
            for (name, value) in descriptor.headers() {
                request = request.header(name.as_str(), value.as_str());
            }
            match body {
                Some(bytes) => request.send(bytes),
                None => request.send_empty(),
            }
        }
        (HttpMethod::Put, body) => {
            let mut request = agent.put(descriptor.url());
            for (name, value) in descriptor.headers() {
                request = request.header(name.as_str(), value.as_str());
            }
            match body {
                Some(bytes) => request.send(bytes),
                None => request.send_empty(),
            }
        }
    };

    let mut response = result.map_err(classify)?;
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(ApiError::Server(status));
    }
    let bytes = response.body_mut().read_to_vec().map_err(classify)?;
    descriptor.decode(&bytes)
}

/// Map a transport-level error onto the closed taxonomy.
///
/// Total: protocol-level garbage (a reply that is not parseable HTTP) maps
/// to `NoResponse`, a status error surfacing from a foreign agent
/// configuration keeps its code, and everything else falls into `Transport`.
fn classify(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::StatusCode(code) => ApiError::Server(code),
        ureq::Error::Protocol(_) => ApiError::NoResponse,
        ureq::Error::Io(e) => ApiError::Transport(e.to_string()),
        other => ApiError::Transport(other.to_string()),
    }
}
