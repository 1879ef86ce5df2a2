use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot},
    time::{Instant, sleep_until},
};

use crate::{
    CatalogError, Result, management::UsageTelemetry, spotify::auth::TokenProvider, utils,
};

/// A provider GET call waiting in the queue.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

struct QueuedRequest {
    request: ApiRequest,
    generation: u64,
    respond: oneshot::Sender<Result<Value>>,
}

/// Serializes every provider call through one worker task.
///
/// Requests are issued strictly in enqueue order with at most one in flight,
/// and never closer together than the configured minimum interval. A 429 is
/// recorded as a throttle event and surfaced to the caller; the scheduler
/// never retries on its own.
pub struct RequestScheduler {
    sender: mpsc::UnboundedSender<QueuedRequest>,
    generation: Arc<AtomicU64>,
}

impl RequestScheduler {
    /// Spawns the worker task. Must be called inside a tokio runtime.
    pub fn spawn(
        http: Client,
        tokens: Arc<TokenProvider>,
        telemetry: Arc<UsageTelemetry>,
        min_interval: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            http,
            tokens,
            telemetry,
            min_interval,
            generation: Arc::clone(&generation),
            last_request: None,
        };
        tokio::spawn(worker.run(receiver));

        Self { sender, generation }
    }

    /// Queues a request and returns the receiver for its outcome.
    ///
    /// The request is in the queue when this returns, so the FIFO position
    /// is fixed by call order even before the receiver is awaited.
    pub fn submit(&self, request: ApiRequest) -> oneshot::Receiver<Result<Value>> {
        let (respond, receiver) = oneshot::channel();
        let queued = QueuedRequest {
            request,
            generation: self.generation.load(Ordering::SeqCst),
            respond,
        };

        if let Err(mpsc::error::SendError(queued)) = self.sender.send(queued) {
            let _ = queued.respond.send(Err(CatalogError::SchedulerClosed));
        }
        receiver
    }

    pub async fn enqueue(&self, request: ApiRequest) -> Result<Value> {
        self.submit(request)
            .await
            .unwrap_or(Err(CatalogError::SchedulerClosed))
    }

    /// Discards every request queued before this call.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

struct Worker {
    http: Client,
    tokens: Arc<TokenProvider>,
    telemetry: Arc<UsageTelemetry>,
    min_interval: Duration,
    generation: Arc<AtomicU64>,
    last_request: Option<Instant>,
}

impl Worker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<QueuedRequest>) {
        while let Some(queued) = receiver.recv().await {
            let outcome = if queued.generation != self.generation.load(Ordering::SeqCst) {
                Err(CatalogError::Reinitialized)
            } else {
                self.execute(queued.request).await
            };

            // the caller may have stopped waiting
            let _ = queued.respond.send(outcome);
        }
    }

    async fn execute(&mut self, request: ApiRequest) -> Result<Value> {
        if let Some(last) = self.last_request {
            sleep_until(last + self.min_interval).await;
        }

        let token = self.tokens.get_token().await?;

        self.last_request = Some(Instant::now());
        let response = self
            .http
            .get(&request.url)
            .query(&request.query)
            .bearer_auth(&token.value)
            .send()
            .await
            .map_err(CatalogError::from_transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(utils::parse_retry_after);
            self.telemetry.record_throttle(retry_after).await;
            return Err(CatalogError::ThrottledByProvider {
                retry_after_seconds: retry_after,
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        if !status.is_success() {
            return Err(CatalogError::ProviderRequestFailed {
                status: status.as_u16(),
            });
        }

        // counted before decoding, an undecodable body was still a call
        self.telemetry.record_call().await;
        response
            .json::<Value>()
            .await
            .map_err(CatalogError::from_transport)
    }
}
