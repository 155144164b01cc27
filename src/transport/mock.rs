/*!
 * Scripted transport for tests.
 *
 * - `MockTransport::ok(body)` - answers 200 with the body
 * - `MockTransport::status(code, body)` - answers with any status
 * - `MockTransport::failing(err)` - fails at the transport level
 * - `MockTransport::hanging(delay)` - answers only after `delay`
 */

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchRequest, FetchResponse, Transport};
use crate::errors::TransportError;

/// What the mock does with every request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Complete with this status and body
    Respond { status: u16, body: String },
    /// Fail with this transport error
    Fail(TransportError),
    /// Sleep, then answer 200 with an empty transcript
    Hang { delay: Duration },
}

/// Transport that replays a fixed reply and records what it was asked
#[derive(Debug)]
pub struct MockTransport {
    reply: MockReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockTransport {
    /// Create a mock with the given reply
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer 200 with `body`
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// Answer `status` with `body`
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::new(MockReply::Respond {
            status,
            body: body.into(),
        })
    }

    /// Fail every request with `error`
    pub fn failing(error: TransportError) -> Self {
        Self::new(MockReply::Fail(error))
    }

    /// Answer only after `delay`
    pub fn hanging(delay: Duration) -> Self {
        Self::new(MockReply::Hang { delay })
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copies of every request received, oldest first
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }

        match &self.reply {
            MockReply::Respond { status, body } => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Fail(error) => Err(error.clone()),
            MockReply::Hang { delay } => {
                tokio::time::sleep(*delay).await;
                Ok(FetchResponse {
                    status: 200,
                    body: "<transcript></transcript>".to_string(),
                })
            }
        }
    }
}
