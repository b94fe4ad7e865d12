//! Mock transport for development and testing
//!
//! Records every request it is asked to send and answers from a queue of
//! scripted replies, falling back to a fixed reply once the queue is empty.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{HttpResponse, HttpTransport};
use crate::InfrastructureError;

/// A request captured by `MockTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

/// Scripted, recording `HttpTransport`
#[derive(Debug)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Answer every request with `status` and `body`
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self::with_fallback(Reply::Respond(HttpResponse::new(status, body)))
    }

    /// Fail every request as if the connection dropped
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_fallback(Reply::Fail(message.into()))
    }

    /// Never answer; the request only completes when it is cancelled
    pub fn hanging() -> Self {
        Self::with_fallback(Reply::Hang)
    }

    fn with_fallback(fallback: Reply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for the next unanswered request
    pub fn then_respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Reply::Respond(HttpResponse::new(status, body)));
        self
    }

    /// Queue a connection failure for the next unanswered request
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Reply::Fail(message.into()));
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: String,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, InfrastructureError> {
        info!(url = %url, "[MOCK HTTP] POST");

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers.clone(),
                body,
            });
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| self.fallback.clone());

        if cancel.is_cancelled() {
            return Err(InfrastructureError::Cancelled);
        }

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(InfrastructureError::Transport(message)),
            Reply::Hang => {
                cancel.cancelled().await;
                Err(InfrastructureError::Cancelled)
            }
        }
    }
}
