//! Mock ranking oracle for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::ports::{OracleError, RankingOracle, RankingRequest};

/// Canned oracle behaviour.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply with this text.
    Text(String),
    /// Fail as if the oracle were unreachable.
    Unavailable(String),
    /// Sleep before replying with the text.
    Delayed(Duration, String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Oracle that replays scripted replies and records what it was asked.
///
/// Queued replies are consumed first; once the queue is empty every call
/// gets the default reply.
pub struct MockOracle {
    default_reply: MockReply,
    queued: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RankingRequest>>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::text(text))
    }

    pub fn failing() -> Self {
        Self::new(MockReply::failure("mock oracle offline"))
    }

    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(reply);
        }
    }

    /// Number of `rank` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RankingRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    fn next_reply(&self) -> MockReply {
        self.queued
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

#[async_trait]
impl RankingOracle for MockOracle {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn rank(&self, request: &RankingRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.next_reply() {
            MockReply::Text(text) => Ok(text),
            MockReply::Unavailable(message) => Err(OracleError::Unavailable(message)),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RankingRequest {
        RankingRequest {
            prompt: "rank".to_string(),
            payload: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_queued_replies_then_default() {
        let oracle = MockOracle::replying("default");
        oracle.push_reply(MockReply::failure("down"));

        assert!(oracle.rank(&request()).await.is_err());
        assert_eq!(oracle.rank(&request()).await.unwrap(), "default");
        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.last_request().unwrap().prompt, "rank");
    }
}
