//! Scripted [`Transport`] for engine tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hoppie_models::MessageType;

use crate::error::SdkError;
use crate::transport::{AcarsRequest, Transport};

/// Answers polls and other requests from two separate queues. An empty
/// queue answers `ok`. Every request is recorded.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<AcarsRequest>>,
    polls: Mutex<VecDeque<Result<String, SdkError>>>,
    replies: Mutex<VecDeque<Result<String, SdkError>>>,
    reply_delay: Mutex<Duration>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_poll(&self, body: &str) {
        self.polls.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub(crate) fn fail_poll(&self, err: SdkError) {
        self.polls.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn push_reply(&self, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub(crate) fn fail_reply(&self, err: SdkError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    /// Hold every non-poll request for `delay` before answering.
    pub(crate) fn delay_replies(&self, delay: Duration) {
        *self.reply_delay.lock().unwrap() = delay;
    }

    pub(crate) fn requests(&self) -> Vec<AcarsRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests other than polls.
    pub(crate) fn sent(&self) -> Vec<AcarsRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.message_type != MessageType::Poll)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: AcarsRequest) -> Result<String, SdkError> {
        let queue = if request.message_type == MessageType::Poll {
            &self.polls
        } else {
            &self.replies
        };
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.reply_delay.lock().unwrap();
        if request.message_type != MessageType::Poll && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}
