use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{InterpretError, InterpretRequest, InterpretResult, Interpreter};

/// One scripted reply, optionally delayed to simulate a slow service.
#[derive(Debug, Clone)]
pub struct Reply {
    pub outcome: Result<InterpretResult, InterpretError>,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(result: &str) -> Self {
        Self {
            outcome: Ok(InterpretResult {
                result: result.to_string(),
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn err(error: InterpretError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A scripted interpreter for tests. Returns pre-defined replies in order
/// and records every request it receives.
pub struct MockInterpreter {
    replies: Vec<Reply>,
    index: AtomicUsize,
    requests: Mutex<Vec<InterpretRequest>>,
}

impl MockInterpreter {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<InterpretRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Interpreter for MockInterpreter {
    async fn interpret(&self, request: &InterpretRequest) -> Result<InterpretResult, InterpretError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.get(i).cloned().ok_or_else(|| {
            InterpretError::Transport(format!("MockInterpreter: no more replies (called {} times)", i + 1))
        })?;

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome
    }
}
