use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use consilium_core::errors::GenerationError;
use consilium_core::models::ModelTier;
use consilium_core::traits::{Completion, CompletionConstraints, TextGenerator};

/// One scripted response for a generation call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text successfully.
    Text(String),
    /// Fail with a timeout.
    Timeout,
    /// Fail with rate limiting.
    RateLimited,
    /// Fail with a provider error.
    Provider(String),
}

/// Record of one call the generator received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub tier: ModelTier,
    pub prompt: String,
    pub strict: bool,
}

/// A `TextGenerator` that plays back a fixed script of replies in order.
///
/// An exhausted script fails with a provider error, so a test that
/// under-provisions replies fails loudly instead of hanging.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    /// Artificial latency before each reply, for timeout tests.
    delay_ms: u64,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            delay_ms: 0,
        }
    }

    /// Script a single successful JSON/text reply.
    pub fn single(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::Text(text.into())])
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Append a reply to the script.
    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(
        &self,
        tier: ModelTier,
        prompt: &str,
        constraints: &CompletionConstraints,
    ) -> Result<Completion, GenerationError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        self.calls.lock().unwrap().push(RecordedCall {
            tier,
            prompt: prompt.to_string(),
            strict: constraints.strict,
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(Completion {
                tokens_in: (prompt.len() / 4) as u64,
                tokens_out: (text.len() / 4) as u64,
                text,
            }),
            Some(ScriptedReply::Timeout) => Err(GenerationError::Timeout {
                waited_ms: self.delay_ms,
            }),
            Some(ScriptedReply::RateLimited) => Err(GenerationError::RateLimited),
            Some(ScriptedReply::Provider(reason)) => Err(GenerationError::Provider { reason }),
            None => Err(GenerationError::Provider {
                reason: "scripted generator exhausted".to_string(),
            }),
        }
    }
}
