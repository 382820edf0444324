//! Scripted `GenerativeModel` double for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerativeModel,
    LlmError, Part,
};

/// Replays queued replies in order and records every request it receives.
/// With a gate installed, each call waits for a `notify_one()` on the shared
/// `Notify` before replying.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, LlmError>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Queues a reply whose single text part is `text`.
    pub fn reply_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(text_response(text)))
    }

    pub fn reply_empty(self) -> Self {
        self.push(Ok(GenerateContentResponse::default()))
    }

    pub fn reply_error(self, status: u16, message: &str) -> Self {
        self.push(Err(LlmError::Api {
            status,
            message: message.to_string(),
        }))
    }

    fn push(self, reply: Result<GenerateContentResponse, LlmError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedModel ran out of replies"))
    }
}

pub fn text_response(text: impl Into<String>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content {
                role: Some("model".to_string()),
                parts: vec![Part::text(text)],
            }),
            finish_reason: Some("STOP".to_string()),
        }],
        usage_metadata: None,
        prompt_feedback: None,
    }
}
