//! Scripted providers for exercising the orchestrator without a network.

use super::{ChatProvider, ChatReply, ImageProvider, Message};
use crate::core::error::ChatError;
use crate::tools::{FunctionCall, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued results and records every request it receives.
#[derive(Default)]
pub struct MockChatProvider {
    replies: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockChatProvider {
    pub fn new(replies: Vec<Result<ChatReply, ChatError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<ChatReply, ChatError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_reply("ok")))
    }
}

/// Answers with queued results first, then with `url` forever.
pub struct MockImageProvider {
    url: String,
    results: Mutex<VecDeque<Result<String, ChatError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockImageProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_results(url, Vec::new())
    }

    pub fn with_results(url: impl Into<String>, results: Vec<Result<String, ChatError>>) -> Self {
        Self {
            url: url.into(),
            results: Mutex::new(results.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate_image(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.url.clone()))
    }
}

pub fn text_reply(content: &str) -> ChatReply {
    ChatReply {
        content: Some(content.to_string()),
        tool_calls: Vec::new(),
    }
}

pub fn tool_reply(calls: &[(&str, &str)]) -> ChatReply {
    ChatReply {
        content: None,
        tool_calls: calls
            .iter()
            .enumerate()
            .map(|(i, (name, arguments))| ToolCall {
                id: format!("call_{}", i),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            })
            .collect(),
    }
}
