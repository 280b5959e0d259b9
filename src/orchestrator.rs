use crate::artifact::ArtifactStore;
use crate::config::Config;
use crate::conversation::Conversation;
use crate::core::error::ChatError;
use crate::providers::{ChatProvider, ChatReply, ImageProvider, Message};
use crate::tools::{GENERATE_IMAGE_TOOL, ImageToolArgs, ToolCall, ToolDefinition, image_tool};
use std::sync::Arc;
use std::time::Duration;

pub const GENERATION_FAILED: &str = "An error occurred while generating the response.";
pub const PROCESSING_FAILED: &str = "An error occurred while processing the response.";
pub const RETRIES_EXHAUSTED: &str = "Failed to generate response after retries.";
pub const EMPTY_REPLY: &str = "The assistant returned an empty response.";

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay(),
        }
    }
}

/// Runs one conversation turn: chat call, optional image round-trip,
/// history bookkeeping.
pub struct Orchestrator {
    chat: Arc<dyn ChatProvider>,
    images: Arc<dyn ImageProvider>,
    artifacts: ArtifactStore,
    tools: Vec<ToolDefinition>,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        images: Arc<dyn ImageProvider>,
        artifacts: ArtifactStore,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            chat,
            images,
            artifacts,
            tools: vec![image_tool()],
            retry,
        }
    }

    /// Answers `prompt`, recording both sides of the exchange in
    /// `conversation`. Failures come back as display strings.
    pub async fn respond(&self, conversation: &mut Conversation, prompt: &str) -> String {
        conversation.push(Message::user(prompt));
        let reply = self.respond_with_retries(conversation).await;
        conversation.truncate();
        log::debug!("conversation holds {} messages", conversation.len());
        reply
    }

    async fn respond_with_retries(&self, conversation: &mut Conversation) -> String {
        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(conversation).await {
                Ok(reply) => return reply,
                Err(e) if e.is_retryable() => {
                    log::error!("attempt {} of {} failed: {}", attempt, self.retry.max_attempts, e);
                    if attempt < self.retry.max_attempts {
                        log::info!("Retrying due to content policy violation...");
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
                Err(ChatError::ToolArguments { raw, reason }) => {
                    log::error!("JSON decoding error: {}", reason);
                    log::error!("Faulty JSON string: {}", raw);
                    return PROCESSING_FAILED.to_string();
                }
                Err(e) => {
                    log::error!("An error occurred while generating the response: {}", e);
                    return GENERATION_FAILED.to_string();
                }
            }
        }
        RETRIES_EXHAUSTED.to_string()
    }

    async fn attempt(&self, conversation: &mut Conversation) -> Result<String, ChatError> {
        let reply = self
            .chat
            .complete(conversation.messages(), &self.tools)
            .await?;

        let text = match select_image_call(&reply).cloned() {
            Some(call) => self.run_image_tool(&call).await?,
            None => reply
                .content
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string()),
        };

        conversation.push(Message::assistant(text.clone()));
        Ok(text)
    }

    async fn run_image_tool(&self, call: &ToolCall) -> Result<String, ChatError> {
        let args = ImageToolArgs::decode(&call.function.arguments)?;
        log::info!("generating image for prompt: {}", args.prompt);

        let url = self.images.generate_image(&args.prompt).await?;
        let artifact = self.artifacts.persist(&url).await?;
        log::info!("image for '{}' saved to {}", args.prompt, artifact.path.display());

        Ok(format!("Image URL: {}", artifact.url))
    }
}

/// The first `generate_dalle_image` call in the reply; any others are
/// logged and dropped.
fn select_image_call(reply: &ChatReply) -> Option<&ToolCall> {
    let mut matching = reply
        .tool_calls
        .iter()
        .filter(|call| call.function.name == GENERATE_IMAGE_TOOL);
    let selected = matching.next();

    for call in &reply.tool_calls {
        if call.function.name != GENERATE_IMAGE_TOOL {
            log::warn!("ignoring call to unknown tool '{}'", call.function.name);
        }
    }
    let extra = matching.count();
    if extra > 0 {
        log::warn!("ignoring {} additional {} call(s)", extra, GENERATE_IMAGE_TOOL);
    }

    selected
}
