use super::{ChatProvider, ChatReply, ImageProvider, Message};
use crate::config::Config;
use crate::core::error::ChatError;
use crate::providers::base_client::BaseApiClient;
use crate::tools::{ToolCall, ToolDefinition};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone)]
pub struct OpenAIProvider {
    client: BaseApiClient,
    chat_model: String,
    image_model: String,
    image_size: String,
    image_quality: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, config: &Config) -> Self {
        Self {
            client: BaseApiClient::new(config.base_url.clone(), api_key),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            image_quality: config.image_quality.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAIProvider {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatReply, ChatError> {
        let payload = ChatCompletionRequest {
            model: &self.chat_model,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };
        log::debug!(
            "chat request: model={} messages={} tools={}",
            self.chat_model,
            messages.len(),
            tools.len()
        );

        let parsed: ChatCompletionResponse =
            self.client.post_json("chat/completions", &payload).await?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Api("No choices in API response".to_string()))?;

        Ok(ChatReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl ImageProvider for OpenAIProvider {
    async fn generate_image(&self, prompt: &str) -> Result<String, ChatError> {
        let payload = ImageGenerationRequest {
            model: &self.image_model,
            prompt,
            size: &self.image_size,
            quality: &self.image_quality,
            n: 1,
        };
        log::debug!(
            "image request: model={} size={} quality={}",
            self.image_model,
            self.image_size,
            self.image_quality
        );

        let parsed: ImageGenerationResponse =
            self.client.post_json("images/generations", &payload).await?;

        parsed
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| ChatError::Api("Image response contained no URL".to_string()))
    }
}
