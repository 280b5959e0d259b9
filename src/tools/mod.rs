use crate::core::error::ChatError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

pub const GENERATE_IMAGE_TOOL: &str = "generate_dalle_image";

/// A function the chat model may ask us to call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl Serialize for ToolDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
        .serialize(serializer)
    }
}

pub fn image_tool() -> ToolDefinition {
    ToolDefinition {
        name: GENERATE_IMAGE_TOOL.to_string(),
        description: "Generates an image based on a user prompt using DALL-E.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "A text prompt to generate an image from."
                }
            },
            "required": ["prompt"]
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON text, exactly as the model produced it
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub function: FunctionCall,
}

/// Arguments of `generate_dalle_image`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageToolArgs {
    pub prompt: String,
}

impl ImageToolArgs {
    /// Syntax errors and a missing or non-string `prompt` are reported as
    /// different errors: only the former counts as a processing failure.
    pub fn decode(raw: &str) -> Result<Self, ChatError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ChatError::ToolArguments {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| ChatError::ToolArgumentSchema {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_tool_serializes_as_function_tool() {
        let value = serde_json::to_value(image_tool()).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], GENERATE_IMAGE_TOOL);
        assert_eq!(value["function"]["parameters"]["required"], json!(["prompt"]));
        assert_eq!(
            value["function"]["parameters"]["properties"]["prompt"]["type"],
            "string"
        );
    }

    #[test]
    fn decodes_prompt_argument() {
        let args = ImageToolArgs::decode(r#"{"prompt": "a lighthouse at dusk"}"#).unwrap();
        assert_eq!(args.prompt, "a lighthouse at dusk");
    }

    #[test]
    fn invalid_json_keeps_the_raw_text() {
        match ImageToolArgs::decode("{\"prompt\": \"unterminated") {
            Err(ChatError::ToolArguments { raw, .. }) => {
                assert_eq!(raw, "{\"prompt\": \"unterminated")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_or_mistyped_prompt_is_a_schema_failure() {
        assert!(matches!(
            ImageToolArgs::decode(r#"{"subject": "cat"}"#),
            Err(ChatError::ToolArgumentSchema { .. })
        ));
        assert!(matches!(
            ImageToolArgs::decode(r#"{"prompt": 42}"#),
            Err(ChatError::ToolArgumentSchema { .. })
        ));
    }
}
