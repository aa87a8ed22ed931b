//! OpenAI client implementation.
//!
//! Talks to the chat-completions endpoint with bearer authentication.
//! Structured output uses `response_format: json_schema`.

use async_trait::async_trait;
use dbqa_core::ChatModel;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::{LlmError, Result};

/// Default base URL for the OpenAI API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: ProviderConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn complete(&self, prompt: &str, response_format: Option<ResponseFormat>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format,
        };

        let response = self
            .client
            .post(self.request_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status.as_u16() == 401 || status.as_u16() == 403 {
                LlmError::AuthenticationError(error_text)
            } else if status.as_u16() == 429 {
                LlmError::RateLimitExceeded(error_text)
            } else {
                LlmError::ProviderError(format!("OpenAI API error {}: {}", status, error_text))
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn generate(&self, prompt: &str) -> dbqa_core::Result<String> {
        Ok(self.complete(prompt, None).await?)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> dbqa_core::Result<serde_json::Value> {
        let response_format = ResponseFormat {
            kind: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: "structured_output".to_string(),
                schema: schema.clone(),
            },
        };

        let text = self.complete(prompt, Some(response_format)).await?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|err| {
            LlmError::InvalidResponse(format!("structured output is not valid JSON: {}", err))
        })?;

        Ok(value)
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_format() {
        let config = ProviderConfig::new("test-key", OPENAI_BASE_URL, "gpt-4o-mini");
        let client = OpenAiClient::new(config).unwrap();
        assert_eq!(
            client.request_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_structured_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            response_format: Some(ResponseFormat {
                kind: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "structured_output".to_string(),
                    schema: dbqa_core::QueryOutput::schema(),
                },
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(
            json["response_format"]["json_schema"]["schema"]["required"][0],
            "query"
        );
    }

    #[test]
    fn test_plain_request_omits_response_format() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![],
            response_format: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
    }
}
