//! Blocking OpenAI chat-completions adapter.

use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LlmError, Summarizer};

pub struct OpenAiClient {
    client: HttpClient,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        model: &str,
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model: model.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl Summarizer for OpenAiClient {
    fn complete(&self, instruction: &str, text: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{instruction}\n\n{text}"),
            }],
        };

        debug!(model = %self.model, chars = text.chars().count(), "chat completion request");
        let response = self.client.post(url).bearer_auth(&self.api_key).json(&request).send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: ErrorResponse = response.json().unwrap_or(ErrorResponse {
                error: ErrorBody { message: "unknown error".to_string() },
            });
            return Err(LlmError::Api { status, message: body.error.message });
        }

        let body: ChatResponse = response.json()?;
        let choice = body.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_the_expected_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "summarize the code\n\nfn main() {}".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .starts_with("summarize the code"));
    }

    #[test]
    fn chat_response_deserializes_choice_content() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "A tiny program."}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "A tiny program.");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = OpenAiClient::new(
            "gpt-4o-mini",
            "key",
            "https://api.openai.com/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }
}
