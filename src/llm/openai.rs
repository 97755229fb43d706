use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{FinishReason, LLMClient, LLMError, LLMInput, LLMOutput, Usage};
use crate::session::{MessageContent, MessageRole};
use crate::tool::ToolDefinition;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: UsageInfo,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    #[serde(default)]
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Default, Deserialize)]
struct UsageInfo {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat completions client for OpenAI and compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LLMError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| LLMError::AuthError("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut client_builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            client_builder = client_builder.timeout(timeout);
        }

        Ok(Self {
            client: client_builder.build()?,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn build_request(input: &LLMInput) -> ChatRequest {
        let tools: Vec<Value> = input.tools.iter().map(Self::function_tool).collect();

        ChatRequest {
            model: input.model.clone(),
            messages: Self::build_messages(input),
            tools: if tools.is_empty() { None } else { Some(tools) },
            max_tokens: Some(input.max_tokens),
            temperature: input.temperature,
        }
    }

    fn function_tool(definition: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": definition.name,
                "description": definition.description,
                "parameters": definition.input_schema,
            }
        })
    }

    /// Converts the session history into chat messages.
    fn build_messages(input: &LLMInput) -> Vec<Value> {
        let mut messages = Vec::new();

        if !input.system_prompt.is_empty() {
            messages.push(json!({
                "role": "system",
                "content": input.system_prompt
            }));
        }

        for msg in &input.messages {
            match msg.role {
                MessageRole::User => {
                    messages.push(json!({
                        "role": "user",
                        "content": msg.text()
                    }));
                }
                MessageRole::Assistant => {
                    let tool_calls: Vec<Value> = msg
                        .content
                        .iter()
                        .filter_map(|content| match content {
                            MessageContent::ToolCall { id, name, arguments } => Some(json!({
                                "id": id,
                                "type": "function",
                                "function": {
                                    "name": name,
                                    "arguments": arguments.to_string()
                                }
                            })),
                            _ => None,
                        })
                        .collect();

                    let text = msg.text();
                    if tool_calls.is_empty() {
                        messages.push(json!({
                            "role": "assistant",
                            "content": text
                        }));
                    } else {
                        messages.push(json!({
                            "role": "assistant",
                            "content": if text.is_empty() { Value::Null } else { Value::String(text) },
                            "tool_calls": tool_calls
                        }));
                    }
                }
                MessageRole::Tool => {
                    for content in &msg.content {
                        if let MessageContent::ToolResult {
                            tool_call_id,
                            result,
                            ..
                        } = content
                        {
                            messages.push(json!({
                                "role": "tool",
                                "tool_call_id": tool_call_id,
                                "content": result
                            }));
                        }
                    }
                }
            }
        }

        messages
    }

    fn parse_arguments(name: &str, raw: &str) -> Value {
        if raw.trim().is_empty() {
            return json!({});
        }
        serde_json::from_str(raw).unwrap_or_else(|error| {
            warn!(tool = %name, %error, "Model sent malformed tool arguments");
            json!({})
        })
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, input: LLMInput) -> Result<LLMOutput, LLMError> {
        let body = Self::build_request(&input);
        debug!(model = %input.model, tools = input.tools.len(), "Sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LLMError::AuthError(response_text));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(LLMError::RateLimitError(response_text)),
            status if !status.is_success() => {
                return Err(LLMError::ApiError(format!("{}: {}", status, response_text)));
            }
            _ => {}
        }

        debug!("LLM response: {}", response_text);

        let response: ChatCompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| LLMError::InvalidResponse(format!("{}: {}", e, response_text)))?;

        let usage = Usage {
            input_tokens: response.usage.prompt_tokens,
            output_tokens: response.usage.completion_tokens,
        };
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|text| !text.is_empty()) {
            content.push(MessageContent::Text { text });
        }
        for tool_call in choice.message.tool_calls.unwrap_or_default() {
            let arguments = Self::parse_arguments(&tool_call.function.name, &tool_call.function.arguments);
            content.push(MessageContent::ToolCall {
                id: tool_call.id,
                name: tool_call.function.name,
                arguments,
            });
        }

        Ok(LLMOutput {
            content,
            finish_reason: FinishReason::from_provider(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn input(messages: Vec<Message>) -> LLMInput {
        LLMInput {
            model: "gpt-4o-mini".to_string(),
            messages,
            system_prompt: "Ты киноэксперт".to_string(),
            tools: vec![ToolDefinition {
                name: "get_movie_by_id".to_string(),
                description: "Lookup by IMDb id".to_string(),
                input_schema: json!({"type": "object", "properties": {"imdb_id": {"type": "string"}}}),
            }],
            max_tokens: 300,
            temperature: Some(0.7),
        }
    }

    fn client(server: &MockServer) -> OpenAIClient {
        OpenAIClient::new("sk-test".to_string(), Some(server.uri()), Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_history_is_converted_to_chat_messages() {
        let messages = vec![
            Message::new_user("Что за фильм tt0113277?"),
            Message::new_assistant(vec![MessageContent::ToolCall {
                id: "call_1".into(),
                name: "get_movie_by_id".into(),
                arguments: json!({"imdb_id": "tt0113277"}),
            }]),
            Message::new_tool_result(vec![MessageContent::ToolResult {
                tool_call_id: "call_1".into(),
                result: "Название: Heat".into(),
                is_error: None,
            }]),
        ];

        let built = OpenAIClient::build_messages(&input(messages));

        assert_eq!(built.len(), 4);
        assert_eq!(built[0]["role"], "system");
        assert_eq!(built[1]["content"], "Что за фильм tt0113277?");
        assert_eq!(built[2]["content"], Value::Null);
        assert_eq!(built[2]["tool_calls"][0]["function"]["arguments"], "{\"imdb_id\":\"tt0113277\"}");
        assert_eq!(built[3], json!({"role": "tool", "tool_call_id": "call_1", "content": "Название: Heat"}));
    }

    #[tokio::test]
    async fn test_complete_sends_tools_and_parses_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "tools": [{"type": "function", "function": {"name": "get_movie_by_id"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_9",
                            "type": "function",
                            "function": {"name": "get_movie_by_id", "arguments": "{\"imdb_id\":\"tt0113277\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = client(&server)
            .complete(input(vec![Message::new_user("Heat?")]))
            .await
            .unwrap();

        assert_eq!(output.finish_reason, FinishReason::ToolCalls);
        assert_eq!(output.usage, Usage { input_tokens: 12, output_tokens: 3 });
        assert_eq!(
            output.content,
            vec![MessageContent::ToolCall {
                id: "call_9".into(),
                name: "get_movie_by_id".into(),
                arguments: json!({"imdb_id": "tt0113277"}),
            }]
        );
    }

    #[tokio::test]
    async fn test_status_codes_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = client(&server);
        let first = client.complete(input(Vec::new())).await;
        let second = client.complete(input(Vec::new())).await;

        assert!(matches!(first, Err(LLMError::RateLimitError(body)) if body == "slow down"));
        assert!(matches!(second, Err(LLMError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let result = client(&server).complete(input(Vec::new())).await;
        assert!(matches!(result, Err(LLMError::InvalidResponse(_))));
    }

    #[test]
    fn test_malformed_arguments_become_empty_object() {
        assert_eq!(OpenAIClient::parse_arguments("x", "{not json"), json!({}));
        assert_eq!(OpenAIClient::parse_arguments("x", ""), json!({}));
    }
}
