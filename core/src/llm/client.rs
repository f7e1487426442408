//! HTTP reasoning backend
//!
//! Supports two wire dialects:
//! - OpenAI-compatible chat completions (OpenAI, Ollama, OpenRouter, custom)
//!   with a `json_schema` response format
//! - Google Generative AI (Gemini) `generateContent` with a response schema
//!
//! No retries are attempted; a failed request is reported as-is.

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client as HttpClient, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use super::{InvokeError, ReasoningService};
use crate::config::{EndpointConfig, Provider};
use crate::contract::Contract;
use crate::util::{sanitize_base_url, validate_api_key};

const SYSTEM_INSTRUCTION: &str = "You are a precise assistant for an assessment platform. \
Reply with a single JSON object that satisfies the provided JSON schema and nothing else.";

/// Wire dialect spoken by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAiCompatible,
    GoogleGenerativeAi,
}

impl From<Provider> for LlmProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Google => LlmProvider::GoogleGenerativeAi,
            Provider::Openai | Provider::Ollama | Provider::Openrouter | Provider::Custom => {
                LlmProvider::OpenAiCompatible
            }
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::OpenAiCompatible => write!(f, "OpenAI Compatible"),
            LlmProvider::GoogleGenerativeAi => write!(f, "Google Generative AI"),
        }
    }
}

/// Resolved connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmConfig {
    /// Resolve an endpoint section into usable settings, filling in the
    /// provider's default URL and checking the URL and key.
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Result<Self, InvokeError> {
        let base_url = endpoint
            .base_url
            .as_deref()
            .or_else(|| endpoint.provider.default_base_url())
            .ok_or_else(|| InvokeError::InvalidEndpoint {
                field: "base_url".to_string(),
                reason: format!("required for the {} provider", endpoint.provider),
            })?;

        let api_key = match endpoint.api_key.as_deref() {
            Some(key) => Some(validate_api_key(key)?),
            None => None,
        };

        if endpoint.model.trim().is_empty() {
            return Err(InvokeError::InvalidEndpoint {
                field: "model".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        Ok(Self {
            provider: endpoint.provider.into(),
            base_url: sanitize_base_url(base_url, "base_url")?,
            model: endpoint.model.clone(),
            api_key,
            timeout: endpoint.timeout_secs.map(Duration::from_secs),
            max_tokens: endpoint.max_tokens,
            temperature: endpoint.temperature,
        })
    }
}

/// Reasoning service reached over HTTP
pub struct LlmClient {
    config: LlmConfig,
    http_client: HttpClient,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, InvokeError> {
        let mut builder = HttpClient::builder().user_agent(concat!(
            "examiner/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn from_endpoint(endpoint: &EndpointConfig) -> Result<Self, InvokeError> {
        Self::new(LlmConfig::from_endpoint(endpoint)?)
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete_openai(&self, prompt: &str, output: &Contract) -> Result<Value, InvokeError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = openai_request_body(&self.config, prompt, output);

        let response = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(error_for_status(response).await);
        }

        let text = response.text().await?;
        let response_body: OpenAiResponse =
            serde_json::from_str(&text).map_err(|e| InvokeError::MalformedOutput {
                message: format!("unreadable OpenAI response: {}", e),
            })?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InvokeError::MalformedOutput {
                message: "response has no message content".to_string(),
            })?;

        parse_reply(&content)
    }

    async fn complete_gemini(&self, prompt: &str, output: &Contract) -> Result<Value, InvokeError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = gemini_request_body(&self.config, prompt, output);

        let mut request = self
            .http_client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.query(&[("key", api_key)]);
        }
        let response = request.send().await?;

        if response.status() != StatusCode::OK {
            return Err(error_for_status(response).await);
        }

        let text = response.text().await?;
        let response_body: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| InvokeError::MalformedOutput {
                message: format!("unreadable Gemini response: {}", e),
            })?;

        let content = response_body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| InvokeError::MalformedOutput {
                message: "response has no candidate text".to_string(),
            })?;

        parse_reply(&content)
    }

    fn build_headers(&self) -> Result<HeaderMap, InvokeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Gemini takes the key as a query parameter
        if self.config.provider == LlmProvider::OpenAiCompatible {
            if let Some(ref api_key) = self.config.api_key {
                let value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
                    InvokeError::InvalidEndpoint {
                        field: "API key".to_string(),
                        reason: "invalid Authorization header".to_string(),
                    }
                })?;
                headers.insert(AUTHORIZATION, value);
            }
            if self.config.base_url.contains("openrouter.ai") {
                headers.insert("X-Title", HeaderValue::from_static("examiner"));
            }
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ReasoningService for LlmClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, prompt: &str, output: &Contract) -> Result<Value, InvokeError> {
        match self.config.provider {
            LlmProvider::OpenAiCompatible => self.complete_openai(prompt, output).await,
            LlmProvider::GoogleGenerativeAi => self.complete_gemini(prompt, output).await,
        }
    }
}

fn openai_request_body(config: &LlmConfig, prompt: &str, output: &Contract) -> OpenAiRequest {
    OpenAiRequest {
        model: config.model.clone(),
        messages: vec![
            OpenAiMessage {
                role: "system".to_string(),
                content: SYSTEM_INSTRUCTION.to_string(),
            },
            OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ],
        max_completion_tokens: config.max_tokens,
        temperature: config.temperature,
        response_format: json!({
            "type": "json_schema",
            "json_schema": {
                "name": output.name(),
                "schema": output.json_schema(),
                "strict": false,
            }
        }),
    }
}

fn gemini_request_body(config: &LlmConfig, prompt: &str, output: &Contract) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        system_instruction: Some(GeminiContent {
            role: "system".to_string(),
            parts: vec![GeminiPart {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        }),
        generation_config: GeminiGenerationConfig {
            max_output_tokens: config.max_tokens,
            temperature: config.temperature,
            response_mime_type: "application/json".to_string(),
            response_schema: gemini_schema(output.json_schema()),
        },
    }
}

/// Gemini accepts an OpenAPI subset; drop the keywords it rejects.
///
/// Only schema nodes are touched; property names are never removed.
fn gemini_schema(mut schema: Value) -> Value {
    fn strip(node: &mut Value) {
        let Some(map) = node.as_object_mut() else {
            return;
        };
        map.remove("additionalProperties");
        map.remove("title");
        map.remove("default");

        if let Some(Value::Object(properties)) = map.get_mut("properties") {
            properties.values_mut().for_each(strip);
        }
        if let Some(items) = map.get_mut("items") {
            strip(items);
        }
    }
    strip(&mut schema);
    schema
}

fn parse_reply(content: &str) -> Result<Value, InvokeError> {
    serde_json::from_str(content.trim()).map_err(|e| InvokeError::MalformedOutput {
        message: format!("reply is not JSON: {}", e),
    })
}

async fn error_for_status(response: reqwest::Response) -> InvokeError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs);

    let error_body: Option<Value> = response.json().await.ok();
    let message = error_body
        .as_ref()
        .and_then(|v| v.get("error").and_then(|e| e.get("message")))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error")
        .to_string();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InvokeError::Unauthorized { message },
        StatusCode::TOO_MANY_REQUESTS => InvokeError::RateLimited { retry_after },
        status => InvokeError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

// OpenAI-compatible API types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: Value,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiReplyMessage,
}

#[derive(Deserialize)]
struct OpenAiReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

// Gemini API types
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Operation;

    fn endpoint(provider: Provider) -> EndpointConfig {
        EndpointConfig {
            provider,
            ..EndpointConfig::default()
        }
    }

    #[test]
    fn test_config_uses_provider_default_url() {
        let config = LlmConfig::from_endpoint(&endpoint(Provider::Ollama)).unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert!(config.timeout.is_none());

        let config = LlmConfig::from_endpoint(&endpoint(Provider::Google)).unwrap();
        assert_eq!(config.provider, LlmProvider::GoogleGenerativeAi);
    }

    #[test]
    fn test_custom_provider_needs_base_url() {
        let err = LlmConfig::from_endpoint(&endpoint(Provider::Custom)).unwrap_err();
        assert!(matches!(err, InvokeError::InvalidEndpoint { ref field, .. } if field == "base_url"));

        let mut custom = endpoint(Provider::Custom);
        custom.base_url = Some("http://10.0.0.2:8000/v1/".to_string());
        custom.timeout_secs = Some(20);
        let config = LlmConfig::from_endpoint(&custom).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8000/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let mut openai = endpoint(Provider::Openai);
        openai.api_key = Some("sk-\nbroken".to_string());
        assert!(LlmConfig::from_endpoint(&openai).is_err());
    }

    #[test]
    fn test_openai_body_carries_schema() {
        let config = LlmConfig::from_endpoint(&endpoint(Provider::Openai)).unwrap();
        let contract = Operation::EvaluateAnswer.output_contract();

        let body = serde_json::to_value(openai_request_body(&config, "grade this", contract)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][1]["content"], "grade this");
        assert_eq!(body["response_format"]["json_schema"]["name"], "EvaluationResult");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"],
            json!(["feedback", "suggestedScore"])
        );
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_gemini_body_strips_unsupported_keywords() {
        let config = LlmConfig::from_endpoint(&endpoint(Provider::Google)).unwrap();
        let contract = Operation::ProcessBulkQuestions.output_contract();

        let body = serde_json::to_value(gemini_request_body(&config, "parse", contract)).unwrap();
        let schema = &body["generationConfig"]["responseSchema"];

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(schema.get("additionalProperties").is_none());
        assert!(schema.get("title").is_none());
        let marks = &schema["properties"]["questions"]["items"]["properties"]["marks"];
        assert_eq!(marks["type"], "number");
        assert!(marks.get("default").is_none());
    }

    #[test]
    fn test_gemini_schema_keeps_fields_named_like_keywords() {
        use crate::contract::{Contract, Field};

        let config = LlmConfig::from_endpoint(&endpoint(Provider::Google)).unwrap();
        let contract = Contract::new(
            "Book",
            Field::object(
                "book",
                vec![
                    Field::text("title"),
                    Field::text("author"),
                    Field::list("default", Field::text("tag")),
                ],
            ),
        );

        let body = serde_json::to_value(gemini_request_body(&config, "describe", &contract)).unwrap();
        let schema = &body["generationConfig"]["responseSchema"];

        assert_eq!(schema["properties"]["title"]["type"], "string");
        assert_eq!(schema["properties"]["author"]["type"], "string");
        assert_eq!(schema["properties"]["default"]["items"]["type"], "string");
        assert_eq!(schema["required"], json!(["title", "author", "default"]));
        assert!(schema.get("title").is_none());
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(
            parse_reply(" {\"motto\": \"Build boldly\"}\n").unwrap(),
            json!({ "motto": "Build boldly" })
        );
        assert!(matches!(
            parse_reply("Sure! Here is your motto."),
            Err(InvokeError::MalformedOutput { .. })
        ));
    }
}
