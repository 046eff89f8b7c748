//! OpenAIJudge - scores drawings with the OpenAI Chat Completions API.
//!
//! The drawing is sent inline as a base64 data URL next to the rendered prompt.
//! Configuration priority: ~/.config/burger-rush/secret.json > environment variables

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use burger_core::config::OracleConfig;
use burger_core::oracle::{JudgeRequest, OracleError, QualityOracle};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

use crate::config::load_secret_config;

const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a friendly drawing critic who gives concrete, specific feedback and answers in JSON.";

/// Quality oracle backed by an OpenAI vision model.
#[derive(Clone)]
pub struct OpenAIJudge {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    base_url: String,
}

impl OpenAIJudge {
    /// Creates a judge with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads the API key from ~/.config/burger-rush/secret.json or the environment.
    ///
    /// Priority:
    /// 1. ~/.config/burger-rush/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// The model falls back to the one in the game's oracle config.
    pub fn try_from_env(config: &OracleConfig) -> Result<Self, OracleError> {
        if let Ok(secret) = load_secret_config() {
            if let Some(openai) = secret.openai {
                let model = openai.model_name.unwrap_or_else(|| config.model.clone());
                return Ok(Self::new(openai.api_key, model).with_max_tokens(config.max_tokens));
            }
        }

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            OracleError::Auth(
                "OPENAI_API_KEY not found in ~/.config/burger-rush/secret.json or environment variables"
                    .into(),
            )
        })?;
        let model = env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| config.model.clone());
        Ok(Self::new(api_key, model).with_max_tokens(config.max_tokens))
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Points the judge at a different endpoint (proxies, compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &JudgeRequest<'_>) -> ChatCompletionRequest {
        let data_url = format!(
            "data:{};base64,{}",
            request.drawing.mime_type,
            BASE64_STANDARD.encode(&request.drawing.bytes)
        );

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: vec![MessageContent::Text {
                        text: SYSTEM_PROMPT.to_string(),
                    }],
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: vec![
                        MessageContent::Text {
                            text: request.prompt.clone(),
                        },
                        MessageContent::ImageUrl {
                            image_url: ImageUrl { url: data_url },
                        },
                    ],
                },
            ],
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, OracleError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| OracleError::Unavailable(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            OracleError::MalformedResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl QualityOracle for OpenAIJudge {
    fn name(&self) -> &str {
        "openai"
    }

    async fn evaluate(&self, request: &JudgeRequest<'_>) -> Result<String, OracleError> {
        let body = self.build_request(request);
        tracing::debug!(
            model = %self.model,
            component = request.component_description,
            image_bytes = request.drawing.bytes.len(),
            "Sending drawing to OpenAI"
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, OracleError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            OracleError::MalformedResponse("OpenAI API returned no content in the response".into())
        })
}

fn map_http_error(status: StatusCode, body: String) -> OracleError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OracleError::Auth(message),
        _ => OracleError::Unavailable(message),
    }
}
