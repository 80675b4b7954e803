use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::{
    error::{AppError, AppResult},
    storage::InlineImage,
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_PROMPT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const PROMPT_TEMPERATURE: f64 = 0.7;

pub const MISSING_API_KEY: &str =
    "API Key is missing. Please set the API_KEY environment variable.";
pub const EMPTY_PROMPT_FALLBACK: &str = "Failed to generate prompt.";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub prompt_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            prompt_model: DEFAULT_PROMPT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let api_key = env_value("GEMINI_API_KEY").or_else(|| env_value("API_KEY"));
        let api_base = env_value("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let prompt_model =
            env_value("GEMINI_PROMPT_MODEL").unwrap_or_else(|| DEFAULT_PROMPT_MODEL.to_string());
        let image_model =
            env_value("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let timeout_secs = env_value("GEMINI_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            api_base,
            prompt_model,
            image_model,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn require_api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::msg(MISSING_API_KEY))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub system_instruction: String,
    pub text: String,
    pub images: Vec<InlineImage>,
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub images: Vec<InlineImage>,
    pub aspect_ratio: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Asks the text model to turn the brief into a single-paragraph image
    /// prompt.
    pub async fn generate_prompt(&self, request: PromptRequest) -> AppResult<String> {
        let api_key = self.config.require_api_key()?;
        let payload = GenerateContentPayload {
            contents: vec![Content::user(request.images, request.text)],
            system_instruction: Some(Content::system(request.system_instruction)),
            generation_config: GenerationConfig {
                temperature: Some(PROMPT_TEMPERATURE),
                ..GenerationConfig::default()
            },
        };

        let response = self
            .post(api_key, &self.config.prompt_model, &payload)
            .await
            .map_err(|err| {
                error!(model = %self.config.prompt_model, error = %err, "text generation failed");
                AppError::msg("Failed to generate creative prompt.")
            })?;

        log_completion(&response);
        Ok(extract_text(&response).unwrap_or_else(|| EMPTY_PROMPT_FALLBACK.to_string()))
    }

    /// Renders the prompt with the image model. `Ok(None)` means the model
    /// answered without any image part.
    pub async fn generate_image(&self, request: ImageRequest) -> AppResult<Option<String>> {
        let api_key = self.config.require_api_key()?;
        let payload = GenerateContentPayload {
            contents: vec![Content::user(request.images, request.prompt)],
            system_instruction: None,
            generation_config: GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio,
                }),
                ..GenerationConfig::default()
            },
        };

        let response = self
            .post(api_key, &self.config.image_model, &payload)
            .await
            .map_err(|err| {
                error!(model = %self.config.image_model, error = %err, "image generation failed");
                AppError::msg("Failed to generate image.")
            })?;

        log_completion(&response);
        let image = extract_image_data_url(&response);
        if image.is_none() {
            warn!(model = %self.config.image_model, "image model returned no inline image");
        }
        Ok(image)
    }

    async fn post(
        &self,
        api_key: &str,
        model: &str,
        payload: &GenerateContentPayload,
    ) -> AppResult<Value> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        );
        let payload_value = serde_json::to_value(payload)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(model, payload = %summarize_payload(&payload_value), "gemini request");
        }

        let started = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&payload_value)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        info!(
            model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gemini response"
        );

        if !status.is_success() {
            return Err(parse_gemini_http_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentPayload {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn user(images: Vec<InlineImage>, text: String) -> Self {
        let mut parts = images
            .into_iter()
            .map(|image| Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type,
                    data: image.data,
                },
            })
            .collect::<Vec<_>>();
        parts.push(Part::Text { text });

        Self {
            role: Some("user"),
            parts,
        }
    }

    fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part::Text { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

fn parse_gemini_http_error(status: StatusCode, body: &str) -> AppError {
    let gemini_error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate_for_log(body, 500));

    AppError::msg(format!("Gemini request failed ({status}): {gemini_error}"))
}

fn candidate_parts(response: &Value) -> &[Value] {
    response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn extract_text(response: &Value) -> Option<String> {
    let merged = candidate_parts(response)
        .iter()
        .filter(|part| part.get("thought").and_then(Value::as_bool) != Some(true))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");

    let trimmed = merged.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn extract_image_data_url(response: &Value) -> Option<String> {
    candidate_parts(response).iter().find_map(|part| {
        let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
        let data = inline.get("data").and_then(Value::as_str)?;
        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)
            .filter(|mime| !mime.is_empty())
            .unwrap_or("image/png");
        Some(format!("data:{mime_type};base64,{data}"))
    })
}

fn log_completion(response: &Value) {
    if let Some(reason) = response
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        warn!(block_reason = reason, "gemini blocked the request");
    }

    if let Some(reason) = response
        .pointer("/candidates/0/finishReason")
        .and_then(Value::as_str)
    {
        debug!(finish_reason = reason, "gemini candidate finished");
    }
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

/// Replaces inline image payloads with their mime type and length so request
/// logs stay readable.
fn summarize_payload(payload: &Value) -> Value {
    fn walk(value: &mut Value) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(data)) = map.get("data") {
                    if map.contains_key("mimeType") {
                        let len = data.len();
                        map.insert("data".to_string(), json!(format!("[{len} bytes base64]")));
                        return;
                    }
                }
                for value in map.values_mut() {
                    walk(value);
                }
            }
            Value::Array(array) => {
                for value in array.iter_mut() {
                    walk(value);
                }
            }
            Value::String(text) => {
                *text = truncate_for_log(text, 200);
            }
            _ => {}
        }
    }

    let mut summary = payload.clone();
    walk(&mut summary);
    summary
}
