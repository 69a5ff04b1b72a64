//! Google Gemini backend for [`VisionModel`].
//!
//! Sends one `generateContent` call per request: the persona as the system
//! instruction, then a single user turn holding the prompt text and the image
//! as an inline base64 part.

use std::env;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{VisionClientError, VisionModel, VisionRequest};

/// Default Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini connection settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`
    ///
    /// Optional:
    /// - `SNAPCOOK_VISION_MODEL` (default: "gemini-2.0-flash")
    /// - `SNAPCOOK_VISION_BASE_URL` (default: Gemini v1beta endpoint)
    pub fn from_env() -> Result<Self, VisionClientError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| VisionClientError::MissingApiKey("GEMINI_API_KEY".to_string()))?;

        let model = env::var("SNAPCOOK_VISION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("SNAPCOOK_VISION_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

fn build_request_body(request: &VisionRequest<'_>) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: Some(request.system.to_string()),
                inline_data: None,
            }],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: Some(request.prompt.to_string()),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: request.image.mime_type().to_string(),
                        data: BASE64.encode(request.image.bytes()),
                    }),
                },
            ],
        }],
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

// =============================================================================
// Client
// =============================================================================

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiVisionModel {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiVisionModel {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, VisionClientError> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl VisionModel for GeminiVisionModel {
    async fn generate(&self, request: VisionRequest<'_>) -> Result<String, VisionClientError> {
        let body = build_request_body(&request);

        debug!(
            "Calling Gemini model {} ({} image bytes, {})",
            self.config.model,
            request.image.bytes().len(),
            request.image.mime_type()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionClientError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VisionClientError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            error!("Gemini returned {}: {}", status, message);
            return Err(VisionClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| VisionClientError::InvalidResponse(e.to_string()))?;

        Ok(extract_text(decoded))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
