//! Vision client for turning an ingredient photo into raw recipe text.
//!
//! This crate provides:
//! - The `VisionModel` capability trait, so backends can be swapped or mocked
//! - A Gemini implementation of that trait
//! - `VisionRecommendationClient`, which validates the upload, builds the
//!   prompt and bounds the model call with a timeout
//!
//! Failures here are fatal for the request: without the model's answer there
//! is nothing to degrade to. Every backend error therefore surfaces as
//! `RecommendError::UpstreamUnavailable`.

pub mod gemini;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use recipe_model::RecommendError;

pub use gemini::{GeminiConfig, GeminiVisionModel};
pub use prompt::{build_user_prompt, BASE_INSTRUCTION, SYSTEM_PROMPT};

/// Default bound on a single model call.
pub const DEFAULT_VISION_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur when talking to a vision model backend
#[derive(Error, Debug)]
pub enum VisionClientError {
    #[error("API key not configured: {0}")]
    MissingApiKey(String),

    #[error("Request to vision model failed: {0}")]
    RequestFailed(String),

    #[error("Vision model returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response envelope from vision model: {0}")]
    InvalidResponse(String),
}

impl From<VisionClientError> for RecommendError {
    fn from(err: VisionClientError) -> Self {
        RecommendError::UpstreamUnavailable(err.to_string())
    }
}

/// An uploaded image that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageAttachment {
    /// Validate an upload.
    ///
    /// Rejects empty payloads and any declared MIME type outside `image/*`.
    pub fn new(bytes: Vec<u8>, mime_type: &str) -> Result<Self, RecommendError> {
        let mime_type = mime_type.trim();
        if !mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(RecommendError::InvalidInput(format!(
                "only image uploads are accepted (got '{}')",
                mime_type
            )));
        }
        if bytes.is_empty() {
            return Err(RecommendError::InvalidInput("image payload is empty".to_string()));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.to_string(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Everything a backend needs for one multimodal call.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub image: &'a ImageAttachment,
}

/// Capability interface for vision-capable language models.
///
/// Implementations should be stateless and thread-safe; they only make the
/// call and return the model's text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send system text, user text and one image; return the model's raw text.
    async fn generate(&self, request: VisionRequest<'_>) -> Result<String, VisionClientError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Validates uploads and obtains the raw recommendation text from a model.
#[derive(Clone)]
pub struct VisionRecommendationClient {
    model: Arc<dyn VisionModel>,
    timeout: Duration,
}

impl VisionRecommendationClient {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            timeout: DEFAULT_VISION_TIMEOUT,
        }
    }

    /// Configure the per-call timeout (default: 60s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the upload, call the model and return its raw answer.
    ///
    /// # Errors
    /// * `InvalidInput` - non-image MIME type or empty payload
    /// * `UpstreamUnavailable` - backend failure or timeout
    pub async fn recommend_raw(
        &self,
        image: Vec<u8>,
        mime_type: &str,
        modifier: Option<&str>,
    ) -> Result<String, RecommendError> {
        let image = ImageAttachment::new(image, mime_type)?;
        let prompt = build_user_prompt(modifier);

        let request = VisionRequest {
            system: SYSTEM_PROMPT,
            prompt: &prompt,
            image: &image,
        };

        let answer = tokio::time::timeout(self.timeout, self.model.generate(request))
            .await
            .map_err(|_| {
                error!(
                    "Vision model {} did not answer within {:?}",
                    self.model.model_name(),
                    self.timeout
                );
                RecommendError::UpstreamUnavailable(format!(
                    "no answer within {:?}",
                    self.timeout
                ))
            })?
            .map_err(|e| {
                error!("Vision model {} failed: {}", self.model.model_name(), e);
                RecommendError::from(e)
            })?;

        info!(
            "Vision model {} answered with {} characters",
            self.model.model_name(),
            answer.chars().count()
        );
        Ok(answer)
    }
}
