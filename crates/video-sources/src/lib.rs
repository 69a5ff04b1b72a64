//! # Video Sources Crate
//!
//! Finds instructional videos for a recipe on an external video platform.
//!
//! ## Components
//!
//! ### `VideoSource` trait
//! Capability interface over a platform: keyword search for ids, then a
//! batched detail lookup. Backends return `Result<_, VideoServiceError>`.
//!
//! ### YouTube backend
//! `YouTubeSource` implements the trait against the YouTube Data API v3
//! (`search.list` + `videos.list`, region KR, relevance language ko).
//!
//! ### `VideoSearchClient`
//! Fail-soft wrapper: timeouts and backend errors become empty lists carrying
//! a diagnostic, never errors.
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use video_sources::{VideoSearchClient, YouTubeSource, DEFAULT_SEARCH_LIMIT};
//!
//! let client = VideoSearchClient::new(Arc::new(YouTubeSource::from_env()));
//! let ids = client.search_ids("김치찌개 레시피", DEFAULT_SEARCH_LIMIT).await.into_inner();
//! let videos = client.fetch_details(&ids).await.into_inner();
//! ```

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// Public modules
pub mod client;
pub mod types;
pub mod youtube;

// Re-export commonly used types
pub use client::{VideoSearchClient, DEFAULT_SEARCH_LIMIT, DEFAULT_VIDEO_TIMEOUT};
pub use types::{Thumbnails, VideoMetadata};
pub use youtube::{YouTubeConfig, YouTubeSource};

/// Errors a video platform call can fail with
#[derive(Error, Debug)]
pub enum VideoServiceError {
    #[error("Video API key is not configured")]
    MissingApiKey,

    /// Built with the request URL stripped; the URL carries the API key
    #[error("Request to video service failed: {0}")]
    Network(reqwest::Error),

    #[error("Video service returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response from video service: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Video service did not answer within {0:?}")]
    Timeout(Duration),
}

impl VideoServiceError {
    pub(crate) fn network(error: reqwest::Error) -> Self {
        Self::Network(error.without_url())
    }
}

/// Capability interface for a video platform.
///
/// `Send + Sync` so one source can serve concurrent per-recipe lookups.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Keyword search; returns video ids in relevance order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, VideoServiceError>;

    /// Batched detail lookup for `ids`.
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoMetadata>, VideoServiceError>;

    /// Name of this source (for logging)
    fn name(&self) -> &str;
}
