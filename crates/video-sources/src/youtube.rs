//! YouTube Data API v3 backend.
//!
//! ## Calls
//! 1. `search.list` - keyword search restricted to videos, Korean region and
//!    relevance language, returning only ids
//! 2. `videos.list` - snippet and statistics for a comma-joined id batch
//!
//! The API key is optional in configuration; without one every call fails
//! with `MissingApiKey` before any request is sent.

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::types::{Thumbnails, VideoMetadata};
use crate::{VideoServiceError, VideoSource};

pub const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// YouTube connection settings
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub search_url: String,
    pub videos_url: String,
    pub region_code: String,
    pub relevance_language: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_url: SEARCH_URL.to_string(),
            videos_url: VIDEOS_URL.to_string(),
            region_code: "KR".to_string(),
            relevance_language: "ko".to_string(),
        }
    }
}

impl YouTubeConfig {
    /// Load configuration from the environment.
    ///
    /// Optional:
    /// - `YOUTUBE_API_KEY`: without it, video enrichment degrades to empty lists
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: ThumbnailSet,
}

#[derive(Debug, Default, Deserialize)]
struct ThumbnailSet {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    /// The API sends counts as strings; tolerate numbers too
    view_count: Option<serde_json::Value>,
}

fn parse_view_count(value: Option<&serde_json::Value>) -> u64 {
    match value {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

/// Extract video ids from a `search.list` body, skipping items without one
fn parse_search_ids(body: &str) -> Result<Vec<String>, VideoServiceError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .filter(|id| !id.is_empty())
        .collect())
}

/// Convert a `videos.list` body into metadata, in response order
fn parse_video_details(body: &str) -> Result<Vec<VideoMetadata>, VideoServiceError> {
    let response: VideosResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| {
            let thumbnails = item.snippet.thumbnails;
            VideoMetadata {
                view_count: parse_view_count(item.statistics.view_count.as_ref()),
                id: item.id,
                title: item.snippet.title,
                description: item.snippet.description,
                channel_title: item.snippet.channel_title,
                thumbnails: Thumbnails {
                    high: thumbnails.high.and_then(|t| t.url),
                    medium: thumbnails.medium.and_then(|t| t.url),
                    default: thumbnails.default.and_then(|t| t.url),
                },
            }
        })
        .collect())
}

// =============================================================================
// Source
// =============================================================================

/// `VideoSource` backed by the YouTube Data API
#[derive(Debug, Clone)]
pub struct YouTubeSource {
    config: YouTubeConfig,
    client: reqwest::Client,
}

impl YouTubeSource {
    pub fn new(config: YouTubeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(YouTubeConfig::from_env())
    }

    /// Whether a key is configured; without one every call fails soft
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, VideoServiceError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(VideoServiceError::MissingApiKey)
    }

    async fn get<T>(
        &self,
        url: &str,
        params: &[(&str, String)],
        parse: impl FnOnce(&str) -> Result<T, VideoServiceError>,
    ) -> Result<T, VideoServiceError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(VideoServiceError::network)?;

        let status = response.status();
        let body = response.text().await.map_err(VideoServiceError::network)?;

        if !status.is_success() {
            return Err(VideoServiceError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        parse(&body)
    }
}

#[async_trait]
impl VideoSource for YouTubeSource {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, VideoServiceError> {
        let key = self.api_key()?;
        let params = [
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "video".to_string()),
            ("maxResults", limit.to_string()),
            ("regionCode", self.config.region_code.clone()),
            ("relevanceLanguage", self.config.relevance_language.clone()),
            ("key", key.to_string()),
        ];

        let ids = self
            .get(&self.config.search_url, &params, parse_search_ids)
            .await?;
        debug!("YouTube search '{}' returned {} ids", query, ids.len());
        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoMetadata>, VideoServiceError> {
        let key = self.api_key()?;
        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", ids.join(",")),
            ("key", key.to_string()),
        ];

        let videos = self
            .get(&self.config.videos_url, &params, parse_video_details)
            .await?;
        debug!("YouTube returned details for {}/{} videos", videos.len(), ids.len());
        Ok(videos)
    }

    fn name(&self) -> &str {
        "youtube"
    }
}
