//! Fail-soft access to a [`VideoSource`].
//!
//! `VideoSearchClient` never returns an error. A failed, timed-out or
//! unconfigured call yields an empty list wrapped in `FailSoft::Degraded`, so
//! the orchestrator can log the reason and carry on with the next recipe.

use std::sync::Arc;
use std::time::Duration;

use recipe_model::FailSoft;
use tracing::{debug, instrument};

use crate::types::VideoMetadata;
use crate::{VideoServiceError, VideoSource};

/// Number of candidate ids requested from a search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default bound on each video platform call
pub const DEFAULT_VIDEO_TIMEOUT: Duration = Duration::from_secs(10);

/// Two-stage video lookup: search for ids, then fetch their details.
#[derive(Clone)]
pub struct VideoSearchClient {
    source: Arc<dyn VideoSource>,
    timeout: Duration,
}

impl VideoSearchClient {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_VIDEO_TIMEOUT,
        }
    }

    /// Configure the per-call timeout (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search for video ids matching `query`, in search-result order.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn search_ids(&self, query: &str, limit: usize) -> FailSoft<Vec<String>> {
        let result = match tokio::time::timeout(self.timeout, self.source.search(query, limit)).await
        {
            Ok(result) => result,
            Err(_) => Err(VideoServiceError::Timeout(self.timeout)),
        };
        FailSoft::from(result)
    }

    /// Fetch details for `ids`, returned in the order of `ids`.
    ///
    /// Ids the platform did not return are simply absent.
    #[instrument(skip(self, ids), fields(source = self.source.name(), ids = ids.len()))]
    pub async fn fetch_details(&self, ids: &[String]) -> FailSoft<Vec<VideoMetadata>> {
        if ids.is_empty() {
            return FailSoft::Ok(Vec::new());
        }

        let result = match tokio::time::timeout(self.timeout, self.source.fetch_details(ids)).await
        {
            Ok(result) => result,
            Err(_) => Err(VideoServiceError::Timeout(self.timeout)),
        };

        FailSoft::from(result.map(|videos| {
            debug!("Fetched details for {} of {} ids", videos.len(), ids.len());
            align_to_ids(videos, ids)
        }))
    }
}

/// Reorder `videos` to follow `ids`; unknown ids go last in their original order
fn align_to_ids(mut videos: Vec<VideoMetadata>, ids: &[String]) -> Vec<VideoMetadata> {
    videos.sort_by_key(|video| {
        ids.iter()
            .position(|id| *id == video.id)
            .unwrap_or(ids.len())
    });
    videos
}
