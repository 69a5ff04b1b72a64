//! Ranking of raw video metadata into the summaries attached to a recipe.
//!
//! ## Algorithm
//! 1. Stable sort by view count, highest first (ties keep search order)
//! 2. Keep min(requested, available, 3) videos, with requested clamped to [1, 3]
//! 3. Pick one thumbnail per video (high > medium > default)
//! 4. Cut descriptions to 200 characters plus "..."

use recipe_model::{canonical_video_url, VideoSummary};
use tracing::debug;
use video_sources::VideoMetadata;

use crate::postprocess::{select_thumbnail, truncate_description, DESCRIPTION_LIMIT};

/// Hard cap on videos attached to one recipe
pub const MAX_VIDEOS_PER_RECIPE: usize = 3;

/// Turns raw video metadata into at most three ranked summaries.
#[derive(Debug, Clone)]
pub struct VideoRanker {
    description_limit: usize,
}

impl VideoRanker {
    pub fn new() -> Self {
        Self {
            description_limit: DESCRIPTION_LIMIT,
        }
    }

    /// Clamp a caller's requested count into [1, MAX_VIDEOS_PER_RECIPE]
    pub fn clamp_count(requested: usize) -> usize {
        requested.clamp(1, MAX_VIDEOS_PER_RECIPE)
    }

    /// Rank `videos` and keep the top `requested` (after clamping).
    pub fn rank(&self, mut videos: Vec<VideoMetadata>, requested: usize) -> Vec<VideoSummary> {
        let limit = Self::clamp_count(requested);
        let available = videos.len();

        // sort_by is stable, so equal counts keep their search-result order
        videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        videos.truncate(limit);

        debug!(
            "Ranked {} videos, keeping {} (requested {})",
            available,
            videos.len(),
            requested
        );

        videos
            .into_iter()
            .map(|video| self.summarize(video))
            .collect()
    }

    fn summarize(&self, video: VideoMetadata) -> VideoSummary {
        VideoSummary {
            thumbnail_url: select_thumbnail(&video.thumbnails),
            description: truncate_description(&video.description, self.description_limit),
            canonical_url: canonical_video_url(&video.id),
            id: video.id,
            title: video.title,
            channel_title: video.channel_title,
            view_count: video.view_count,
        }
    }
}

impl Default for VideoRanker {
    fn default() -> Self {
        Self::new()
    }
}
