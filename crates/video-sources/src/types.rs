//! Raw video metadata as returned by a video platform.
//!
//! These are unranked and untrimmed: full descriptions, every thumbnail size
//! the platform reported. `pipeline::VideoRanker` turns them into
//! `recipe_model::VideoSummary` values.

use serde::{Deserialize, Serialize};

/// Thumbnail URLs keyed by resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    pub high: Option<String>,
    pub medium: Option<String>,
    pub default: Option<String>,
}

/// Details of a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub thumbnails: Thumbnails,
    /// 0 when the platform did not report a count
    pub view_count: u64,
}

impl VideoMetadata {
    /// Create metadata with only an id and a view count (everything else empty)
    pub fn new(id: impl Into<String>, view_count: u64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            channel_title: String::new(),
            thumbnails: Thumbnails::default(),
            view_count,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_channel(mut self, channel_title: impl Into<String>) -> Self {
        self.channel_title = channel_title.into();
        self
    }

    pub fn with_thumbnails(mut self, thumbnails: Thumbnails) -> Self {
        self.thumbnails = thumbnails;
        self
    }
}
