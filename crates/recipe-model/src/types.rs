//! Core domain types for recipe recommendations.
//!
//! Every type here is a request-scoped value: built once by a pipeline stage
//! and never mutated afterwards. Field names on the wire follow the JSON the
//! vision model is asked to produce (`recipeName`, `estimatedTime`, ...), so the
//! same structs decode model output and serialize responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix every canonical video URL is built from
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

// =============================================================================
// Recipes
// =============================================================================

/// One recipe suggested by the vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    #[serde(rename = "recipeName")]
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Estimated cooking time in minutes
    #[serde(rename = "estimatedTime")]
    pub estimated_time_minutes: u32,
    /// Free text as produced by the model; see [`RecipeSuggestion::difficulty_level`]
    pub difficulty: String,
    pub tips: String,
}

impl RecipeSuggestion {
    /// Typed view of `difficulty`, `None` when the model wrote something unexpected.
    pub fn difficulty_level(&self) -> Option<Difficulty> {
        self.difficulty.parse().ok()
    }
}

/// Difficulty levels the persona prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "쉬움" => Ok(Difficulty::Easy),
            "medium" | "보통" => Ok(Difficulty::Medium),
            "hard" | "어려움" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

/// Decoded model answer: the suggested recipes plus a free-form message.
///
/// `recipes` is only empty when `message` says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recipes: Vec<RecipeSuggestion>,
    #[serde(default)]
    pub message: String,
}

impl RecommendationResult {
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            recipes: Vec::new(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Videos
// =============================================================================

/// A ranked instructional video attached to a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    #[serde(rename = "videoId")]
    pub id: String,
    pub title: String,
    /// At most 200 characters, followed by `...` when it was cut
    pub description: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub view_count: u64,
    #[serde(rename = "videoUrl")]
    pub canonical_url: String,
}

/// Canonical watch URL for a video id
///
/// Example: "dQw4w9WgXcQ" -> "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
pub fn canonical_video_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

// =============================================================================
// Enriched results
// =============================================================================

/// A suggestion together with its ranked videos (at most three).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecipe {
    pub recipe: RecipeSuggestion,
    #[serde(rename = "youtubeVideos")]
    pub videos: Vec<VideoSummary>,
}

/// Recommendation result with every recipe enriched, in the model's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecommendationResult {
    pub recipes: Vec<EnrichedRecipe>,
    pub message: String,
}
