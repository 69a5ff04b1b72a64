//! Server crate for the SnapCook recommendation service.
//!
//! This crate contains the orchestrator that turns a food photo into recipe
//! suggestions with attached cooking videos, plus its configuration.

pub mod config;
pub mod orchestrator;

pub use config::{ConfigError, PipelineConfig, MAX_SEARCH_LIMIT};
pub use orchestrator::{build_video_query, RecommendationOrchestrator, VIDEO_QUERY_SUFFIX};
