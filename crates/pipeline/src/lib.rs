//! Ranking pipeline for recipe videos.
//!
//! This crate provides:
//! - `VideoRanker`, which orders raw video metadata by view count and keeps
//!   at most three
//! - Post-processing helpers for thumbnails and descriptions
//!
//! ## Architecture
//! The ranker runs after both video platform calls have completed:
//! 1. `video_sources::VideoSearchClient` finds ids and fetches their details
//! 2. `VideoRanker` sorts, truncates and trims them into `VideoSummary` values
//! 3. The orchestrator attaches the summaries to their recipe
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::VideoRanker;
//!
//! let ranker = VideoRanker::new();
//! let summaries = ranker.rank(details, 3);
//! ```

pub mod postprocess;
pub mod ranker;

// Re-export main types
pub use postprocess::{select_thumbnail, truncate_description, DESCRIPTION_LIMIT};
pub use ranker::{VideoRanker, MAX_VIDEOS_PER_RECIPE};
