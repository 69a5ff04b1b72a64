//! # Recipe Model Crate
//!
//! Shared vocabulary of the SnapCook pipeline.
//!
//! ## Main Components
//!
//! - **types**: Recipe suggestions, video summaries and the enriched results
//! - **parser**: Fail-soft decoding of raw vision-model answers
//! - **outcome**: `FailSoft<T>`, a value plus an optional degradation diagnostic
//! - **error**: The two errors a recommendation request can actually fail with
//!
//! ## Example Usage
//!
//! ```ignore
//! use recipe_model::parse_recommendation;
//!
//! let outcome = parse_recommendation(&raw_model_answer);
//! if let Some(reason) = outcome.reason() {
//!     tracing::warn!("Model answer degraded: {}", reason);
//! }
//! let result = outcome.into_inner();
//! ```

// Public modules
pub mod error;
pub mod outcome;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{RecommendError, Result};
pub use outcome::FailSoft;
pub use parser::{parse_recommendation, strip_code_fences, NO_RECIPES_MESSAGE, PARSE_FAILURE_MESSAGE};
pub use types::{
    canonical_video_url,
    Difficulty,
    EnrichedRecipe,
    EnrichedRecommendationResult,
    RecipeSuggestion,
    RecommendationResult,
    VideoSummary,
    WATCH_URL_PREFIX,
};
