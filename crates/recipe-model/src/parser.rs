//! Parser for vision-model answers.
//!
//! The model is asked for bare JSON but routinely wraps it in a Markdown code
//! fence, adds stray whitespace, or drifts from the schema entirely. This
//! module absorbs all of that: `parse_recommendation` never returns an error.
//! A broken answer becomes an empty recipe list whose message quotes the raw
//! text, and the returned [`FailSoft`] records why.

use tracing::{debug, warn};

use crate::outcome::FailSoft;
use crate::types::RecommendationResult;

/// Message prefix used when the model answer could not be decoded
pub const PARSE_FAILURE_MESSAGE: &str =
    "죄송합니다. 응답 처리 중 오류가 발생했습니다. 원본 응답: ";

/// Message used when the model decoded fine but suggested nothing and said nothing
pub const NO_RECIPES_MESSAGE: &str = "이미지에서 추천할 수 있는 레시피를 찾지 못했습니다.";

/// Remove Markdown code-fence markers and surrounding whitespace
///
/// Example: "```json\n{\"a\":1}\n```" -> "{\"a\":1}"
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decode a raw model answer into a [`RecommendationResult`].
///
/// ## Algorithm
/// 1. Strip code fences and trim
/// 2. Decode against the recipe schema
/// 3. On success, return it (filling in a message if there are no recipes
///    and the model left `message` blank)
/// 4. On failure, return an empty result whose message embeds `raw`
pub fn parse_recommendation(raw: &str) -> FailSoft<RecommendationResult> {
    let json = strip_code_fences(raw);

    match serde_json::from_str::<RecommendationResult>(&json) {
        Ok(mut result) => {
            debug!("Decoded {} recipes from model answer", result.recipes.len());
            if result.recipes.is_empty() && result.message.trim().is_empty() {
                result.message = NO_RECIPES_MESSAGE.to_string();
            }
            FailSoft::Ok(result)
        }
        Err(e) => {
            warn!("Failed to decode model answer: {} (raw: {})", e, raw);
            FailSoft::degraded(
                RecommendationResult::empty(format!("{}{}", PARSE_FAILURE_MESSAGE, raw)),
                format!("model answer is not valid recipe JSON: {}", e),
            )
        }
    }
}
