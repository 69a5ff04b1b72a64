//! Per-video post-processing applied after ranking.

use video_sources::Thumbnails;

/// Longest description kept, in characters
pub const DESCRIPTION_LIMIT: usize = 200;

/// Appended to descriptions that were cut
pub const ELLIPSIS: &str = "...";

/// Pick the best available thumbnail: high, then medium, then default.
///
/// Returns an empty string when none is present.
pub fn select_thumbnail(thumbnails: &Thumbnails) -> String {
    thumbnails
        .high
        .as_ref()
        .or(thumbnails.medium.as_ref())
        .or(thumbnails.default.as_ref())
        .cloned()
        .unwrap_or_default()
}

/// Cut `description` to `limit` characters plus [`ELLIPSIS`].
///
/// Counts Unicode scalar values, not bytes, so Hangul is never split.
pub fn truncate_description(description: &str, limit: usize) -> String {
    match description.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &description[..byte_idx], ELLIPSIS),
        None => description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumbs(high: Option<&str>, medium: Option<&str>, default: Option<&str>) -> Thumbnails {
        Thumbnails {
            high: high.map(String::from),
            medium: medium.map(String::from),
            default: default.map(String::from),
        }
    }

    #[test]
    fn test_thumbnail_priority_for_every_subset() {
        let cases = [
            (thumbs(Some("h"), Some("m"), Some("d")), "h"),
            (thumbs(Some("h"), None, Some("d")), "h"),
            (thumbs(Some("h"), Some("m"), None), "h"),
            (thumbs(Some("h"), None, None), "h"),
            (thumbs(None, Some("m"), Some("d")), "m"),
            (thumbs(None, Some("m"), None), "m"),
            (thumbs(None, None, Some("d")), "d"),
            (thumbs(None, None, None), ""),
        ];

        for (thumbnails, expected) in cases {
            assert_eq!(select_thumbnail(&thumbnails), expected, "for {:?}", thumbnails);
        }
    }

    #[test]
    fn test_short_description_unchanged() {
        assert_eq!(truncate_description("", DESCRIPTION_LIMIT), "");
        let exact = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exact, DESCRIPTION_LIMIT), exact);
    }

    #[test]
    fn test_long_description_cut_to_203_chars() {
        let long = "b".repeat(DESCRIPTION_LIMIT + 1);
        let cut = truncate_description(&long, DESCRIPTION_LIMIT);

        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(cut.starts_with(&"b".repeat(DESCRIPTION_LIMIT)));
    }

    #[test]
    fn test_hangul_description_counts_characters() {
        let long = "맛".repeat(250);
        let cut = truncate_description(&long, DESCRIPTION_LIMIT);

        assert_eq!(cut.chars().count(), 203);
        assert_eq!(cut.chars().filter(|c| *c == '맛').count(), 200);
    }
}
