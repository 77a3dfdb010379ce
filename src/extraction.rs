// ABOUTME: Best-effort extraction of a JSON document embedded in model output
// ABOUTME: Strips markdown fences and surrounding prose, then slices the outermost object or array
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # JSON Extraction
//!
//! Completion text frequently wraps the JSON in a markdown fence, with or
//! without a language tag, or surrounds it with a sentence of prose. The
//! helpers here only locate the candidate text; parsing and schema checks
//! happen in the recommendation normalizer.

use serde_json::Value;

const FENCE: &str = "```";

/// Contents of the first markdown code fence, or the trimmed input when there is none
///
/// An opening fence without a closing one yields everything after the opener.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };
    let after_open = &trimmed[open + FENCE.len()..];
    // Language tag (`json`, `JSON`, ...) runs to the end of the opening line
    let is_tag_line = |line: &str| !line.contains(['{', '[']);
    let body = match after_open.find('\n') {
        Some(newline) if is_tag_line(&after_open[..newline]) => &after_open[newline + 1..],
        _ => after_open,
    };
    body.find(FENCE).map_or(body, |close| &body[..close]).trim()
}

/// Slice from an opening delimiter to the last matching closer after it
fn slice_from(text: &str, start: usize) -> Option<&str> {
    let closer = match text.as_bytes().get(start)? {
        b'{' => '}',
        b'[' => ']',
        _ => return None,
    };
    let end = text.rfind(closer).filter(|end| *end > start)?;
    Some(&text[start..=end])
}

/// Locate the JSON object or array embedded in `text`
///
/// Fences are stripped first. Each `{` or `[` opener is then tried in order of
/// appearance against the last matching closer; the first slice that parses
/// as JSON wins. When none parse, the earliest slice is returned so the caller
/// can report the syntax error. Returns `None` when the text has no JSON-like
/// span at all.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    let body = strip_code_fences(text);
    let openers = [body.find('{'), body.find('[')];
    let mut starts: Vec<usize> = openers.into_iter().flatten().collect();
    starts.sort_unstable();

    let candidates: Vec<&str> = starts
        .into_iter()
        .filter_map(|start| slice_from(body, start))
        .collect();

    candidates
        .iter()
        .find(|candidate| serde_json::from_str::<Value>(candidate).is_ok())
        .or_else(|| candidates.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_passes_through() {
        assert_eq!(extract_json_block(r#" {"a": 1} "#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_fence_with_language_tag() {
        let text = "```json\n{\"a\": [1, 2]}\n```";
        assert_eq!(extract_json_block(text), Some("{\"a\": [1, 2]}"));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "Sure!\n```\n{\"a\": 1}\n```\nEnjoy.";
        assert_eq!(extract_json_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_prose_around_object() {
        let text = "Here is your plan: {\"meals\": {}} Hope it helps!";
        assert_eq!(extract_json_block(text), Some("{\"meals\": {}}"));
    }

    #[test]
    fn test_bracketed_prose_before_object_is_skipped() {
        let text = "Plan [draft]: {\"a\": 1}";
        assert_eq!(extract_json_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_array_payload() {
        assert_eq!(extract_json_block("list: [1, 2, 3]."), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_no_json() {
        assert_eq!(extract_json_block("I cannot help with that."), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }

    #[test]
    fn test_malformed_returns_earliest_span() {
        assert_eq!(extract_json_block("{\"a\": }"), Some("{\"a\": }"));
    }
}
