//! Locate the JSON object inside raw model output.
//!
//! Models often wrap JSON in code fences or surround it with prose. The
//! extractor removes fence markers and returns the span from the leftmost
//! `{` to the rightmost `}`. The match is greedy and not brace-balanced: two
//! independent objects come back as one span, and braces inside string values
//! are not special. A parse failure on the result is an ordinary error path.

use std::sync::OnceLock;

use regex::Regex;

const FENCE_JSON: &str = "```json";
const FENCE: &str = "```";
const EMPTY_OBJECT: &str = "{}";

static OBJECT_SPAN: OnceLock<Regex> = OnceLock::new();

fn object_span() -> &'static Regex {
    OBJECT_SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

/// Extract the JSON object substring from `raw`, or `{}` if there is none.
pub fn extract(raw: &str) -> String {
    let cleaned = raw.replace(FENCE_JSON, "").replace(FENCE, "");
    match object_span().find(cleaned.trim()) {
        Some(span) => span.as_str().to_string(),
        None => EMPTY_OBJECT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_surrounding_prose() {
        assert_eq!(
            extract("noise ```json {\"a\":1} ``` trailing"),
            "{\"a\":1}"
        );
    }

    #[test]
    fn no_braces_yields_empty_object() {
        assert_eq!(extract("no braces here"), "{}");
        assert_eq!(extract(""), "{}");
    }

    #[test]
    fn two_objects_span_first_open_to_last_close() {
        assert_eq!(
            extract("first {\"a\":1} then {\"b\":2} done"),
            "{\"a\":1} then {\"b\":2}"
        );
    }

    #[test]
    fn spans_newlines() {
        let raw = "```json\n{\n  \"style\": \"lofi\",\n  \"bpm\": \"80\"\n}\n```";
        assert_eq!(extract(raw), "{\n  \"style\": \"lofi\",\n  \"bpm\": \"80\"\n}");
    }

    #[test]
    fn bare_fence_is_removed() {
        assert_eq!(extract("```\n{\"k\": \"v\"}\n```"), "{\"k\": \"v\"}");
    }

    #[test]
    fn open_brace_without_close_yields_empty_object() {
        assert_eq!(extract("{ unterminated"), "{}");
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        assert_eq!(
            extract("x {\"mix\": {\"low\": \"cut\"}} y"),
            "{\"mix\": {\"low\": \"cut\"}}"
        );
    }
}
