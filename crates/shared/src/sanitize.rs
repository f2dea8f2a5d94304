//! Freeform text sanitization.
//!
//! Applied uniformly to every freeform text field before persistence.

/// Maximum length of a sanitized freeform text field.
const MAX_TEXT_LENGTH: usize = 500;

/// Characters stripped from freeform text before storage.
const STRIPPED_CHARS: [char; 4] = ['<', '>', '"', '\''];

/// Sanitizes a freeform text field with a caller-provided length cap.
///
/// Strips `<`, `>`, `"` and `'` characters and truncates the result to
/// `max_chars` characters. Truncation counts characters, not bytes, so
/// multi-byte input never splits a code point.
pub fn sanitize_text_bounded(input: &str, max_chars: usize) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .take(max_chars)
        .collect()
}

/// Sanitizes a freeform text field for storage, capped at the default
/// 500 characters.
pub fn sanitize_text(input: &str) -> String {
    sanitize_text_bounded(input, MAX_TEXT_LENGTH)
}

/// Sanitizes an optional freeform text field, mapping empty results to `None`.
pub fn sanitize_optional_text(input: Option<&str>) -> Option<String> {
    input.map(sanitize_text).filter(|s| !s.is_empty())
}
