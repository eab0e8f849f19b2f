//! Body normalization for similarity fingerprinting.

use regex::Regex;
use std::sync::LazyLock;

/// Fenced code blocks, including the fences.
static CODE_BLOCK_PATTERN: LazyLock<Regex> = lazy_regex!(r"(?s)```.*?```");

/// Inline code spans.
static INLINE_CODE_PATTERN: LazyLock<Regex> = lazy_regex!(r"`[^`]+`");

/// Bare http(s) URLs.
static URL_PATTERN: LazyLock<Regex> = lazy_regex!(r"https?://\S+");

/// Runs of non-word characters.
static NON_WORD_PATTERN: LazyLock<Regex> = lazy_regex!(r"\W+");

/// Normalizes a document body for similarity comparison.
///
/// Steps, in order:
/// 1. Strip fenced code blocks
/// 2. Strip inline code spans
/// 3. Strip URLs
/// 4. Lowercase
/// 5. Collapse non-word runs to a single space and trim
///
/// # Example
///
/// ```rust
/// use docreg::fingerprint::normalize_body;
///
/// let body = "See `cargo run` at https://example.com/docs!\n\n```sh\nmake\n```\nDone.";
/// assert_eq!(normalize_body(body), "see at done");
/// ```
#[must_use]
pub fn normalize_body(body: &str) -> String {
    let text = CODE_BLOCK_PATTERN.replace_all(body, "");
    let text = INLINE_CODE_PATTERN.replace_all(&text, "");
    let text = URL_PATTERN.replace_all(&text, "");
    let lowered = text.to_lowercase();
    NON_WORD_PATTERN
        .replace_all(&lowered, " ")
        .trim()
        .to_string()
}
