//! Text normalization for the Marathi analysis passes.

use std::sync::LazyLock;

use regex::Regex;

/// Punctuation, Latin and Devanagari digits, and special quotes that
/// break words without carrying meaning.
const SPECIALS: &str = "-:.?&,!@#$%^*()_+={}[]|\\;\"'<>/`~०१२३४५६७८९”“’‘";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static NON_DEVANAGARI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^ऀ-ॿ\s]").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Replace special characters with spaces, preserving word boundaries.
pub fn strip_specials(text: &str) -> String {
    text.chars()
        .map(|c| if SPECIALS.contains(c) { ' ' } else { c })
        .collect()
}

/// Keep only Devanagari letters and whitespace, collapsing whitespace
/// runs to single spaces.
pub fn sanitize_devanagari(text: &str) -> String {
    let no_digits = DIGITS.replace_all(text, "");
    let devanagari_only = NON_DEVANAGARI.replace_all(&no_digits, "");
    WHITESPACE_RUNS
        .replace_all(&devanagari_only, " ")
        .trim()
        .to_string()
}
