//! Text tokenization shared by ranking and spell-check passes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid term regex"));
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+(?:'\p{L}+)*").expect("valid word regex"));

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "he", "her", "his", "in",
    "is", "it", "its", "of", "on", "or", "she", "that", "the", "their", "they", "this", "to",
    "was", "were", "with",
];

/// Distinct lowercase terms of `text`, stop words removed.
pub fn term_set(text: &str) -> BTreeSet<String> {
    TERM_RE
        .find_iter(text)
        .map(|term| term.as_str().to_lowercase())
        .filter(|term| !STOP_WORDS.contains(&term.as_str()))
        .collect()
}

/// A word occurrence with byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Alphabetic words (apostrophes allowed inside) in document order.
pub fn word_spans(text: &str) -> impl Iterator<Item = WordSpan<'_>> {
    WORD_RE.find_iter(text).map(|found| WordSpan {
        text: found.as_str(),
        start: found.start(),
        end: found.end(),
    })
}
