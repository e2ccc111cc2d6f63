//! Dictionary-aware spell-check pass.
//!
//! # Responsibility
//! - Define the contract expected from an external spell-checker.
//! - Walk a document word by word, skipping words the writer defined.
//!
//! # Invariants
//! - Cancellation is checked at every word boundary.
//! - A cancelled pass returns no partial results.
//! - Findings are reported in document order.

use crate::context::tokenize::word_spans;
use crate::model::project::Brain;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// External spell-check collaborator.
///
/// Implementations must be pure: the same token always yields the same
/// suggestions, and checking has no side effects.
pub trait SpellChecker {
    /// Returns ordered suggestions; empty when `token` is spelled correctly.
    fn check(&self, token: &str) -> Vec<String>;
}

impl<T: SpellChecker + ?Sized> SpellChecker for &T {
    fn check(&self, token: &str) -> Vec<String> {
        (**self).check(token)
    }
}

/// Shared cancellation flag for long check passes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckError {
    Cancelled,
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "spell-check pass was cancelled"),
        }
    }
}

impl Error for CheckError {}

/// One unrecognized word with its byte range in the checked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    pub token: String,
    pub start: usize,
    pub end: usize,
    pub suggestions: Vec<String>,
}

/// Checks `text`, treating every key of `brain` as correctly spelled.
///
/// Returns `CheckError::Cancelled` as soon as `cancel` is observed; findings
/// collected up to that point are dropped.
pub fn check_text<C: SpellChecker>(
    checker: &C,
    brain: &Brain,
    text: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Misspelling>, CheckError> {
    let mut findings = Vec::new();
    let mut checked = 0usize;

    for span in word_spans(text) {
        if cancel.is_cancelled() {
            debug!("event=spellcheck module=spellcheck status=cancelled checked={checked}");
            return Err(CheckError::Cancelled);
        }
        checked += 1;

        if brain.contains_key(span.text) {
            continue;
        }
        let suggestions = checker.check(span.text);
        if suggestions.is_empty() {
            continue;
        }
        findings.push(Misspelling {
            token: span.text.to_string(),
            start: span.start,
            end: span.end,
            suggestions,
        });
    }

    debug!(
        "event=spellcheck module=spellcheck status=ok checked={checked} findings={}",
        findings.len()
    );
    Ok(findings)
}
