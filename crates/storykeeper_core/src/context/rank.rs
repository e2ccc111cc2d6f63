//! Contextual ranking of a word's senses.
//!
//! # Responsibility
//! - Order the senses of one word by similarity to surrounding text.
//! - Keep the scoring formula behind the `SenseScorer` seam.
//!
//! # Invariants
//! - Output is sorted by descending score; equal scores keep sense order.
//! - Unknown words and words without senses rank to an empty list.
//! - Ranking never mutates the brain.

use crate::context::tokenize::term_set;
use crate::model::dictionary::{Sense, SenseId};
use crate::model::project::Brain;
use std::collections::BTreeSet;

const CATEGORY_BONUS: f32 = 0.25;

/// One ranked candidate sense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSense {
    pub sense_id: SenseId,
    pub score: f32,
}

/// Scoring strategy comparing surrounding-text terms with one sense.
pub trait SenseScorer {
    fn score(&self, text_terms: &BTreeSet<String>, sense: &Sense) -> f32;
}

/// Set-cosine token overlap with a bonus for an explicit category match.
///
/// Sense terms come from the context notes, definition and category.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapScorer;

impl SenseScorer for TokenOverlapScorer {
    fn score(&self, text_terms: &BTreeSet<String>, sense: &Sense) -> f32 {
        let category_terms = term_set(&sense.category);
        let mut sense_terms = term_set(&sense.context);
        sense_terms.extend(term_set(&sense.definition));
        sense_terms.extend(category_terms.iter().cloned());

        if text_terms.is_empty() || sense_terms.is_empty() {
            return 0.0;
        }

        let shared = text_terms.intersection(&sense_terms).count() as f32;
        let overlap = shared / ((text_terms.len() * sense_terms.len()) as f32).sqrt();

        let bonus = if !category_terms.is_empty() && category_terms.is_subset(text_terms) {
            CATEGORY_BONUS
        } else {
            0.0
        };

        (overlap + bonus).clamp(0.0, 1.0)
    }
}

/// Read-only ranking view over one brain.
pub struct ContextIndex<'brain, S = TokenOverlapScorer> {
    brain: &'brain Brain,
    scorer: S,
}

impl<'brain> ContextIndex<'brain, TokenOverlapScorer> {
    pub fn new(brain: &'brain Brain) -> Self {
        Self::with_scorer(brain, TokenOverlapScorer)
    }
}

impl<'brain, S: SenseScorer> ContextIndex<'brain, S> {
    pub fn with_scorer(brain: &'brain Brain, scorer: S) -> Self {
        Self { brain, scorer }
    }

    /// Ranks the senses of `word` against `surrounding_text`.
    ///
    /// Returns an empty list when the word is unknown or has no senses.
    pub fn rank(&self, word: &str, surrounding_text: &str) -> Vec<RankedSense> {
        let Some(entry) = self.brain.find_word(word) else {
            return Vec::new();
        };
        if entry.senses.is_empty() {
            return Vec::new();
        }

        let text_terms = term_set(surrounding_text);
        let mut ranked = entry
            .senses
            .iter()
            .map(|sense| RankedSense {
                sense_id: sense.id,
                score: self.scorer.score(&text_terms, sense),
            })
            .collect::<Vec<_>>();

        // `sort_by` is stable, so equal scores keep insertion order.
        ranked.sort_by(|left, right| right.score.total_cmp(&left.score));
        ranked
    }

    /// Returns the best-scoring sense, falling back to the primary sense.
    pub fn best_sense(&self, word: &str, surrounding_text: &str) -> Option<&'brain Sense> {
        let top = self.rank(word, surrounding_text).into_iter().next()?;
        self.brain
            .find_word(word)?
            .senses
            .iter()
            .find(|sense| sense.id == top.sense_id)
    }
}
