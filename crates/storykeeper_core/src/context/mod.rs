//! Contextual disambiguation of dictionary words.
//!
//! # Responsibility
//! - Rank a word's senses against the text surrounding it.
//! - Provide the tokenizer used by ranking and spell-check passes.

pub mod rank;
pub mod tokenize;
