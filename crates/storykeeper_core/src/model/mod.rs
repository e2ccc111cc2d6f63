//! Story dictionary domain model.
//!
//! # Responsibility
//! - Define words, senses, brains and projects shared by every core layer.
//! - Own validation of record-level and aggregate invariants.
//!
//! # Invariants
//! - Every word, sense and brain is identified by a stable UUID.
//! - A project owns its brains exclusively; a brain owns its words.

pub mod dictionary;
pub mod project;
