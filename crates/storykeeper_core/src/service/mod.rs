//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, ranking, spell-check and persistence calls into
//!   use-case level APIs for the UI layer.

pub mod story_session;
