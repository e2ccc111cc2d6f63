//! Persistence of whole projects.
//!
//! # Responsibility
//! - Define the save/load contract used by the session service.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - A save is an all-or-nothing project swap, never an incremental update.

pub mod project_repo;
