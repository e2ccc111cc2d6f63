//! Project export and import.
//!
//! # Responsibility
//! - Convert a whole project to and from its portable file format.
//!
//! # Invariants
//! - Import never merges; callers replace their project wholesale.

pub mod project_file;
