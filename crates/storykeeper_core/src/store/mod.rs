//! In-memory dictionary storage.
//!
//! # Responsibility
//! - Hold the active project for one editing session.
//! - Expose CRUD operations with semantic errors (`NotFound`, `DuplicateKey`).
//!
//! # Invariants
//! - Persistence is never performed here; see `serializer` and `repo`.

pub mod dictionary_store;
