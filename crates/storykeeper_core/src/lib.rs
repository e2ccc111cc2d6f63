//! Core domain logic for StoryKeeper.
//! This crate is the single source of truth for story dictionary invariants.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod serializer;
pub mod service;
pub mod spellcheck;
pub mod store;

pub use config::{ConfigError, CoreConfig, LoggingConfig, NewProjectConfig, StorageConfig};
pub use context::rank::{ContextIndex, RankedSense, SenseScorer, TokenOverlapScorer};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::dictionary::{
    normalize_word_key, BrainId, NewSense, PartOfSpeech, Sense, SenseId, ValidationError, Word,
    WordId,
};
pub use model::project::{Brain, ContextCatalog, Project, ProjectSettings, DEFAULT_CONTEXTS};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use serializer::project_file::{SerializeError, SerializeResult, FORMAT_VERSION};
pub use service::story_session::{SessionError, SessionResult, StorySession};
pub use spellcheck::{check_text, CancellationToken, CheckError, Misspelling, SpellChecker};
pub use store::dictionary_store::{DictionaryStore, EntityRef, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
