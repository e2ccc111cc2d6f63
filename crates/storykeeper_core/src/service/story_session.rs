//! Editing-session use-case service.
//!
//! # Responsibility
//! - Give UI callers one entry point for dictionary edits, ranking,
//!   spell-check passes, save/load and project export/import.
//! - Keep UI layers decoupled from storage and file format details.
//!
//! # Invariants
//! - The in-memory store is the source of truth until `save` is called.
//! - `import_bytes` replaces the whole project; nothing is merged.

use crate::config::NewProjectConfig;
use crate::context::rank::{ContextIndex, RankedSense};
use crate::model::project::{Brain, Project};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use crate::serializer::project_file::{self, SerializeError};
use crate::spellcheck::{check_text, CancellationToken, CheckError, Misspelling, SpellChecker};
use crate::store::dictionary_store::{DictionaryStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session-level error combining every core failure a UI action can hit.
#[derive(Debug)]
pub enum SessionError {
    /// No brain is active, so a brain-scoped action cannot run.
    NoActiveBrain,
    Store(StoreError),
    Repo(RepoError),
    Serialize(SerializeError),
    Check(CheckError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveBrain => write!(f, "project has no active brain"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "{err}"),
            Self::Check(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoActiveBrain => None,
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Check(err) => Some(err),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SerializeError> for SessionError {
    fn from(value: SerializeError) -> Self {
        Self::Serialize(value)
    }
}

impl From<CheckError> for SessionError {
    fn from(value: CheckError) -> Self {
        Self::Check(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One editing session over a persisted project.
pub struct StorySession<R: ProjectRepository> {
    repo: R,
    store: DictionaryStore,
    dirty: bool,
}

impl<R: ProjectRepository> StorySession<R> {
    /// Loads the stored project, or starts a new one from `defaults`.
    pub fn open(repo: R, defaults: &NewProjectConfig) -> SessionResult<Self> {
        let (project, is_new) = match repo.load_project()? {
            Some(project) => (project, false),
            None => (defaults.build_project(), true),
        };
        info!(
            "event=session_open module=service status=ok new_project={is_new} brains={}",
            project.brains.len()
        );
        Ok(Self {
            repo,
            store: DictionaryStore::new(project),
            dirty: is_new,
        })
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    /// Mutable store access; marks the session as having unsaved edits.
    pub fn store_mut(&mut self) -> &mut DictionaryStore {
        self.dirty = true;
        &mut self.store
    }

    pub fn project(&self) -> &Project {
        self.store.project()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Ranks senses of `word` in the active brain.
    pub fn rank_in_active(
        &self,
        word: &str,
        surrounding_text: &str,
    ) -> SessionResult<Vec<RankedSense>> {
        let brain = self.require_active()?;
        Ok(ContextIndex::new(brain).rank(word, surrounding_text))
    }

    /// Runs a spell-check pass that trusts the active brain's words.
    pub fn check_text_in_active<C: SpellChecker>(
        &self,
        checker: &C,
        text: &str,
        cancel: &CancellationToken,
    ) -> SessionResult<Vec<Misspelling>> {
        let brain = self.require_active()?;
        Ok(check_text(checker, brain, text, cancel)?)
    }

    /// Persists the whole in-memory project.
    pub fn save(&mut self) -> SessionResult<()> {
        self.repo.save_project(self.store.project())?;
        self.dirty = false;
        Ok(())
    }

    pub fn export_bytes(&self) -> SessionResult<Vec<u8>> {
        Ok(project_file::export(self.store.project())?)
    }

    /// Replaces the session project with an imported one.
    ///
    /// On error the current project is left untouched.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> SessionResult<()> {
        let project = project_file::import(bytes)?;
        let previous = self.store.replace_project(project);
        self.dirty = true;
        info!(
            "event=session_import module=service status=ok replaced_brains={} brains={}",
            previous.brains.len(),
            self.store.project().brains.len()
        );
        Ok(())
    }

    fn require_active(&self) -> SessionResult<&Brain> {
        self.store.active_brain().ok_or(SessionError::NoActiveBrain)
    }
}
