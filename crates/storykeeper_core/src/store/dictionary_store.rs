//! In-memory dictionary store over one project.
//!
//! # Responsibility
//! - Provide brain, word, sense and context-catalogue CRUD for UI callers.
//! - Keep the in-memory project the single source of truth for a session.
//!
//! # Invariants
//! - Mutations are synchronous and visible to the next read.
//! - Word keys collide case-insensitively inside a brain.
//! - Removing a word drops all of its senses.
//! - The active brain cannot be removed.

use crate::model::dictionary::{BrainId, NewSense, Sense, SenseId, ValidationError, Word, WordId};
use crate::model::project::{Brain, Project, ProjectSettings};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Reference to an entity a store call could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Brain(BrainId),
    Word(WordId),
    Sense(SenseId),
    Context(String),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brain(id) => write!(f, "brain {id}"),
            Self::Word(id) => write!(f, "word {id}"),
            Self::Sense(id) => write!(f, "sense {id}"),
            Self::Context(name) => write!(f, "context `{name}`"),
        }
    }
}

/// Store-level error for dictionary mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(EntityRef),
    DuplicateKey(String),
    ActiveBrain(BrainId),
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::DuplicateKey(key) => write!(f, "`{key}` already exists"),
            Self::ActiveBrain(id) => write!(f, "brain {id} is active and cannot be removed"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Dictionary CRUD facade owning one project.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    project: Project,
}

impl DictionaryStore {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    /// Swaps in a whole project, returning the previous one.
    ///
    /// Used after import/load; nothing from the old project is merged.
    pub fn replace_project(&mut self, project: Project) -> Project {
        std::mem::replace(&mut self.project, project)
    }

    /// Adds a brain; the first brain of a project without one becomes active.
    pub fn add_brain(&mut self, name: &str) -> StoreResult<BrainId> {
        let brain = Brain::new(name)?;
        if self.project.brain_by_name(&brain.name).is_some() {
            return Err(StoreError::DuplicateKey(brain.name));
        }

        let id = brain.id;
        self.project.brains.push(brain);
        if self.project.active_brain.is_none() {
            self.project.active_brain = Some(id);
        }
        debug!("event=brain_add module=store status=ok brain_id={id}");
        Ok(id)
    }

    pub fn remove_brain(&mut self, brain_id: BrainId) -> StoreResult<()> {
        if self.project.active_brain == Some(brain_id) {
            return Err(StoreError::ActiveBrain(brain_id));
        }
        let index = self
            .project
            .brains
            .iter()
            .position(|brain| brain.id == brain_id)
            .ok_or(StoreError::NotFound(EntityRef::Brain(brain_id)))?;
        self.project.brains.remove(index);
        debug!("event=brain_remove module=store status=ok brain_id={brain_id}");
        Ok(())
    }

    pub fn set_active_brain(&mut self, brain_id: BrainId) -> StoreResult<()> {
        self.require_brain(brain_id)?;
        self.project.active_brain = Some(brain_id);
        Ok(())
    }

    pub fn active_brain(&self) -> Option<&Brain> {
        self.project.active()
    }

    pub fn brain(&self, brain_id: BrainId) -> StoreResult<&Brain> {
        self.require_brain(brain_id)
    }

    pub fn add_word(&mut self, brain_id: BrainId, raw_key: &str) -> StoreResult<WordId> {
        let word = Word::new(raw_key)?;
        let brain = self
            .project
            .brain_mut(brain_id)
            .ok_or(StoreError::NotFound(EntityRef::Brain(brain_id)))?;
        if brain.contains_key(&word.key) {
            return Err(StoreError::DuplicateKey(word.key));
        }

        let id = word.id;
        brain.words.push(word);
        debug!("event=word_add module=store status=ok brain_id={brain_id} word_id={id}");
        Ok(id)
    }

    /// Removes a word together with every one of its senses.
    pub fn remove_word(&mut self, word_id: WordId) -> StoreResult<()> {
        for brain in &mut self.project.brains {
            if let Some(index) = brain.words.iter().position(|word| word.id == word_id) {
                let removed = brain.words.remove(index);
                debug!(
                    "event=word_remove module=store status=ok word_id={word_id} senses={}",
                    removed.senses.len()
                );
                return Ok(());
            }
        }
        Err(StoreError::NotFound(EntityRef::Word(word_id)))
    }

    pub fn word(&self, word_id: WordId) -> StoreResult<&Word> {
        self.project
            .brains
            .iter()
            .flat_map(|brain| brain.words.iter())
            .find(|word| word.id == word_id)
            .ok_or(StoreError::NotFound(EntityRef::Word(word_id)))
    }

    /// Looks a word up by raw key inside one brain.
    pub fn find_word(&self, brain_id: BrainId, raw_key: &str) -> StoreResult<Option<&Word>> {
        Ok(self.require_brain(brain_id)?.find_word(raw_key))
    }

    /// Lists words of one brain sorted by key.
    pub fn list_words(&self, brain_id: BrainId) -> StoreResult<Vec<&Word>> {
        let brain = self.require_brain(brain_id)?;
        let mut words = brain.words.iter().collect::<Vec<_>>();
        words.sort_by(|left, right| left.key.cmp(&right.key));
        Ok(words)
    }

    /// Appends a sense to a word. With auto-learn enabled, a non-empty
    /// context is also added to the project's context catalogue.
    pub fn add_sense(&mut self, word_id: WordId, fields: NewSense) -> StoreResult<SenseId> {
        let sense = Sense::new(fields)?;
        let auto_learn = self.project.settings.auto_learn_contexts;
        let word = self.word_mut(word_id)?;

        let id = sense.id;
        let context = sense.context.clone();
        word.senses.push(sense);

        if auto_learn && !context.is_empty() && self.project.contexts.add(&context) {
            debug!("event=context_learn module=store status=ok sense_id={id}");
        }
        debug!("event=sense_add module=store status=ok word_id={word_id} sense_id={id}");
        Ok(id)
    }

    /// Replaces every editable field of a sense, keeping its id and position.
    pub fn update_sense(&mut self, sense_id: SenseId, fields: NewSense) -> StoreResult<()> {
        let replacement = Sense::with_id(sense_id, fields)?;
        let slot = self
            .project
            .brains
            .iter_mut()
            .flat_map(|brain| brain.words.iter_mut())
            .flat_map(|word| word.senses.iter_mut())
            .find(|sense| sense.id == sense_id)
            .ok_or(StoreError::NotFound(EntityRef::Sense(sense_id)))?;
        *slot = replacement;
        Ok(())
    }

    /// Removes one meaning; the word itself stays even with zero senses.
    pub fn remove_sense(&mut self, sense_id: SenseId) -> StoreResult<()> {
        for word in self
            .project
            .brains
            .iter_mut()
            .flat_map(|brain| brain.words.iter_mut())
        {
            if let Some(index) = word.senses.iter().position(|sense| sense.id == sense_id) {
                word.senses.remove(index);
                return Ok(());
            }
        }
        Err(StoreError::NotFound(EntityRef::Sense(sense_id)))
    }

    /// Returns senses in insertion order; empty when the word has none.
    pub fn list_senses(&self, word_id: WordId) -> StoreResult<Vec<Sense>> {
        Ok(self.word(word_id)?.senses.clone())
    }

    pub fn contexts(&self) -> &[String] {
        self.project.contexts.names()
    }

    /// Adds a context name; existing names are left untouched.
    pub fn add_context(&mut self, name: &str) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyContextName.into());
        }
        self.project.contexts.add(name);
        Ok(())
    }

    pub fn rename_context(&mut self, old_name: &str, new_name: &str) -> StoreResult<()> {
        if new_name.trim().is_empty() {
            return Err(ValidationError::EmptyContextName.into());
        }
        let index = self
            .project
            .contexts
            .position(old_name)
            .ok_or_else(|| StoreError::NotFound(EntityRef::Context(old_name.trim().to_string())))?;
        match self.project.contexts.position(new_name) {
            Some(existing) if existing != index => {
                return Err(StoreError::DuplicateKey(new_name.trim().to_string()));
            }
            _ => {}
        }
        self.project.contexts.rename_at(index, new_name);
        Ok(())
    }

    pub fn remove_context(&mut self, name: &str) -> StoreResult<()> {
        if self.project.contexts.remove(name) {
            Ok(())
        } else {
            Err(StoreError::NotFound(EntityRef::Context(
                name.trim().to_string(),
            )))
        }
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.project.settings
    }

    pub fn set_auto_learn_contexts(&mut self, enabled: bool) {
        self.project.settings.auto_learn_contexts = enabled;
    }

    fn require_brain(&self, brain_id: BrainId) -> StoreResult<&Brain> {
        self.project
            .brain(brain_id)
            .ok_or(StoreError::NotFound(EntityRef::Brain(brain_id)))
    }

    fn word_mut(&mut self, word_id: WordId) -> StoreResult<&mut Word> {
        self.project
            .brains
            .iter_mut()
            .flat_map(|brain| brain.words.iter_mut())
            .find(|word| word.id == word_id)
            .ok_or(StoreError::NotFound(EntityRef::Word(word_id)))
    }
}

impl Default for DictionaryStore {
    fn default() -> Self {
        Self::new(Project::new("Untitled"))
    }
}

