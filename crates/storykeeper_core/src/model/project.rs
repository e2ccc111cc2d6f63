//! Brain and project aggregate model.
//!
//! # Responsibility
//! - Group words into per-world brains and brains into one project.
//! - Carry the project-wide context catalogue and settings.
//!
//! # Invariants
//! - Word keys are unique inside a brain; brain names are unique
//!   (case-insensitive) inside a project.
//! - `active_brain`, when set, names a brain owned by the project.
//! - Every id (brain, word, sense) appears once per project.

use crate::model::dictionary::{BrainId, ValidationError, Word};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Context names seeded into every new project.
pub const DEFAULT_CONTEXTS: &[&str] = &[
    "Species",
    "Planet",
    "Language",
    "Culture",
    "Artifact",
    "Event",
    "Location",
    "Organization",
    "Concept",
    "Adjective (race-like)",
];

/// A named dictionary scoped to one fictional world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brain {
    pub id: BrainId,
    pub name: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Brain {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyBrainName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            words: Vec::new(),
        })
    }

    /// Finds a word by raw key, comparing case-insensitively.
    pub fn find_word(&self, raw_key: &str) -> Option<&Word> {
        let key = raw_key.trim().to_lowercase();
        self.words.iter().find(|word| word.key == key)
    }

    pub fn contains_key(&self, raw_key: &str) -> bool {
        self.find_word(raw_key).is_some()
    }

    /// Returns all word keys sorted alphabetically.
    pub fn word_keys(&self) -> Vec<&str> {
        let mut keys = self
            .words
            .iter()
            .map(|word| word.key.as_str())
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }
}

// Brain names collide under the same folding as word keys.
fn brain_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered list of context names offered when tagging senses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextCatalog(Vec<String>);

impl ContextCatalog {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut catalog = Self::default();
        for name in names {
            catalog.add(&name.into());
        }
        catalog
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CONTEXTS.iter().copied())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds a trimmed name; returns `false` when blank or already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    /// Removes a name; returns `false` when it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Renames in place, keeping the entry's position.
    ///
    /// Callers must check that `new_name` is free and non-blank.
    pub(crate) fn rename_at(&mut self, index: usize, new_name: &str) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = new_name.trim().to_string();
        }
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.0.iter().position(|existing| existing == name)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for name in &self.0 {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyContextName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateContext(name.clone()));
            }
        }
        Ok(())
    }
}

/// Project-wide behavior switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Adds a sense's context to the catalogue when the sense is saved.
    #[serde(default)]
    pub auto_learn_contexts: bool,
}

/// Top-level persisted unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    /// Application version that last wrote this project.
    pub version: String,
    #[serde(default)]
    pub active_brain: Option<BrainId>,
    #[serde(default)]
    pub brains: Vec<Brain>,
    #[serde(default)]
    pub contexts: ContextCatalog,
    #[serde(default)]
    pub settings: ProjectSettings,
}

impl Project {
    /// Creates an empty project seeded with the default context catalogue.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: crate::core_version().to_string(),
            active_brain: None,
            brains: Vec::new(),
            contexts: ContextCatalog::with_defaults(),
            settings: ProjectSettings::default(),
        }
    }

    pub fn brain(&self, id: BrainId) -> Option<&Brain> {
        self.brains.iter().find(|brain| brain.id == id)
    }

    pub fn brain_mut(&mut self, id: BrainId) -> Option<&mut Brain> {
        self.brains.iter_mut().find(|brain| brain.id == id)
    }

    /// Finds a brain by name, comparing case-insensitively.
    pub fn brain_by_name(&self, name: &str) -> Option<&Brain> {
        let name = brain_name_key(name);
        self.brains
            .iter()
            .find(|brain| brain_name_key(&brain.name) == name)
    }

    pub fn active(&self) -> Option<&Brain> {
        self.active_brain.and_then(|id| self.brain(id))
    }

    /// Checks every aggregate invariant.
    ///
    /// Import and database load paths call this before handing a project to
    /// callers, so invalid persisted state is rejected rather than masked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut ids = HashSet::new();
        let mut brain_names = HashSet::new();

        for brain in &self.brains {
            if brain.name.trim().is_empty() {
                return Err(ValidationError::EmptyBrainName);
            }
            if !brain_names.insert(brain_name_key(&brain.name)) {
                return Err(ValidationError::DuplicateBrainName(brain.name.clone()));
            }
            if !ids.insert(brain.id) {
                return Err(ValidationError::DuplicateId(brain.id));
            }

            let mut keys = HashSet::new();
            for word in &brain.words {
                word.validate()?;
                if !keys.insert(word.key.as_str()) {
                    return Err(ValidationError::DuplicateWordKey {
                        brain: brain.name.clone(),
                        key: word.key.clone(),
                    });
                }
                if !ids.insert(word.id) {
                    return Err(ValidationError::DuplicateId(word.id));
                }
                for sense in &word.senses {
                    if !ids.insert(sense.id) {
                        return Err(ValidationError::DuplicateId(sense.id));
                    }
                }
            }
        }

        if let Some(active) = self.active_brain {
            if self.brain(active).is_none() {
                return Err(ValidationError::DanglingActiveBrain(active));
            }
        }

        self.contexts.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Brain, ContextCatalog, Project, DEFAULT_CONTEXTS};
    use crate::model::dictionary::{ValidationError, Word};
    use uuid::Uuid;

    #[test]
    fn new_project_is_seeded_with_default_contexts() {
        let project = Project::new("Saga");
        assert_eq!(project.contexts.names().len(), DEFAULT_CONTEXTS.len());
        assert!(project.contexts.contains("Species"));
        assert!(project.active_brain.is_none());
        project.validate().unwrap();
    }

    #[test]
    fn catalog_add_ignores_blank_and_duplicate_names() {
        let mut catalog = ContextCatalog::default();
        assert!(catalog.add(" Galaxy "));
        assert!(!catalog.add("Galaxy"));
        assert!(!catalog.add("   "));
        assert_eq!(catalog.names(), ["Galaxy".to_string()]);
    }

    #[test]
    fn validate_rejects_duplicate_keys_and_dangling_active_brain() {
        let mut project = Project::new("Saga");
        let mut brain = Brain::new("Fantasy1").unwrap();
        brain.words.push(Word::new("bank").unwrap());
        brain.words.push(Word::new("BANK").unwrap());
        project.brains.push(brain);

        assert!(matches!(
            project.validate(),
            Err(ValidationError::DuplicateWordKey { .. })
        ));

        project.brains[0].words.pop();
        project.active_brain = Some(Uuid::new_v4());
        assert!(matches!(
            project.validate(),
            Err(ValidationError::DanglingActiveBrain(_))
        ));
    }

    #[test]
    fn brain_lookup_is_case_insensitive() {
        let mut brain = Brain::new("Fantasy1").unwrap();
        brain.words.push(Word::new("Kaneran").unwrap());
        brain.words.push(Word::new("aether").unwrap());

        assert!(brain.contains_key("KANERAN"));
        assert_eq!(brain.word_keys(), vec!["aether", "kaneran"]);
    }

    #[test]
    fn brain_name_lookup_matches_validation_folding() {
        let mut project = Project::new("Saga");
        project.brains.push(Brain::new("Ärger").unwrap());

        assert!(project.brain_by_name(" ÄRGER ").is_some());
        project.brains.push(Brain::new("ärger").unwrap());
        assert!(matches!(
            project.validate(),
            Err(ValidationError::DuplicateBrainName(_))
        ));
    }
}
