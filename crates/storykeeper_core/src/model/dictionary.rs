//! Word and sense domain model.
//!
//! # Responsibility
//! - Define the dictionary records a writer edits: words and their senses.
//! - Normalize word keys and validate sense fields before they enter a brain.
//!
//! # Invariants
//! - `Word::key` is trimmed and lowercased; it is never empty.
//! - `Sense::category` and `Sense::definition` are never blank.
//! - Sense order inside a word is insertion order; index 0 is the default.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a brain.
pub type BrainId = Uuid;
/// Stable identifier of a word inside any brain of a project.
pub type WordId = Uuid;
/// Stable identifier of a single sense.
pub type SenseId = Uuid;

/// Grammatical role recorded alongside a sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Other,
}

impl PartOfSpeech {
    /// Stable lowercase label, shared by the project file and SQLite rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Pronoun => "pronoun",
            Self::Other => "other",
        }
    }

    /// Parses a label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "noun" => Some(Self::Noun),
            "verb" => Some(Self::Verb),
            "adjective" => Some(Self::Adjective),
            "adverb" => Some(Self::Adverb),
            "pronoun" => Some(Self::Pronoun),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Validation failures for dictionary and project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyWordKey,
    NonCanonicalWordKey(String),
    EmptyBrainName,
    EmptyCategory,
    EmptyDefinition,
    EmptyContextName,
    DuplicateWordKey { brain: String, key: String },
    DuplicateBrainName(String),
    DuplicateContext(String),
    DuplicateId(Uuid),
    DanglingActiveBrain(BrainId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWordKey => write!(f, "word key cannot be empty"),
            Self::NonCanonicalWordKey(key) => {
                write!(f, "word key `{key}` is not trimmed lowercase")
            }
            Self::EmptyBrainName => write!(f, "brain name cannot be empty"),
            Self::EmptyCategory => write!(f, "sense category cannot be empty"),
            Self::EmptyDefinition => write!(f, "sense definition cannot be empty"),
            Self::EmptyContextName => write!(f, "context name cannot be empty"),
            Self::DuplicateWordKey { brain, key } => {
                write!(f, "word `{key}` appears more than once in brain `{brain}`")
            }
            Self::DuplicateBrainName(name) => write!(f, "brain name `{name}` is not unique"),
            Self::DuplicateContext(name) => write!(f, "context `{name}` is listed twice"),
            Self::DuplicateId(id) => write!(f, "identifier {id} is used more than once"),
            Self::DanglingActiveBrain(id) => {
                write!(f, "active brain {id} does not exist in project")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns the canonical dictionary key for raw user input.
///
/// Keys compare case-insensitively, so the stored form is trimmed lowercase.
pub fn normalize_word_key(raw: &str) -> Result<String, ValidationError> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return Err(ValidationError::EmptyWordKey);
    }
    Ok(key)
}

/// Editable sense fields, used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSense {
    pub category: String,
    pub definition: String,
    pub context: String,
    pub part_of_speech: Option<PartOfSpeech>,
}

impl NewSense {
    pub fn new(category: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            definition: definition.into(),
            context: String::new(),
            part_of_speech: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_part_of_speech(mut self, part_of_speech: PartOfSpeech) -> Self {
        self.part_of_speech = Some(part_of_speech);
        self
    }
}

/// One meaning of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub id: SenseId,
    /// Open category label such as `Geography` or `Species`.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<PartOfSpeech>,
    pub definition: String,
    /// Free-form notes describing where this meaning applies.
    #[serde(default)]
    pub context: String,
}

impl Sense {
    /// Builds a sense with a generated id from trimmed input fields.
    pub fn new(fields: NewSense) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), fields)
    }

    /// Builds a sense with a caller-provided id.
    ///
    /// Used when replacing the fields of an existing sense in place.
    pub fn with_id(id: SenseId, fields: NewSense) -> Result<Self, ValidationError> {
        let sense = Self {
            id,
            category: fields.category.trim().to_string(),
            part_of_speech: fields.part_of_speech,
            definition: fields.definition.trim().to_string(),
            context: fields.context.trim().to_string(),
        };
        sense.validate()?;
        Ok(sense)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if self.definition.trim().is_empty() {
            return Err(ValidationError::EmptyDefinition);
        }
        Ok(())
    }
}

/// A dictionary entry and its ordered senses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub key: String,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

impl Word {
    /// Creates an empty word with a generated id and canonical key.
    pub fn new(raw_key: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            key: normalize_word_key(raw_key)?,
            senses: Vec::new(),
        })
    }

    /// Returns the sense at 1-based `sense_number`, the numbering writers see.
    pub fn sense_by_number(&self, sense_number: usize) -> Option<&Sense> {
        sense_number
            .checked_sub(1)
            .and_then(|index| self.senses.get(index))
    }

    /// Returns the default (first) sense.
    pub fn primary_sense(&self) -> Option<&Sense> {
        self.senses.first()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let canonical = normalize_word_key(&self.key)?;
        if canonical != self.key {
            return Err(ValidationError::NonCanonicalWordKey(self.key.clone()));
        }
        for sense in &self.senses {
            sense.validate()?;
        }
        Ok(())
    }
}
