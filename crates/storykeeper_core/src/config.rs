//! Core configuration.
//!
//! # Responsibility
//! - Describe logging, storage and new-project defaults in one TOML file.
//! - Validate values before any subsystem is initialized with them.
//!
//! # Invariants
//! - Every section and field is optional; omitted values fall back to
//!   `CoreConfig::default()`.
//! - Unknown keys are rejected so typos surface early.

use crate::logging::{default_log_level, normalize_level};
use crate::model::project::{ContextCatalog, Project, DEFAULT_CONTEXTS};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "storykeeper_dictionary.db";
pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Story";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config TOML: {err}"),
            Self::Invalid(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files; `None` keeps logging off.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

/// Defaults applied when a session starts a brand-new project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewProjectConfig {
    pub title: String,
    pub auto_learn_contexts: bool,
    pub default_contexts: Vec<String>,
}

impl Default for NewProjectConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_PROJECT_TITLE.to_string(),
            auto_learn_contexts: false,
            default_contexts: DEFAULT_CONTEXTS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl NewProjectConfig {
    /// Builds an empty project carrying these defaults.
    pub fn build_project(&self) -> Project {
        let mut project = Project::new(self.title.clone());
        project.contexts = ContextCatalog::new(self.default_contexts.iter().cloned());
        project.settings.auto_learn_contexts = self.auto_learn_contexts;
        project
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub project: NewProjectConfig,
}

impl CoreConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.logging.level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.database_path cannot be empty".to_string(),
            ));
        }
        if self
            .project
            .default_contexts
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "project.default_contexts cannot contain blank names".to_string(),
            ));
        }
        Ok(())
    }
}
