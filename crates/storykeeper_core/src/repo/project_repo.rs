//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Save and load a whole project to/from the project database.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_project` replaces every stored row in one transaction.
//! - Load order follows the persisted `position` columns.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::dictionary::{PartOfSpeech, Sense, ValidationError, Word};
use crate::model::project::{Brain, ContextCatalog, Project, ProjectSettings};
use log::{error, info};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

const SETTING_AUTO_LEARN_CONTEXTS: &str = "auto_learn_contexts";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match {expected_version}; open it with `open_db`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-project persistence contract.
pub trait ProjectRepository {
    /// Atomically replaces the stored project.
    fn save_project(&mut self, project: &Project) -> RepoResult<()>;
    /// Loads the stored project, or `None` for a fresh database.
    fn load_project(&self) -> RepoResult<Option<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let actual_version = schema_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn save_project(&mut self, project: &Project) -> RepoResult<()> {
        project.validate()?;
        let started_at = Instant::now();

        let tx = self.conn.transaction()?;
        if let Err(err) = write_project(&tx, project) {
            error!(
                "event=project_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
        tx.commit()?;

        info!(
            "event=project_save module=repo status=ok duration_ms={} brains={}",
            started_at.elapsed().as_millis(),
            project.brains.len()
        );
        Ok(())
    }

    fn load_project(&self) -> RepoResult<Option<Project>> {
        let conn: &Connection = self.conn;
        let meta = conn.query_row(
            "SELECT title, version, active_brain FROM project_meta WHERE id = 1;",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        );
        let (title, version, active_brain) = match meta {
            Ok(meta) => meta,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut project = Project {
            title,
            version,
            active_brain: active_brain.as_deref().map(parse_uuid).transpose()?,
            brains: load_brains(conn)?,
            contexts: load_contexts(conn)?,
            settings: load_settings(conn)?,
        };
        load_words_into(conn, &mut project.brains)?;

        project
            .validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        Ok(Some(project))
    }
}

fn write_project(tx: &Transaction<'_>, project: &Project) -> RepoResult<()> {
    // Senses and words go with their brains through ON DELETE CASCADE.
    tx.execute_batch(
        "DELETE FROM brains;
         DELETE FROM contexts;
         DELETE FROM settings;
         DELETE FROM project_meta;",
    )?;

    tx.execute(
        "INSERT INTO project_meta (id, title, version, active_brain) VALUES (1, ?1, ?2, ?3);",
        params![
            project.title,
            project.version,
            project.active_brain.map(|id| id.to_string()),
        ],
    )?;

    let mut insert_brain =
        tx.prepare("INSERT INTO brains (uuid, position, name) VALUES (?1, ?2, ?3);")?;
    let mut insert_word =
        tx.prepare("INSERT INTO words (uuid, brain_uuid, position, key) VALUES (?1, ?2, ?3, ?4);")?;
    let mut insert_sense = tx.prepare(
        "INSERT INTO senses (uuid, word_uuid, position, category, part_of_speech, definition, context)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;

    for (brain_pos, brain) in project.brains.iter().enumerate() {
        let brain_uuid = brain.id.to_string();
        insert_brain.execute(params![brain_uuid, brain_pos as i64, brain.name])?;

        for (word_pos, word) in brain.words.iter().enumerate() {
            let word_uuid = word.id.to_string();
            insert_word.execute(params![word_uuid, brain_uuid, word_pos as i64, word.key])?;

            for (sense_pos, sense) in word.senses.iter().enumerate() {
                insert_sense.execute(params![
                    sense.id.to_string(),
                    word_uuid,
                    sense_pos as i64,
                    sense.category,
                    sense.part_of_speech.map(PartOfSpeech::as_str),
                    sense.definition,
                    sense.context,
                ])?;
            }
        }
    }

    let mut insert_context = tx.prepare("INSERT INTO contexts (position, name) VALUES (?1, ?2);")?;
    for (position, name) in project.contexts.names().iter().enumerate() {
        insert_context.execute(params![position as i64, name])?;
    }

    tx.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2);",
        params![
            SETTING_AUTO_LEARN_CONTEXTS,
            bool_to_setting(project.settings.auto_learn_contexts)
        ],
    )?;

    Ok(())
}

fn load_brains(conn: &Connection) -> RepoResult<Vec<Brain>> {
    let mut stmt = conn.prepare("SELECT uuid, name FROM brains ORDER BY position ASC;")?;
    let mut rows = stmt.query([])?;
    let mut brains = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        brains.push(Brain {
            id: parse_uuid(&uuid_text)?,
            name: row.get("name")?,
            words: Vec::new(),
        });
    }
    Ok(brains)
}

fn load_words_into(conn: &Connection, brains: &mut [Brain]) -> RepoResult<()> {
    let brain_index = brains
        .iter()
        .enumerate()
        .map(|(index, brain)| (brain.id, index))
        .collect::<HashMap<_, _>>();
    let mut word_index = HashMap::new();

    let mut stmt =
        conn.prepare("SELECT uuid, brain_uuid, key FROM words ORDER BY brain_uuid, position ASC;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let word_id = parse_uuid(&row.get::<_, String>("uuid")?)?;
        let brain_id = parse_uuid(&row.get::<_, String>("brain_uuid")?)?;
        let &brain_pos = brain_index
            .get(&brain_id)
            .ok_or_else(|| RepoError::InvalidData(format!("word {word_id} has no brain")))?;

        let words = &mut brains[brain_pos].words;
        word_index.insert(word_id, (brain_pos, words.len()));
        words.push(Word {
            id: word_id,
            key: row.get("key")?,
            senses: Vec::new(),
        });
    }

    let mut stmt = conn.prepare(
        "SELECT uuid, word_uuid, category, part_of_speech, definition, context
         FROM senses
         ORDER BY word_uuid, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let sense_id = parse_uuid(&row.get::<_, String>("uuid")?)?;
        let word_id = parse_uuid(&row.get::<_, String>("word_uuid")?)?;
        let &(brain_pos, word_pos) = word_index
            .get(&word_id)
            .ok_or_else(|| RepoError::InvalidData(format!("sense {sense_id} has no word")))?;

        let part_of_speech = match row.get::<_, Option<String>>("part_of_speech")? {
            Some(value) => Some(PartOfSpeech::parse(&value).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid part of speech `{value}` in senses.part_of_speech"
                ))
            })?),
            None => None,
        };

        brains[brain_pos].words[word_pos].senses.push(Sense {
            id: sense_id,
            category: row.get("category")?,
            part_of_speech,
            definition: row.get("definition")?,
            context: row.get("context")?,
        });
    }

    Ok(())
}

fn load_contexts(conn: &Connection) -> RepoResult<ContextCatalog> {
    let mut stmt = conn.prepare("SELECT name FROM contexts ORDER BY position ASC;")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ContextCatalog::new(names))
}

fn load_settings(conn: &Connection) -> RepoResult<ProjectSettings> {
    let mut settings = ProjectSettings::default();
    let mut stmt = conn.prepare("SELECT key, value FROM settings;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let key: String = row.get("key")?;
        let value: String = row.get("value")?;
        if key == SETTING_AUTO_LEARN_CONTEXTS {
            settings.auto_learn_contexts = parse_setting_bool(&value).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid value `{value}` for setting `{key}`"))
            })?;
        }
    }
    Ok(settings)
}

fn parse_uuid(value: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}`")))
}

fn bool_to_setting(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_setting_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
