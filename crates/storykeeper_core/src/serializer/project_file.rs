//! Versioned JSON project file.
//!
//! # Responsibility
//! - Encode a whole project as one portable JSON document.
//! - Decode documents, rejecting malformed, unsupported or newer input.
//!
//! # Invariants
//! - `import(&export(p)?)? == p` for every valid project `p`.
//! - The version field is checked before the body is decoded.
//! - Decoded projects pass `Project::validate()` or are rejected.

use crate::model::project::Project;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Latest project file version written and understood by this build.
pub const FORMAT_VERSION: u32 = 1;

const VERSION_FIELD: &str = "format_version";

pub type SerializeResult<T> = Result<T, SerializeError>;

#[derive(Debug)]
pub enum SerializeError {
    /// Bytes are not a supported project document.
    Format(String),
    /// Document was written by a newer format version.
    VersionMismatch { found: u64, supported: u32 },
    Io(std::io::Error),
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(message) => write!(f, "invalid project file: {message}"),
            Self::VersionMismatch { found, supported } => write!(
                f,
                "project file version {found} is newer than supported {supported}"
            ),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SerializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SerializeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Serialize)]
struct ProjectDocumentRef<'a> {
    format_version: u32,
    project: &'a Project,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectDocument {
    #[allow(dead_code)]
    format_version: u32,
    project: Project,
}

/// Encodes `project` as a pretty-printed JSON document.
pub fn export(project: &Project) -> SerializeResult<Vec<u8>> {
    let document = ProjectDocumentRef {
        format_version: FORMAT_VERSION,
        project,
    };
    serde_json::to_vec_pretty(&document)
        .map_err(|err| SerializeError::Format(format!("failed to encode project: {err}")))
}

/// Decodes a project document.
///
/// # Errors
/// - `VersionMismatch` when the document is newer than [`FORMAT_VERSION`].
/// - `Format` for anything else that is not a valid version-1 project.
pub fn import(bytes: &[u8]) -> SerializeResult<Project> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|err| SerializeError::Format(format!("not a JSON document: {err}")))?;

    let version = read_version(&value)?;
    if version == 0 {
        return Err(SerializeError::Format(
            "format version 0 is not supported".to_string(),
        ));
    }
    if version > u64::from(FORMAT_VERSION) {
        return Err(SerializeError::VersionMismatch {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let document: ProjectDocument = serde_json::from_value(value)
        .map_err(|err| SerializeError::Format(format!("schema mismatch: {err}")))?;
    document
        .project
        .validate()
        .map_err(|err| SerializeError::Format(format!("invalid project data: {err}")))?;
    Ok(document.project)
}

/// Writes the project file next to `path` first, then renames it over
/// `path`, so a failed save leaves the previous file intact.
pub fn export_to_path(project: &Project, path: impl AsRef<Path>) -> SerializeResult<()> {
    let started_at = Instant::now();
    let path = path.as_ref();
    let bytes = export(project)?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let write_result = fs::write(&staging, &bytes).and_then(|()| fs::rename(&staging, path));
    if let Err(err) = write_result {
        let _ = fs::remove_file(&staging);
        error!(
            "event=project_export module=serializer status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    info!(
        "event=project_export module=serializer status=ok duration_ms={} bytes={} brains={}",
        started_at.elapsed().as_millis(),
        bytes.len(),
        project.brains.len()
    );
    Ok(())
}

pub fn import_from_path(path: impl AsRef<Path>) -> SerializeResult<Project> {
    let started_at = Instant::now();
    let bytes = fs::read(path.as_ref())?;
    match import(&bytes) {
        Ok(project) => {
            info!(
                "event=project_import module=serializer status=ok duration_ms={} brains={}",
                started_at.elapsed().as_millis(),
                project.brains.len()
            );
            Ok(project)
        }
        Err(err) => {
            error!(
                "event=project_import module=serializer status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn read_version(value: &serde_json::Value) -> SerializeResult<u64> {
    let field = value
        .as_object()
        .ok_or_else(|| SerializeError::Format("document root must be an object".to_string()))?
        .get(VERSION_FIELD)
        .ok_or_else(|| SerializeError::Format(format!("missing `{VERSION_FIELD}`")))?;
    field.as_u64().ok_or_else(|| {
        SerializeError::Format(format!("`{VERSION_FIELD}` must be an unsigned integer"))
    })
}
