//! StoryKeeper command-line probe.
//!
//! # Responsibility
//! - Exercise `storykeeper_core` without the desktop UI: health check,
//!   project export/import, word listing and sense ranking.
//! - Keep output plain and deterministic for quick local checks.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use storykeeper_core::db::open_db;
use storykeeper_core::serializer::project_file;
use storykeeper_core::{
    init_from_config, CoreConfig, DictionaryStore, ProjectRepository, SqliteProjectRepository,
    StorySession,
};

/// StoryKeeper dictionary tools
#[derive(Parser)]
#[command(name = "storykeeper")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "STORYKEEPER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project database (overrides `storage.database_path`)
    #[arg(long, global = true, value_name = "DB")]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "STORYKEEPER_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core health and version
    Ping,
    /// Write the stored project to a project file
    Export {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Replace the stored project with a project file
    Import {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// List the words of a brain (the active brain by default)
    Words {
        #[arg(long)]
        brain: Option<String>,
    },
    /// Rank the senses of a word in the active brain against some text
    Rank {
        #[arg(long)]
        word: String,
        #[arg(long)]
        text: String,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::Words { .. } => "words",
            Self::Rank { .. } => "rank",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(db) = cli.db {
        config.storage.database_path = db;
    }
    config.validate()?;
    init_from_config(&config.logging).map_err(|err| anyhow!(err))?;

    let command_name = cli.command.name();
    match cli.command {
        Commands::Ping => {
            println!("storykeeper_core ping={}", storykeeper_core::ping());
            println!("storykeeper_core version={}", storykeeper_core::core_version());
        }
        Commands::Export { out } => {
            let mut conn = open_db(&config.storage.database_path)?;
            let repo = SqliteProjectRepository::try_new(&mut conn)?;
            let project = repo
                .load_project()?
                .context("database holds no saved project")?;
            project_file::export_to_path(&project, &out)?;
            println!("exported {} brain(s) to {}", project.brains.len(), out.display());
        }
        Commands::Import { file } => {
            let project = project_file::import_from_path(&file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let mut conn = open_db(&config.storage.database_path)?;
            let mut repo = SqliteProjectRepository::try_new(&mut conn)?;
            repo.save_project(&project)?;
            println!(
                "imported `{}` with {} brain(s)",
                project.title,
                project.brains.len()
            );
        }
        Commands::Words { brain } => {
            let mut conn = open_db(&config.storage.database_path)?;
            let repo = SqliteProjectRepository::try_new(&mut conn)?;
            let session = StorySession::open(repo, &config.project)?;
            for line in word_listing(session.store(), brain.as_deref())? {
                println!("{line}");
            }
        }
        Commands::Rank { word, text } => {
            let mut conn = open_db(&config.storage.database_path)?;
            let repo = SqliteProjectRepository::try_new(&mut conn)?;
            let session = StorySession::open(repo, &config.project)?;
            let ranked = session.rank_in_active(&word, &text)?;
            if ranked.is_empty() {
                println!("no senses for `{word}`");
            }
            for item in ranked {
                let sense = session.store().project().active().and_then(|brain| {
                    brain
                        .find_word(&word)
                        .and_then(|entry| entry.senses.iter().find(|s| s.id == item.sense_id))
                });
                if let Some(sense) = sense {
                    println!("{:.3}  [{}] {}", item.score, sense.category, sense.definition);
                }
            }
        }
    }

    info!("event=cli_command module=cli status=ok command={command_name}");
    Ok(())
}

/// Words of `brain` (the active brain when `None`) sorted by key, each
/// followed by its numbered senses.
fn word_listing(store: &DictionaryStore, brain: Option<&str>) -> Result<Vec<String>> {
    let selected = match brain {
        Some(name) => store.project().brain_by_name(name),
        None => store.active_brain(),
    };
    let Some(selected) = selected else {
        bail!("brain not found");
    };

    let mut lines = Vec::new();
    for word in store.list_words(selected.id)? {
        lines.push(format!("{} ({} sense(s))", word.key, word.senses.len()));
        for (index, sense) in word.senses.iter().enumerate() {
            lines.push(format!("  ({}) [{}] {}", index + 1, sense.category, sense.definition));
        }
    }
    Ok(lines)
}
