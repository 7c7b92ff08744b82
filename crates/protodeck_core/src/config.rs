//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Derive the on-disk layout (data, archive, journal, diagnostics) from one
//!   data directory.
//! - Apply `PROTODECK_*` environment overrides.
//!
//! # Invariants
//! - Every directory in a loaded config is absolute.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "PROTODECK_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "PROTODECK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PROTODECK_LOG_DIR";

const ARCHIVE_DIR_NAME: &str = "_archive";
const JOURNAL_DIR_NAME: &str = "_log";
const DIAGNOSTICS_DIR_NAME: &str = "_diagnostics";

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// No data directory was given by flag or environment.
    MissingDataDir,
    /// A directory could not be made absolute.
    InvalidPath { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataDir => write!(f, "{DATA_DIR_ENV} is not set"),
            Self::InvalidPath { path, source } => {
                write!(f, "invalid path `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPath { source, .. } => Some(source),
            Self::MissingDataDir => None,
        }
    }
}

/// Directories and log level used by the service and CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Holds one `<module>.json` per module.
    pub data_dir: PathBuf,
    /// Root of hour-bucketed document snapshots.
    pub archive_dir: PathBuf,
    /// Root of the hourly domain journal.
    pub journal_dir: PathBuf,
    /// Rolling diagnostic log files.
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl CoreConfig {
    /// Layout rooted at `data_dir`: `_archive` and `_log` live inside it.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            archive_dir: data_dir.join(ARCHIVE_DIR_NAME),
            journal_dir: data_dir.join(JOURNAL_DIR_NAME),
            log_dir: data_dir.join(DIAGNOSTICS_DIR_NAME),
            log_level: default_log_level().to_string(),
            data_dir,
        }
    }

    /// Loads from `PROTODECK_*` variables, with `data_dir` taking precedence
    /// over `PROTODECK_DATA_DIR` when given.
    pub fn from_env(data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`CoreConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(
        data_dir: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => read(DATA_DIR_ENV)
                .map(PathBuf::from)
                .ok_or(ConfigError::MissingDataDir)?,
        };
        let mut config = Self::for_data_dir(absolute(&data_dir)?);
        config.archive_dir = absolute(&config.archive_dir)?;
        config.journal_dir = absolute(&config.journal_dir)?;
        if let Some(log_dir) = read(LOG_DIR_ENV) {
            config.log_dir = absolute(Path::new(&log_dir))?;
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}
