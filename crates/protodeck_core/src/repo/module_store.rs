//! Storage contracts used by the module service.

use crate::model::document::{Document, DocumentError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from storage collaborators.
#[derive(Debug)]
pub enum StoreError {
    /// No document is stored under this module name.
    NotFound { module: String },
    /// The stored bytes do not form a valid document.
    Malformed { module: String, message: String },
    /// Module name is empty or would escape the data directory.
    InvalidModuleName(String),
    /// Underlying filesystem failure.
    Io { path: PathBuf, source: std::io::Error },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(module: &str, err: DocumentError) -> Self {
        Self::Malformed {
            module: module.to_string(),
            message: err.0,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { module } => write!(f, "module not found: {module}"),
            Self::Malformed { module, message } => {
                write!(f, "module `{module}` is malformed: {message}")
            }
            Self::InvalidModuleName(name) => write!(f, "invalid module name `{name}`"),
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Whole-document load/save by module name.
pub trait ModuleStore: Send + Sync {
    /// Loads and parses the document stored under `module`.
    fn load(&self, module: &str) -> StoreResult<Document>;
    /// Atomically replaces the document stored under `module`.
    fn save(&self, module: &str, document: &Document) -> StoreResult<()>;
}

/// Time-bucketed history of saved documents.
pub trait Archive: Send + Sync {
    fn archive(&self, module: &str, document: &Document) -> StoreResult<()>;
}

/// Severity recorded with a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Success,
    Error,
}

/// Hourly domain journal. Implementations swallow their own failures.
pub trait Journal: Send + Sync {
    fn record(&self, message: &str, severity: Severity);
}
