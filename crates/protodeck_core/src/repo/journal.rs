//! Hourly JSON journal of domain events.

use super::file_store::write_atomically;
use super::module_store::{Journal, Severity};
use crate::identity::{day_bucket, hour_bucket, local_now};
use chrono::{DateTime, Local};
use log::warn;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// One journal line as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub log: String,
    pub timestamp: DateTime<Local>,
}

/// Appends entries to `<root>/<Www-Mmm-DD-YYYY>/<hour>.json`, a JSON array.
#[derive(Debug)]
pub struct FileJournal {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileJournal {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that collects entries recorded at `at`.
    pub fn bucket_path(&self, at: &DateTime<Local>) -> PathBuf {
        self.root
            .join(day_bucket(at))
            .join(format!("{}.json", hour_bucket(at)))
    }

    /// Reads every entry of the bucket containing `at`. A missing bucket is
    /// empty; an unreadable or malformed one is an error.
    pub fn entries_at(&self, at: &DateTime<Local>) -> io::Result<Vec<JournalEntry>> {
        read_entries(&self.bucket_path(at))
    }

    /// Adds `entry` to its bucket. A bucket that cannot be read back is left
    /// untouched and the entry is dropped.
    fn append(&self, entry: JournalEntry) -> Result<(), String> {
        let _guard = self.write_lock.lock();
        let path = self.bucket_path(&entry.timestamp);
        let mut entries = read_entries(&path)
            .map_err(|err| format!("bucket {} unreadable: {err}", path.display()))?;
        entries.push(entry);
        let bytes = serde_json::to_vec_pretty(&entries).map_err(|err| err.to_string())?;
        write_atomically(&path, &bytes).map_err(|err| err.to_string())
    }
}

fn read_entries(path: &Path) -> io::Result<Vec<JournalEntry>> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

impl Journal for FileJournal {
    fn record(&self, message: &str, severity: Severity) {
        let entry = JournalEntry {
            severity,
            log: message.to_string(),
            timestamp: local_now(),
        };
        if let Err(err) = self.append(entry) {
            warn!(
                "event=journal_write module=journal status=error error={}",
                err
            );
        }
    }
}
