//! Hour-bucketed document history.

use super::file_store::{validate_module_name, write_atomically};
use super::module_store::{Archive, StoreError, StoreResult};
use crate::identity::{day_bucket, hour_bucket, local_now};
use crate::model::document::Document;
use chrono::{DateTime, TimeZone};
use log::debug;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Writes a snapshot to `<root>/<module>/<Www-Mmm-DD-YYYY>/<hour>.json`.
///
/// Later saves within the same hour replace the earlier snapshot.
#[derive(Debug, Clone)]
pub struct FileArchive {
    root: PathBuf,
}

impl FileArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot path for `module` at `at`.
    pub fn snapshot_path<Tz>(&self, module: &str, at: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.root
            .join(module)
            .join(day_bucket(at))
            .join(format!("{}.json", hour_bucket(at)))
    }

    /// Archives `document` into the bucket for an explicit instant.
    pub fn archive_at<Tz>(
        &self,
        module: &str,
        document: &Document,
        at: &DateTime<Tz>,
    ) -> StoreResult<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        validate_module_name(module)?;
        let path = self.snapshot_path(module, at);
        let bytes = document
            .to_vec()
            .map_err(|err| StoreError::malformed(module, err))?;
        write_atomically(&path, &bytes)?;
        debug!(
            "event=module_archive module=archive status=ok name={} path={}",
            module,
            path.display()
        );
        Ok(path)
    }
}

impl Archive for FileArchive {
    fn archive(&self, module: &str, document: &Document) -> StoreResult<()> {
        self.archive_at(module, document, &local_now()).map(|_| ())
    }
}
