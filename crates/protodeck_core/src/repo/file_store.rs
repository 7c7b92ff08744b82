//! JSON-file module store.
//!
//! One document per module at `<data_dir>/<module>.json`.

use super::module_store::{ModuleStore, StoreError, StoreResult};
use crate::model::document::{Document, DocumentKind};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

static MODULE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid module name regex"));

/// Rejects names that are empty or could escape the data directory.
pub fn validate_module_name(module: &str) -> StoreResult<()> {
    if MODULE_NAME_RE.is_match(module) {
        Ok(())
    } else {
        Err(StoreError::InvalidModuleName(module.to_string()))
    }
}

/// Reads a document of shape `kind` from an arbitrary JSON file.
///
/// Used for incoming merge copies that live outside the data directory.
pub fn read_document_file(path: &Path, kind: DocumentKind) -> StoreResult<Document> {
    let label = path.display().to_string();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound { module: label })
        }
        Err(err) => return Err(StoreError::io(path, err)),
    };
    Document::from_slice(kind, &bytes).map_err(|err| StoreError::malformed(&label, err))
}

/// Writes `bytes` next to `path` and renames over it.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    fs::write(&staging, bytes).map_err(|err| StoreError::io(&staging, err))?;
    fs::rename(&staging, path).map_err(|err| StoreError::io(path, err))
}

/// Filesystem-backed [`ModuleStore`].
#[derive(Debug, Clone)]
pub struct FileModuleStore {
    data_dir: PathBuf,
}

impl FileModuleStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the JSON file backing `module`.
    pub fn module_path(&self, module: &str) -> StoreResult<PathBuf> {
        validate_module_name(module)?;
        Ok(self.data_dir.join(format!("{module}.json")))
    }
}

impl ModuleStore for FileModuleStore {
    fn load(&self, module: &str) -> StoreResult<Document> {
        let path = self.module_path(module)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    module: module.to_string(),
                })
            }
            Err(err) => {
                error!(
                    "event=module_load module=store status=error name={} error={}",
                    module, err
                );
                return Err(StoreError::io(path, err));
            }
        };
        Document::from_slice(DocumentKind::for_module(module), &bytes).map_err(|err| {
            error!(
                "event=module_load module=store status=error name={} error_code=malformed",
                module
            );
            StoreError::malformed(module, err)
        })
    }

    fn save(&self, module: &str, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        let path = self.module_path(module)?;
        let bytes = document
            .to_vec()
            .map_err(|err| StoreError::malformed(module, err))?;
        write_atomically(&path, &bytes)?;
        info!(
            "event=module_save module=store status=ok name={} bytes={} duration_ms={}",
            module,
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_module_name, FileModuleStore};
    use crate::model::document::{Document, DocumentKind};
    use crate::repo::module_store::{ModuleStore, StoreError};
    use serde_json::json;

    #[test]
    fn module_names_cannot_traverse() {
        assert!(validate_module_name("issue_owner-2").is_ok());
        for bad in ["", "../secrets", "a/b", "a.json", "a b"] {
            assert!(matches!(
                validate_module_name(bad),
                Err(StoreError::InvalidModuleName(_))
            ));
        }
    }

    #[test]
    fn save_then_load_and_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModuleStore::new(dir.path());
        let document = Document::from_value(
            DocumentKind::Slides,
            json!({"s1": {"id": "1", "name": "s1", "hotspots": []}}),
        )
        .unwrap();

        store.save("issue", &document).unwrap();
        assert_eq!(store.load("issue").unwrap(), document);
        assert!(!dir.path().join("issue.json.tmp").exists());
        assert!(matches!(
            store.load("other"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn unparsable_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("issue.json"), b"{not json").unwrap();
        let store = FileModuleStore::new(dir.path());
        assert!(matches!(
            store.load("issue"),
            Err(StoreError::Malformed { .. })
        ));
    }
}
