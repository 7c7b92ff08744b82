//! Module use-case service.
//!
//! # Responsibility
//! - Expose every point mutation, merge and normalization as one locked
//!   load/apply/save cycle on the module the request addresses.
//! - Emit `event=` diagnostics and journal entries for each cycle.
//!
//! # Invariants
//! - The module is taken from the request's `file` field and its name is
//!   validated before any lock is taken.
//! - Merges read the incoming copy inside the same lock as the live copy.
//! - A merge or normalization that changes nothing is not saved or archived.

use super::locks::ModuleLocks;
use crate::config::CoreConfig;
use crate::engine::address::AddressFields;
use crate::engine::error::{EngineError, EngineResult, Missing};
use crate::engine::merge::merge_documents;
use crate::engine::mutate::MutationEngine;
use crate::engine::normalize::{normalize_document, NormalizeReport};
use crate::engine::request::{
    CommentKey, CommentRequest, DrawerRequest, GlobalHotspotRequest, HotspotRequest,
    StatusRequest,
};
use crate::model::document::{Document, DocumentKind};
use crate::repo::archive::FileArchive;
use crate::repo::file_store::{read_document_file, validate_module_name, FileModuleStore};
use crate::repo::journal::FileJournal;
use crate::repo::module_store::{Archive, Journal, ModuleStore, Severity, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for module use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Resolution or mutation failed; nothing was saved.
    Engine(EngineError),
    /// Loading or saving failed.
    Store(StoreError),
}

impl ServiceError {
    /// True when a module or an addressed entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Engine(err) => err.is_not_found(),
            Self::Store(err) => matches!(err, StoreError::NotFound { .. }),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a merge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// `false` when the live module already contained everything.
    pub changed: bool,
}

/// Module service facade over storage collaborators.
pub struct ModuleService<S: ModuleStore, A: Archive, J: Journal> {
    store: S,
    archive: A,
    journal: J,
    engine: MutationEngine,
    locks: ModuleLocks,
}

/// Service over the JSON-file collaborators.
pub type FileModuleService = ModuleService<FileModuleStore, FileArchive, FileJournal>;

impl FileModuleService {
    /// Builds the filesystem-backed service for `config`'s layout.
    pub fn open(config: &CoreConfig) -> Self {
        Self::new(
            FileModuleStore::new(&config.data_dir),
            FileArchive::new(&config.archive_dir),
            FileJournal::new(&config.journal_dir),
        )
    }
}

impl<S: ModuleStore, A: Archive, J: Journal> ModuleService<S, A, J> {
    /// Creates a service with GUID ids and the system clock.
    pub fn new(store: S, archive: A, journal: J) -> Self {
        Self::with_engine(store, archive, journal, MutationEngine::default())
    }

    /// Creates a service with an explicit mutation engine.
    pub fn with_engine(store: S, archive: A, journal: J, engine: MutationEngine) -> Self {
        Self {
            store,
            archive,
            journal,
            engine,
            locks: ModuleLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads a module under its lock.
    pub fn load_module(&self, module: &str) -> ServiceResult<Document> {
        validate_module_name(module)?;
        let loaded = {
            let lock = self.locks.handle(module);
            let _guard = lock.lock();
            self.store.load(module)
        };
        self.locks.release(module);
        Ok(loaded?)
    }

    /// Number of modules with a cycle in flight.
    pub fn modules_in_flight(&self) -> usize {
        self.locks.len()
    }

    pub fn add_hotspot(&self, request: &HotspotRequest) -> ServiceResult<String> {
        self.mutate("add_hotspot", &request.address, |engine, document| {
            engine.add_hotspot(document, request)
        })
    }

    pub fn add_global_hotspot(&self, request: &GlobalHotspotRequest) -> ServiceResult<()> {
        self.mutate("add_global_hotspot", &request.address, |engine, document| {
            engine.add_global_hotspot(document, request)
        })
    }

    /// Updates a unique hotspot, or a registry master when `file == "global"`.
    pub fn update_hotspot(&self, request: &HotspotRequest) -> ServiceResult<()> {
        self.mutate("update_hotspot", &request.address, |engine, document| {
            engine.update_hotspot(document, request)
        })
    }

    pub fn delete_global_hotspot(&self, request: &GlobalHotspotRequest) -> ServiceResult<()> {
        self.mutate(
            "delete_global_hotspot",
            &request.address,
            |engine, document| engine.delete_global_hotspot(document, request),
        )
    }

    pub fn add_comment(&self, request: &CommentRequest) -> ServiceResult<String> {
        self.mutate("add_comment", &request.address, |engine, document| {
            engine.add_comment(document, request)
        })
    }

    pub fn update_comment(&self, request: &CommentRequest) -> ServiceResult<()> {
        self.mutate("update_comment", &request.address, |engine, document| {
            engine.update_comment(document, request)
        })
    }

    pub fn delete_comment(&self, request: &CommentKey) -> ServiceResult<()> {
        self.mutate("delete_comment", &request.address, |engine, document| {
            engine.delete_comment(document, request)
        })
    }

    pub fn update_status(&self, request: &StatusRequest) -> ServiceResult<()> {
        self.mutate("update_status", &request.address, |engine, document| {
            engine.update_status(document, request)
        })
    }

    pub fn update_drawer(&self, request: &DrawerRequest) -> ServiceResult<()> {
        self.mutate("update_drawer", &request.address, |engine, document| {
            engine.update_drawer(document, request)
        })
    }

    /// Merges an in-memory copy into the live module.
    pub fn merge_document(&self, module: &str, incoming: Document) -> ServiceResult<MergeSummary> {
        self.merge_with(module, |_| Ok(incoming))
    }

    /// Merges the JSON file at `path` into the live module.
    ///
    /// The file is parsed with the shape implied by `module`.
    pub fn merge_file(&self, module: &str, path: &Path) -> ServiceResult<MergeSummary> {
        self.merge_with(module, |kind| Ok(read_document_file(path, kind)?))
    }

    /// Assigns missing ids and rewrites addressing fields across a module.
    pub fn normalize_module(&self, module: &str) -> ServiceResult<NormalizeReport> {
        let ids = self.engine.ids();
        self.cycle(module, "normalize", |document| {
            let before = document.clone();
            let report = normalize_document(document, module, ids);
            let changed = *document != before;
            Ok((report, changed))
        })
    }

    fn merge_with(
        &self,
        module: &str,
        incoming: impl FnOnce(DocumentKind) -> ServiceResult<Document>,
    ) -> ServiceResult<MergeSummary> {
        self.cycle(module, "merge", |document| {
            let incoming = incoming(document.kind())?;
            let existing = std::mem::replace(document, Document::empty(incoming.kind()));
            let outcome = merge_documents(existing, incoming)?;
            *document = outcome.document;
            Ok((
                MergeSummary {
                    changed: outcome.changed,
                },
                outcome.changed,
            ))
        })
    }

    fn mutate<T>(
        &self,
        event: &'static str,
        address: &AddressFields,
        apply: impl FnOnce(&MutationEngine, &mut Document) -> EngineResult<T>,
    ) -> ServiceResult<T> {
        let module = address.file.trim();
        if module.is_empty() {
            let err = ServiceError::from(EngineError::not_found(Missing::Module, address));
            error!(
                "event={} module=service status=error error_code=missing_module",
                event
            );
            return Err(err);
        }
        self.cycle(module, event, |document| {
            Ok((apply(&self.engine, document)?, true))
        })
    }

    /// Runs load, `apply`, and (when `apply` reports a change) save and
    /// snapshot, all under the module's lock.
    fn cycle<T>(
        &self,
        module: &str,
        event: &'static str,
        apply: impl FnOnce(&mut Document) -> ServiceResult<(T, bool)>,
    ) -> ServiceResult<T> {
        let started_at = Instant::now();
        let result = validate_module_name(module)
            .map_err(ServiceError::from)
            .and_then(|()| {
                let lock = self.locks.handle(module);
                let _guard = lock.lock();
                self.store.load(module).map_err(ServiceError::from).and_then(
                    |mut document| {
                        let (value, changed) = apply(&mut document)?;
                        if changed {
                            self.store.save(module, &document)?;
                            self.snapshot(module, &document);
                        }
                        Ok((value, changed))
                    },
                )
            });
        self.locks.release(module);

        match result {
            Ok((value, changed)) => {
                info!(
                    "event={} module=service status=ok name={} changed={} duration_ms={}",
                    event,
                    module,
                    changed,
                    started_at.elapsed().as_millis()
                );
                if changed {
                    self.journal
                        .record(&format!("{event} on {module}"), Severity::Success);
                } else {
                    self.journal
                        .record(&format!("{event} on {module}: no changes"), Severity::Note);
                }
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={} module=service status=error name={} error={}",
                    event, module, err
                );
                self.journal
                    .record(&format!("{event} on {module} failed: {err}"), Severity::Error);
                Err(err)
            }
        }
    }

    fn snapshot(&self, module: &str, document: &Document) {
        if let Err(err) = self.archive.archive(module, document) {
            warn!(
                "event=module_archive module=service status=error name={} error={}",
                module, err
            );
        }
    }
}
