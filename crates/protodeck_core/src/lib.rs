//! Core domain logic for Protodeck prototype modules.
//!
//! Documents are trees of slides, overlay items, scroll zones, hotspots and
//! comments. This crate resolves flat addressing tuples into that tree,
//! applies point mutations, reconciles edited copies, and runs each change
//! as a locked load/mutate/save cycle over JSON files.

pub mod config;
pub mod engine;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use engine::address::{Address, AddressFields, FormAddress, FormTarget};
pub use engine::error::{EngineError, EngineResult, Missing};
pub use engine::merge::{merge_documents, MergeOutcome};
pub use engine::mutate::MutationEngine;
pub use engine::normalize::{normalize_document, NormalizeReport};
pub use engine::request::{
    CommentKey, CommentRequest, DrawerRequest, GlobalHotspotRequest, HotspotRequest, Rect,
    StatusRequest,
};
pub use identity::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::comment::{Comment, CommentType};
pub use model::document::{Document, DocumentError, DocumentKind};
pub use model::hotspot::{Hotspot, HotspotType};
pub use model::node::{DrawerInfo, Form, Node, NodeStatus, ScrollZone};
pub use repo::archive::FileArchive;
pub use repo::file_store::FileModuleStore;
pub use repo::journal::{FileJournal, JournalEntry};
pub use repo::module_store::{Archive, Journal, ModuleStore, Severity, StoreError, StoreResult};
pub use service::module_service::{
    FileModuleService, MergeSummary, ModuleService, ServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
