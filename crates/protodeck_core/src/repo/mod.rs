//! Persistence collaborators and their filesystem implementations.
//!
//! # Responsibility
//! - Define the load/save, archive and journal contracts the service calls.
//! - Map module names to JSON files without letting names escape the data root.
//!
//! # Invariants
//! - `save` replaces the whole document atomically (write then rename).
//! - Archive and journal writes are best effort; callers never roll back on them.
//! - A missing document is `NotFound`, distinct from unparsable content.

pub mod archive;
pub mod file_store;
pub mod journal;
pub mod module_store;
