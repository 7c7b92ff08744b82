//! Locked read-modify-write cycles over stored modules.
//!
//! # Responsibility
//! - Serialize every load/mutate/save cycle per module name.
//! - Run engine operations between storage collaborators.
//! - Snapshot and journal after successful saves.
//!
//! # Invariants
//! - Two cycles on the same module never interleave.
//! - A failed resolve or mutation never reaches `save`.
//! - Archive and journal failures never fail the cycle.

pub mod locks;
pub mod module_service;
