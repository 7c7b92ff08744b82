//! Document engine: path resolution, point mutations and reconciliation.
//!
//! # Responsibility
//! - Locate nested entities inside a loaded document from addressing fields.
//! - Apply point mutations and whole-document merges in memory.
//!
//! # Invariants
//! - The engine performs no I/O and keeps no state between calls.
//! - Resolution happens before mutation; a failed resolve leaves the
//!   document untouched.

pub mod address;
pub mod error;
pub mod merge;
pub mod mutate;
pub mod normalize;
pub mod request;
pub mod resolve;
