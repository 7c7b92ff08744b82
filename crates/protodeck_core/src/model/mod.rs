//! Prototype document model.
//!
//! # Responsibility
//! - Define the tree-shaped schema persisted for every prototype module.
//! - Provide typed accessors over nodes, scroll zones, hotspots and comments.
//!
//! # Invariants
//! - A module exclusively owns its nodes; a node owns its zones, hotspots and comments.
//! - Deletion is a soft tombstone (`type = "deleted"` or `state = "deleted"`), never removal.
//! - Unknown JSON fields are carried through load/save untouched.

pub mod comment;
pub mod document;
pub mod hotspot;
pub mod node;

/// Tombstone marker shared by every soft-deletable entity.
pub const DELETED: &str = "deleted";

/// Module name that selects the overlay document shape.
pub const OVERLAY_FILE: &str = "overlay";

/// Module name that selects the global hotspot registry shape.
pub const GLOBAL_FILE: &str = "global";
