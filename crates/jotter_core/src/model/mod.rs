//! Domain model for notes.
//!
//! # Invariants
//! - Every note is identified by a storage-assigned integer id.
//! - Deletion is hard; there are no tombstones.

pub mod note;
