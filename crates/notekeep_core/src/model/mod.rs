//! Domain model for the notes collection.
//!
//! # Responsibility
//! - Define the canonical note record used by core business logic.
//! - Define owner identity types shared by auth and storage.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Every note has exactly one owner, fixed at creation.
//! - Deletion is permanent; there are no tombstones.

pub mod note;
