//! Domain model for sticky notes.
//!
//! # Responsibility
//! - Define the data structures shared by persistence and the note store.
//!
//! # Invariants
//! - Every note is identified by an opaque string `NoteId`.
//! - Wire field names match the persisted JSON layout (`rawContent`,
//!   `zIndex`, ...).

pub mod note;
