//! Repository layer: storage slots and the jot persistence adapter.
//!
//! # Responsibility
//! - Define the key-value storage contract the collection is persisted in.
//! - Isolate SQLite and JSON details from the note store.
//!
//! # Invariants
//! - Read paths reject malformed persisted state instead of masking it.

pub mod jot_repo;
pub mod slot_repo;
