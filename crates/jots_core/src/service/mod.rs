//! Note store services.
//!
//! # Responsibility
//! - Hold the authoritative jot collection and its mutation surface.
//! - Fan committed mutations out to change listeners (persistence).
//! - Wire storage, store and listeners together at startup.

pub mod change_notifier;
pub mod jot_store;
pub mod mutation;
pub mod session;
