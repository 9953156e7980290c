//! Core logic for jots, a sticky-notes board.
//! This crate is the single source of truth for the note collection and
//! its z-order invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod permission;
pub mod repo;
pub mod service;

pub use config::{ConfigError, JotsConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{is_dense_z_order, Geometry, Note, NoteId, Reminder, NOTE_COLORS};
pub use permission::{
    request_notification_permission, NotificationPermission, PermissionError,
    PermissionRequester, StaticPermissionRequester,
};
pub use repo::jot_repo::{
    IdAssignment, JotRepository, LoadedJots, RepoError, RepoResult, DEFAULT_STORAGE_KEY,
};
pub use repo::slot_repo::{MemorySlotStorage, SlotStorage, SqliteSlotStorage};
pub use service::change_notifier::{ChangeListener, PersistOnChange};
pub use service::jot_store::{NoteStore, StoreError, StoreResult};
pub use service::mutation::Mutation;
pub use service::session::{JotSession, SessionError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
