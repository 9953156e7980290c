//! Jot collection persistence adapter.
//!
//! # Responsibility
//! - Serialize the full note collection into one storage slot.
//! - Load the collection back and re-derive fields that are not durable.
//!
//! # Invariants
//! - `save` overwrites the whole slot; there is no merge and no versioning.
//! - A missing or empty slot loads as an empty collection.
//! - Any other unparsable content is a hard error, never silently reset.
//! - Loaded reminders are always reset to empty.

use crate::db::DbError;
use crate::model::note::{is_dense_z_order, Geometry, Note, NoteId, Reminder};
use crate::repo::slot_repo::SlotStorage;
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Storage key the collection is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "jot-app";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for jot load/save.
#[derive(Debug)]
pub enum RepoError {
    /// Storage slot could not be read or written.
    Storage(DbError),
    /// Slot content is not a valid serialized collection.
    Malformed(serde_json::Error),
    /// Collection could not be serialized.
    Serialize(serde_json::Error),
    /// Two stored notes carry the same id under `IdAssignment::Preserve`.
    DuplicateId(NoteId),
    /// A stored id is so large that no later id can be handed out.
    IdSpaceExhausted(NoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Malformed(err) => write!(f, "malformed persisted jots: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize jots: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate persisted jot id: {id}"),
            Self::IdSpaceExhausted(id) => {
                write!(f, "persisted jot id {id} leaves no room for new ids")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Malformed(err) | Self::Serialize(err) => Some(err),
            Self::DuplicateId(_) | Self::IdSpaceExhausted(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

/// How note ids are derived when a collection is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdAssignment {
    /// Replace every stored id with its array index.
    #[default]
    Positional,
    /// Keep stored ids verbatim; entries without an id fall back to their
    /// array index.
    Preserve,
}

impl IdAssignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::Preserve => "preserve",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positional" => Some(Self::Positional),
            "preserve" => Some(Self::Preserve),
            _ => None,
        }
    }
}

/// Result of loading a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedJots {
    pub notes: Vec<Note>,
    /// First id the store may hand out without colliding with `notes`.
    pub next_id: u64,
}

/// Persisted shape of one note.
///
/// `id` accepts any JSON value because it is only consulted under
/// `IdAssignment::Preserve`. The stored reminder is not declared, so
/// whatever shape it has is skipped.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNote {
    #[serde(default)]
    id: Option<Value>,
    header: String,
    raw_content: String,
    geometry: Geometry,
    z_index: usize,
    hidden: bool,
    color: String,
}

/// Reads and writes the jot collection in one storage slot.
pub struct JotRepository<S: SlotStorage> {
    storage: S,
    key: String,
    id_assignment: IdAssignment,
}

impl<S: SlotStorage> JotRepository<S> {
    /// Creates a repository over `storage` using the default slot key and
    /// positional id assignment.
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, DEFAULT_STORAGE_KEY, IdAssignment::default())
    }

    pub fn with_options(storage: S, key: impl Into<String>, id_assignment: IdAssignment) -> Self {
        Self {
            storage,
            key: key.into(),
            id_assignment,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id_assignment(&self) -> IdAssignment {
        self.id_assignment
    }

    /// Loads the persisted collection.
    ///
    /// # Errors
    /// - `RepoError::Storage` when the slot cannot be read.
    /// - `RepoError::Malformed` when the slot holds invalid JSON or an
    ///   unexpected shape.
    /// - `RepoError::DuplicateId` when preserved ids collide.
    /// - `RepoError::IdSpaceExhausted` when a preserved id is `u64::MAX`.
    pub fn load(&self) -> RepoResult<LoadedJots> {
        let started_at = Instant::now();
        let raw = self.storage.get_item(&self.key)?.unwrap_or_default();
        let raw = if raw.is_empty() { "[]" } else { raw.as_str() };

        let stored: Vec<StoredNote> = serde_json::from_str(raw).map_err(|err| {
            error!(
                "event=jots_load module=repo status=error error_code=malformed_state key={} line={} column={}",
                self.key,
                err.line(),
                err.column()
            );
            RepoError::Malformed(err)
        })?;

        let notes = stored
            .into_iter()
            .enumerate()
            .map(|(index, stored)| self.restore_note(index, stored))
            .collect::<Vec<_>>();

        if self.id_assignment == IdAssignment::Preserve {
            let mut seen = HashSet::new();
            if let Some(duplicate) = notes.iter().find(|note| !seen.insert(note.id.as_str())) {
                return Err(RepoError::DuplicateId(duplicate.id.clone()));
            }
        }

        if !is_dense_z_order(&notes) {
            warn!(
                "event=jots_load module=repo status=warn reason=z_index_not_dense count={}",
                notes.len()
            );
        }

        let next_id = next_id_after(&notes)?;
        info!(
            "event=jots_load module=repo status=ok key={} count={} id_assignment={} duration_ms={}",
            self.key,
            notes.len(),
            self.id_assignment.as_str(),
            started_at.elapsed().as_millis()
        );

        Ok(LoadedJots { notes, next_id })
    }

    /// Serializes `notes` and overwrites the slot.
    pub fn save(&self, notes: &[Note]) -> RepoResult<()> {
        let payload = serde_json::to_string(notes).map_err(RepoError::Serialize)?;
        if let Err(err) = self.storage.set_item(&self.key, &payload) {
            error!(
                "event=jots_save module=repo status=error error_code=storage_write_failed key={} count={} error={err}",
                self.key,
                notes.len()
            );
            return Err(err.into());
        }
        Ok(())
    }

    fn restore_note(&self, index: usize, stored: StoredNote) -> Note {
        let id = match self.id_assignment {
            IdAssignment::Positional => index.to_string(),
            IdAssignment::Preserve => stored
                .id
                .and_then(|value| stored_id_text(&value))
                .unwrap_or_else(|| index.to_string()),
        };

        Note {
            id,
            header: stored.header,
            raw_content: stored.raw_content,
            geometry: stored.geometry,
            z_index: stored.z_index,
            hidden: stored.hidden,
            color: stored.color,
            reminder: Reminder::default(),
        }
    }
}

fn stored_id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Id counter seed for a loaded collection.
///
/// At least the collection length; bumped past any numeric-looking id so a
/// preserved id is never handed out twice.
fn next_id_after(notes: &[Note]) -> RepoResult<u64> {
    let mut next = notes.len() as u64;
    for note in notes {
        let Ok(id) = note.id.parse::<u64>() else {
            continue;
        };
        let after = id
            .checked_add(1)
            .ok_or_else(|| RepoError::IdSpaceExhausted(note.id.clone()))?;
        next = next.max(after);
    }
    Ok(next)
}
