//! Note store: the authoritative in-memory jot collection.
//!
//! # Responsibility
//! - Own the note collection and the id counter.
//! - Expose the only legal mutation surface (create, remove, field setters,
//!   bring-to-front).
//! - Notify change listeners synchronously after every commit.
//!
//! # Invariants
//! - `z_index` values always form the dense range `0..len`.
//! - Ids come from a counter that only grows; removed ids are never reused.
//! - An unknown id turns any targeted mutation into a no-op, not an error.
//! - Listeners run after every commit, including no-op commits.

use crate::model::note::{Geometry, Note, NoteId, Reminder, NOTE_COLORS};
use crate::repo::jot_repo::{LoadedJots, RepoError};
use crate::service::change_notifier::ChangeListener;
use crate::service::mutation::Mutation;
use log::{debug, error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by a store commit.
#[derive(Debug)]
pub enum StoreError {
    /// The id counter has no successor left; nothing was created and no
    /// listener ran.
    IdSpaceExhausted { id_tracker: u64 },
    /// A listener failed; the in-memory change stays applied.
    Listener {
        mutation: &'static str,
        source: RepoError,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdSpaceExhausted { id_tracker } => {
                write!(f, "jot id counter exhausted at {id_tracker}")
            }
            Self::Listener { mutation, source } => {
                write!(f, "change listener failed after `{mutation}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IdSpaceExhausted { .. } => None,
            Self::Listener { source, .. } => Some(source),
        }
    }
}

/// Single-writer store for the jot collection.
pub struct NoteStore {
    notes: Vec<Note>,
    id_tracker: u64,
    rng: StdRng,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for NoteStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("notes", &self.notes)
            .field("id_tracker", &self.id_tracker)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NoteStore {
    /// Creates an empty store whose note colors come from OS entropy.
    pub fn new() -> Self {
        Self::from_notes(Vec::new(), 0)
    }

    /// Creates a store seeded from a loaded collection.
    pub fn from_loaded(loaded: LoadedJots) -> Self {
        Self::from_notes(loaded.notes, loaded.next_id)
    }

    /// Creates a store over `notes` whose next created id is `id_tracker`.
    ///
    /// The caller is responsible for passing a collection that already
    /// satisfies the dense z-order invariant.
    pub fn from_notes(notes: Vec<Note>, id_tracker: u64) -> Self {
        Self {
            notes,
            id_tracker,
            rng: StdRng::from_os_rng(),
            listeners: Vec::new(),
        }
    }

    /// Replaces the color RNG with a deterministic one.
    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Registers a listener; listeners run in registration order.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes ordered back to front, the order a renderer paints them in.
    pub fn notes_by_z(&self) -> Vec<&Note> {
        let mut ordered = self.notes.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|note| note.z_index);
        ordered
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Whether a note with `id` exists.
    ///
    /// Lets callers tell a no-op mutation apart from an applied one.
    pub fn exists(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Id the next `create_note` will assign.
    pub fn id_tracker(&self) -> u64 {
        self.id_tracker
    }

    /// Appends a default note in front of all others.
    pub fn create_note(&mut self) -> StoreResult<()> {
        self.commit(Mutation::CreateJot)
    }

    /// Removes a note and closes the z-order gap it leaves.
    pub fn remove_note(&mut self, id: impl Into<NoteId>) -> StoreResult<()> {
        self.commit(Mutation::RemoveJot { id: id.into() })
    }

    pub fn set_header(
        &mut self,
        id: impl Into<NoteId>,
        header: impl Into<String>,
    ) -> StoreResult<()> {
        self.commit(Mutation::SetHeader {
            id: id.into(),
            header: header.into(),
        })
    }

    pub fn set_content(
        &mut self,
        id: impl Into<NoteId>,
        raw_content: impl Into<String>,
    ) -> StoreResult<()> {
        self.commit(Mutation::SetContent {
            id: id.into(),
            raw_content: raw_content.into(),
        })
    }

    pub fn set_hidden(&mut self, id: impl Into<NoteId>, hidden: bool) -> StoreResult<()> {
        self.commit(Mutation::SetHidden {
            id: id.into(),
            hidden,
        })
    }

    /// Overwrites geometry as given; values are not validated.
    pub fn set_geometry(&mut self, id: impl Into<NoteId>, geometry: Geometry) -> StoreResult<()> {
        self.commit(Mutation::SetGeometry {
            id: id.into(),
            geometry,
        })
    }

    pub fn set_reminder(&mut self, id: impl Into<NoteId>, reminder: Reminder) -> StoreResult<()> {
        self.commit(Mutation::SetReminder {
            id: id.into(),
            reminder,
        })
    }

    /// Moves a note to the topmost z slot.
    ///
    /// Notes that were above it each shift down one slot; notes below it are
    /// untouched. Calling it on the topmost note changes nothing.
    pub fn bring_to_front(&mut self, id: impl Into<NoteId>) -> StoreResult<()> {
        self.commit(Mutation::BringToFront { id: id.into() })
    }

    /// Applies a structured mutation and notifies listeners.
    ///
    /// # Errors
    /// - `StoreError::IdSpaceExhausted` when a create has no id left to
    ///   assign; the collection is unchanged and listeners are not run.
    /// - `StoreError::Listener` when a listener fails; later listeners are
    ///   skipped and the mutation remains applied.
    pub fn commit(&mut self, mutation: Mutation) -> StoreResult<()> {
        let applied = self.apply(&mutation).inspect_err(|err| {
            error!(
                "event=jot_commit module=store status=error mutation={} count={} error={err}",
                mutation.name(),
                self.notes.len()
            );
        })?;
        debug!(
            "event=jot_commit module=store mutation={} target={} applied={} count={}",
            mutation.name(),
            mutation.target_id().unwrap_or("-"),
            applied,
            self.notes.len()
        );
        self.notify(&mutation)
    }

    fn apply(&mut self, mutation: &Mutation) -> StoreResult<bool> {
        let applied = match mutation {
            Mutation::CreateJot => {
                self.push_new_note()?;
                true
            }
            Mutation::RemoveJot { id } => self.remove_by_id(id),
            Mutation::SetHeader { id, header } => {
                self.update(id, |note| note.header = header.clone())
            }
            Mutation::SetContent { id, raw_content } => {
                self.update(id, |note| note.raw_content = raw_content.clone())
            }
            Mutation::SetHidden { id, hidden } => self.update(id, |note| note.hidden = *hidden),
            Mutation::SetGeometry { id, geometry } => {
                self.update(id, |note| note.geometry = *geometry)
            }
            Mutation::SetReminder { id, reminder } => {
                self.update(id, |note| note.reminder = reminder.clone())
            }
            Mutation::BringToFront { id } => self.raise_to_front(id),
        };
        Ok(applied)
    }

    fn push_new_note(&mut self) -> StoreResult<()> {
        let next = self
            .id_tracker
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted {
                id_tracker: self.id_tracker,
            })?;
        let id = self.id_tracker.to_string();
        let color = NOTE_COLORS[self.rng.random_range(0..NOTE_COLORS.len())];
        self.notes
            .push(Note::new_default(id, self.notes.len(), color));
        self.id_tracker = next;
        Ok(())
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            return false;
        };

        let removed = self.notes.remove(position);
        if removed.z_index == self.notes.len() {
            return true;
        }

        for note in &mut self.notes {
            if note.z_index > removed.z_index {
                note.z_index -= 1;
            }
        }
        true
    }

    fn raise_to_front(&mut self, id: &str) -> bool {
        let Some(original) = self.get(id).map(|note| note.z_index) else {
            return false;
        };

        let front = self.notes.len() - 1;
        for note in &mut self.notes {
            if note.id == id {
                note.z_index = front;
            } else if note.z_index > original {
                note.z_index -= 1;
            }
        }
        true
    }

    fn update(&mut self, id: &str, apply: impl FnOnce(&mut Note)) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                apply(note);
                true
            }
            None => false,
        }
    }

    fn notify(&mut self, mutation: &Mutation) -> StoreResult<()> {
        for listener in &mut self.listeners {
            if let Err(err) = listener.on_change(mutation, &self.notes) {
                error!(
                    "event=jot_notify module=store status=error mutation={} count={} error={err}",
                    mutation.name(),
                    self.notes.len()
                );
                return Err(StoreError::Listener {
                    mutation: mutation.name(),
                    source: err,
                });
            }
        }
        Ok(())
    }
}
