//! Change listeners invoked after every committed mutation.
//!
//! # Responsibility
//! - Define the observer contract the note store notifies.
//! - Provide the listener that persists the full collection on every change.
//!
//! # Invariants
//! - `PersistOnChange` saves the complete snapshot each time; no batching,
//!   no debouncing, no partial saves.

use crate::model::note::Note;
use crate::repo::jot_repo::{JotRepository, RepoResult};
use crate::repo::slot_repo::SlotStorage;
use crate::service::mutation::Mutation;

/// Observer of committed store mutations.
///
/// `notes` is the collection as it stands after `mutation` was applied.
pub trait ChangeListener {
    fn on_change(&mut self, mutation: &Mutation, notes: &[Note]) -> RepoResult<()>;
}

impl<F> ChangeListener for F
where
    F: FnMut(&Mutation, &[Note]) -> RepoResult<()>,
{
    fn on_change(&mut self, mutation: &Mutation, notes: &[Note]) -> RepoResult<()> {
        self(mutation, notes)
    }
}

/// Listener that writes the whole collection through a `JotRepository`.
pub struct PersistOnChange<S: SlotStorage> {
    repo: JotRepository<S>,
}

impl<S: SlotStorage> PersistOnChange<S> {
    pub fn new(repo: JotRepository<S>) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &JotRepository<S> {
        &self.repo
    }
}

impl<S: SlotStorage> ChangeListener for PersistOnChange<S> {
    fn on_change(&mut self, _mutation: &Mutation, notes: &[Note]) -> RepoResult<()> {
        self.repo.save(notes)
    }
}
