//! Startup wiring for one jots session.
//!
//! # Responsibility
//! - Load the persisted collection and seed the note store from it.
//! - Attach the persist-on-change listener.
//! - Issue the one-shot notification permission request.
//!
//! # Invariants
//! - A malformed persisted collection aborts startup; nothing is reset.
//! - After `start` returns, every commit on the store is persisted.

use crate::config::JotsConfig;
use crate::db::{open_db, DbError};
use crate::permission::{
    request_notification_permission, NotificationPermission, PermissionRequester,
};
use crate::repo::jot_repo::{JotRepository, RepoError};
use crate::repo::slot_repo::{SlotStorage, SqliteSlotStorage};
use crate::service::change_notifier::PersistOnChange;
use crate::service::jot_store::NoteStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Startup failure.
#[derive(Debug)]
pub enum SessionError {
    Db(DbError),
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open jot storage: {err}"),
            Self::Repo(err) => write!(f, "failed to load jots: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// A started session: the live store plus the startup permission outcome.
#[derive(Debug)]
pub struct JotSession {
    store: NoteStore,
    notification_permission: NotificationPermission,
}

impl JotSession {
    /// Opens the SQLite database named by `config.db_path` and starts a
    /// session over it.
    pub fn open(
        config: &JotsConfig,
        requester: &mut dyn PermissionRequester,
    ) -> Result<Self, SessionError> {
        let conn = open_db(&config.db_path)?;
        Self::start(SqliteSlotStorage::new(conn), config, requester)
    }

    /// Starts a session over an already opened storage.
    pub fn start<S: SlotStorage + 'static>(
        storage: S,
        config: &JotsConfig,
        requester: &mut dyn PermissionRequester,
    ) -> Result<Self, SessionError> {
        let repo =
            JotRepository::with_options(storage, config.storage_key.clone(), config.id_assignment);
        let loaded = repo.load()?;

        let mut store = NoteStore::from_loaded(loaded);
        if let Some(seed) = config.color_seed {
            store = store.with_color_seed(seed);
        }
        store.subscribe(PersistOnChange::new(repo));

        let notification_permission = request_notification_permission(requester);
        info!(
            "event=session_start module=session status=ok count={} next_id={}",
            store.len(),
            store.id_tracker()
        );

        Ok(Self {
            store,
            notification_permission,
        })
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NoteStore {
        &mut self.store
    }

    pub fn into_store(self) -> NoteStore {
        self.store
    }

    pub fn notification_permission(&self) -> NotificationPermission {
        self.notification_permission
    }
}
