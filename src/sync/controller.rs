use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::RefreshHandle;
use crate::{
    error::{EditError, SyncError},
    remote::RemoteStore,
    rotation::{ListEditor, Sequence},
    votemap::VoteMapConfig,
};

/// Where the controller is in its load/save lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Ready,
    LoadFailed,
    Saving,
    /// The push failed; the rotation has been reloaded from the remote
    SaveFailed,
}

/// Why a save request was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveBlocked {
    /// No load has succeeded yet, so there is nothing to edit against
    NotLoaded,
    NotDirty,
    InFlight,
    VoteMapActive,
    Closed,
}

impl fmt::Display for SaveBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveBlocked::NotLoaded => write!(f, "the rotation has not been loaded yet"),
            SaveBlocked::NotDirty => write!(f, "rotation has no unsaved changes"),
            SaveBlocked::InFlight => write!(f, "a save is already in progress"),
            SaveBlocked::VoteMapActive => {
                write!(f, "the rotation cannot be changed while map voting is enabled")
            }
            SaveBlocked::Closed => write!(f, "the editor has been closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Pushed and reconciled
    Saved,
    /// Nothing was pushed
    Skipped(SaveBlocked),
    /// The controller was closed before the save finished; results were dropped
    Discarded,
}

struct Inner {
    editor: ListEditor,
    state: SyncState,
    saving: bool,
    closed: bool,
    loaded: bool,
    catalog: Sequence,
    last_refresh: Option<DateTime<Utc>>,
    refresh: Option<RefreshHandle>,
}

/// Keeps a local rotation editor in step with a [`RemoteStore`].
///
/// All methods take `&self`. Locks are never held across an await, so two
/// overlapping `save()` calls on the same controller observe each other and
/// the second is skipped.
pub struct SyncController<S> {
    store: Arc<S>,
    inner: Mutex<Inner>,
    votemap: Arc<watch::Sender<VoteMapConfig>>,
}

impl<S: RemoteStore> SyncController<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (votemap, _) = watch::channel(VoteMapConfig::default());
        Self {
            store,
            inner: Mutex::new(Inner {
                editor: ListEditor::default(),
                state: SyncState::Idle,
                saving: false,
                closed: false,
                loaded: false,
                catalog: Sequence::default(),
                last_refresh: None,
                refresh: None,
            }),
            votemap: Arc::new(votemap),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn state(&self) -> SyncState {
        self.inner().state
    }

    pub fn is_dirty(&self) -> bool {
        self.inner().editor.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.inner().saving
    }

    pub fn canonical(&self) -> Sequence {
        self.inner().editor.canonical().clone()
    }

    pub fn working(&self) -> Sequence {
        self.inner().editor.working().clone()
    }

    pub fn catalog(&self) -> Sequence {
        self.inner().catalog.clone()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner().last_refresh
    }

    /// Latest known vote-map settings
    pub fn votemap(&self) -> VoteMapConfig {
        self.votemap.borrow().clone()
    }

    /// Watch vote-map changes published by the background refresh
    pub fn subscribe_votemap(&self) -> watch::Receiver<VoteMapConfig> {
        self.votemap.subscribe()
    }

    /// Fetch the rotation and make it both the canonical and working copy.
    ///
    /// On failure the previous rotation is kept and the error returned. Once
    /// the controller is closed a fetched rotation is dropped, but a fetch
    /// error is still returned.
    pub async fn load(&self) -> Result<(), SyncError> {
        {
            let mut inner = self.inner();
            if !inner.saving && !inner.closed {
                inner.state = SyncState::Loading;
            }
        }

        let fetched = self.store.fetch_rotation().await;

        let mut inner = self.inner();
        if inner.closed {
            return match fetched {
                Ok(_) => {
                    tracing::debug!("Editor closed, discarding loaded rotation");
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!("Editor closed, load failed: {:#}", e);
                    Err(SyncError::LoadFailed(e))
                }
            };
        }

        match fetched {
            Ok(rotation) => {
                tracing::debug!("Loaded rotation of {} map(s)", rotation.len());
                inner.editor.load(rotation);
                inner.loaded = true;
                if !inner.saving {
                    inner.state = SyncState::Ready;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load map rotation: {:#}", e);
                if !inner.saving {
                    inner.state = SyncState::LoadFailed;
                }
                Err(SyncError::LoadFailed(e))
            }
        }
    }

    /// Whether `save()` would push right now
    pub fn can_save(&self) -> Result<(), SaveBlocked> {
        let votemap_enabled = self.votemap.borrow().enabled;
        Self::check_save(&self.inner(), votemap_enabled)
    }

    fn check_save(inner: &Inner, votemap_enabled: bool) -> Result<(), SaveBlocked> {
        if inner.closed {
            return Err(SaveBlocked::Closed);
        }
        if inner.saving {
            return Err(SaveBlocked::InFlight);
        }
        if !inner.loaded {
            return Err(SaveBlocked::NotLoaded);
        }
        if votemap_enabled {
            return Err(SaveBlocked::VoteMapActive);
        }
        if !inner.editor.is_dirty() {
            return Err(SaveBlocked::NotDirty);
        }
        Ok(())
    }

    /// Push the working rotation, then reload it from the remote whatever
    /// the push outcome.
    pub async fn save(&self) -> Result<SaveOutcome, SyncError> {
        let ids = {
            let votemap_enabled = self.votemap.borrow().enabled;
            let mut inner = self.inner();
            if let Err(blocked) = Self::check_save(&inner, votemap_enabled) {
                tracing::debug!("Not saving: {}", blocked);
                return Ok(SaveOutcome::Skipped(blocked));
            }
            inner.saving = true;
            inner.state = SyncState::Saving;
            inner.editor.working().ids()
        };

        tracing::info!("Saving rotation: {}", ids.join(", "));
        let pushed = self.store.push_rotation(ids).await;
        if let Err(e) = &pushed {
            tracing::warn!("Failed to save map rotation: {:#}", e);
        }

        let reconciled = self.store.fetch_rotation().await;

        let mut inner = self.inner();
        inner.saving = false;
        if inner.closed {
            tracing::debug!("Editor closed, discarding save result");
            return Ok(SaveOutcome::Discarded);
        }

        let loaded = match reconciled {
            Ok(rotation) => {
                inner.editor.load(rotation);
                inner.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to reload map rotation after save: {:#}", e);
                Err(e)
            }
        };

        match (pushed, loaded) {
            (Ok(()), Ok(())) => {
                inner.state = SyncState::Ready;
                Ok(SaveOutcome::Saved)
            }
            (Ok(()), Err(load_err)) => {
                inner.state = SyncState::LoadFailed;
                Err(SyncError::LoadFailed(load_err))
            }
            (Err(push_err), _) => {
                inner.state = SyncState::SaveFailed;
                Err(SyncError::SaveFailed(push_err))
            }
        }
    }

    pub fn reorder(&self, from: usize, to: usize) -> Result<Sequence, EditError> {
        self.inner().editor.reorder(from, to).cloned()
    }

    pub fn append(&self, items: &Sequence) -> Sequence {
        self.inner().editor.append(items).clone()
    }

    pub fn remove_at(&self, index: usize) -> Result<Sequence, EditError> {
        self.inner().editor.remove_at(index).cloned()
    }

    pub fn reset(&self, to: &Sequence) -> Sequence {
        self.inner().editor.reset(to).clone()
    }

    pub fn discard_changes(&self) -> Sequence {
        self.inner().editor.discard().clone()
    }

    /// Append maps picked by id from the loaded catalog, in the given order.
    /// Nothing is appended if any id is unknown.
    pub fn add_from_catalog<I, T>(&self, ids: I) -> Result<Sequence, EditError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut inner = self.inner();
        let picked = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                inner
                    .catalog
                    .iter()
                    .find(|item| item.id == id)
                    .cloned()
                    .ok_or_else(|| EditError::UnknownItem(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(inner.editor.append(&Sequence::new(picked)).clone())
    }

    /// Fetch the list of maps the server offers
    pub async fn load_catalog(&self) -> anyhow::Result<Sequence> {
        let catalog = self.store.fetch_catalog().await.map_err(|e| {
            tracing::warn!("Failed to load map catalog: {:#}", e);
            e
        })?;
        let mut inner = self.inner();
        if !inner.closed {
            inner.catalog = catalog.clone();
        }
        Ok(catalog)
    }

    /// Fetch the vote-map settings once and publish them
    pub async fn refresh_votemap(&self) -> anyhow::Result<VoteMapConfig> {
        let config = self.store.fetch_votemap_config().await.map_err(|e| {
            tracing::warn!("Failed to load vote-map config: {:#}", e);
            e
        })?;
        self.votemap.send_replace(config.clone());
        Ok(config)
    }

    /// Reload rotation, vote-map settings, and catalog together.
    ///
    /// Only a rotation failure is returned; the others are logged.
    pub async fn refresh_all(&self) -> Result<(), SyncError> {
        let (rotation, _, _) =
            tokio::join!(self.load(), self.refresh_votemap(), self.load_catalog());
        self.inner().last_refresh = Some(Utc::now());
        rotation
    }

    /// Start polling vote-map settings, replacing any running poller.
    /// Must be called from within a tokio runtime.
    pub fn start_refresh(&self, period: Duration) {
        let mut inner = self.inner();
        if inner.closed {
            return;
        }
        tracing::debug!("Polling vote-map config every {:?}", period);
        inner.refresh = Some(RefreshHandle::spawn(
            self.store.clone(),
            self.votemap.clone(),
            period,
        ));
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner()
            .refresh
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop background work. In-flight loads and saves finish but their
    /// results are discarded.
    pub fn shutdown(&self) {
        let refresh = {
            let mut inner = self.inner();
            inner.closed = true;
            inner.refresh.take()
        };
        if let Some(handle) = refresh {
            handle.cancel();
            tracing::debug!("Stopped vote-map polling");
        }
    }
}
