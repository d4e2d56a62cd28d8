// Panel module - client-side state and the operations the UI triggers
//
// `Panel` is a cheap-to-clone handle around:
// - ClientState: everything the screen shows, behind a std Mutex that is
//   never held across an await
// - a Backend: where every durable change goes
// - a Sequencer: drops stale read responses
// - a Debouncer: trailing-edge autosave
//
// Operations live in submodules by concern (config_io, editing, profiles,
// poller, runtime). The front-end never reads ClientState directly; it asks
// for a PanelView via `Panel::view`.

pub mod config_io;
pub mod debounce;
pub mod editing;
pub mod lists;
pub mod poller;
pub mod profiles;
pub mod runtime;
pub mod sequence;
pub mod settings;
pub mod toast;
pub mod view;


use crate::api::{Backend, Profile};
use crate::error::{ClientError, ClientResult};
use crate::storage::LocalStore;
use debounce::Debouncer;
use runtime::StatRow;
use sequence::Sequencer;
use settings::Settings;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use toast::{ToastBoard, ToastId, ToastKind, UndoAction};
use tokio::time::Instant;
use view::PanelView;

/// Timers of the client state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Quiet period before an edit is saved
    pub autosave: Duration,
    /// How long a removal can be undone
    pub undo_window: Duration,
    /// Lifetime of plain notifications
    pub toast_ttl: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            autosave: Duration::from_millis(1000),
            undo_window: Duration::from_millis(5000),
            toast_ttl: Duration::from_millis(3000),
        }
    }
}

/// The two editable value lists of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Messages,
    SendTimes,
}

/// What the panel currently believes about the backend
pub struct ClientState {
    pub settings: Settings,
    /// False until the first successful config load
    pub config_loaded: bool,
    pub bot_running: bool,
    pub profiles: Vec<Profile>,
    pub active_id: Option<String>,
    /// Profile whose name is being edited
    pub renaming: Option<String>,
    pub logs: Vec<String>,
    pub stats: Vec<StatRow>,
    /// Wall clock, `HH:MM:SS`
    pub clock: String,
    pub toasts: ToastBoard,
    /// Undo toast of the most recent profile deletion
    pub pending_delete: Option<ToastId>,
}

impl ClientState {
    fn new(timing: Timing) -> Self {
        Self {
            settings: Settings::default(),
            config_loaded: false,
            bot_running: false,
            profiles: Vec::new(),
            active_id: None,
            renaming: None,
            logs: Vec::new(),
            stats: Vec::new(),
            clock: String::new(),
            toasts: ToastBoard::new(timing.toast_ttl),
            pending_delete: None,
        }
    }

    pub fn active_profile(&self) -> Option<&Profile> {
        let active = self.active_id.as_deref()?;
        self.profiles.iter().find(|p| p.id == active)
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn list(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Messages => &self.settings.messages,
            ListKind::SendTimes => &self.settings.send_times,
        }
    }
}

#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    backend: Arc<dyn Backend>,
    state: Mutex<ClientState>,
    seq: Sequencer,
    autosave: Debouncer,
    timing: Timing,
    store: Option<LocalStore>,
}

impl Panel {
    pub fn new(backend: Arc<dyn Backend>, timing: Timing, store: Option<LocalStore>) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                backend,
                state: Mutex::new(ClientState::new(timing)),
                seq: Sequencer::new(),
                autosave: Debouncer::new(timing.autosave),
                timing,
                store,
            }),
        }
    }

    pub fn timing(&self) -> Timing {
        self.inner.timing
    }

    pub fn store(&self) -> Option<&LocalStore> {
        self.inner.store.as_ref()
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the current state
    pub fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        f(&self.state())
    }

    fn write<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        f(&mut self.state())
    }

    /// Snapshot for rendering
    pub fn view(&self) -> PanelView {
        view::render(&self.state(), Instant::now())
    }

    /// First fill of client state: cached logs, then live data
    pub async fn bootstrap(&self) {
        self.restore_cached_logs();
        let (config, profiles, stats) =
            tokio::join!(self.load(), self.refresh_profiles(), self.load_stats());
        for (what, result) in [("config", config), ("profiles", profiles), ("stats", stats)] {
            if let Err(e) = result {
                tracing::warn!("Initial {} load failed: {}", what, e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::warn!("{}", message),
            _ => tracing::info!("{}", message),
        }
        self.write(|s| s.toasts.push(message, kind))
    }

    /// Surface `err` to the user. Transport failures show `fallback` when
    /// one is given, the generic network message otherwise.
    fn report(&self, err: &ClientError, fallback: Option<&str>) {
        if err.is_transport() {
            tracing::warn!("Request failed: {}", err);
        }
        let message = match (err.is_transport(), fallback) {
            (true, Some(fallback)) => fallback.to_string(),
            _ => err.user_message(),
        };
        self.notify(ToastKind::Error, message);
    }

    fn offer_undo(&self, message: String, action: UndoAction) -> ToastId {
        let window = self.inner.timing.undo_window;
        tracing::info!("{}", message);
        self.write(|s| s.toasts.push_undo(message, action, window))
    }

    pub fn dismiss_toast(&self, id: ToastId) {
        self.write(|s| {
            s.toasts.dismiss(id);
            if s.pending_delete == Some(id) {
                s.pending_delete = None;
            }
        });
    }

    /// Drop expired toasts. Once the deletion undo toast is gone, expired or
    /// evicted, the deletion is final.
    pub fn prune_toasts(&self) {
        self.write(|s| {
            s.toasts.prune(Instant::now());
            if let Some(pending) = s.pending_delete {
                if !s.toasts.contains(pending) {
                    tracing::debug!("Profile deletion finalized");
                    s.pending_delete = None;
                }
            }
        });
    }

    /// Invoke the undo action of toast `id`. Returns false when the toast is
    /// gone, its window has passed, or it restores into a config that is no
    /// longer active.
    pub async fn undo(&self, id: ToastId) -> ClientResult<bool> {
        let action = self.write(|s| {
            if s.pending_delete == Some(id) {
                s.pending_delete = None;
            }
            let action = s.toasts.take_undo(id, Instant::now())?;
            if !action.applies_to(s.active_id.as_deref()) {
                tracing::debug!("Undo skipped: removal belongs to another config");
                return None;
            }
            Some(action)
        });
        let Some(action) = action else {
            return Ok(false);
        };

        match action {
            UndoAction::RestoreMessage { removal, .. } => {
                self.restore_item(ListKind::Messages, &removal);
            }
            UndoAction::RestoreTime { removal, .. } => {
                self.restore_item(ListKind::SendTimes, &removal);
            }
            UndoAction::RestoreProfile {
                name,
                config,
                was_active,
            } => {
                self.restore_profile(&name, &config, was_active).await?;
            }
        }
        Ok(true)
    }

    /// Undo the newest toast that still offers one
    pub async fn undo_latest(&self) -> ClientResult<bool> {
        let latest = self.read(|s| s.toasts.latest_undo(Instant::now()));
        match latest {
            Some(id) => self.undo(id).await,
            None => Ok(false),
        }
    }
}
