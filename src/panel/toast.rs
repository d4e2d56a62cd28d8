//! Toast notifier
//!
//! Transient notifications with an optional undo action. Toasts never run
//! timers of their own: the board is pruned against the clock by whoever
//! owns it, and an undo is honoured only while its toast is still live.

use super::lists::Removal;
use super::settings::Settings;
use std::time::Duration;
use tokio::time::Instant;

pub type ToastId = u64;

/// Beyond this many toasts the oldest plain or expired one is dropped. Live
/// undo toasts are never dropped to make room.
const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// What invoking a toast's UNDO does
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// Put a message back into the list of `profile`
    RestoreMessage {
        profile: Option<String>,
        removal: Removal,
    },
    RestoreTime {
        profile: Option<String>,
        removal: Removal,
    },
    /// Re-create a deleted profile (it gets a new id)
    RestoreProfile {
        name: String,
        config: Settings,
        was_active: bool,
    },
}

impl UndoAction {
    /// List restores only apply to the profile they were removed from
    pub fn applies_to(&self, active: Option<&str>) -> bool {
        match self {
            UndoAction::RestoreMessage { profile, .. } | UndoAction::RestoreTime { profile, .. } => {
                profile.as_deref() == active
            }
            UndoAction::RestoreProfile { .. } => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub undo: Option<UndoAction>,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

pub struct ToastBoard {
    next_id: ToastId,
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl ToastBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            next_id: 0,
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.insert(message.into(), kind, None, self.ttl)
    }

    pub fn push_undo(
        &mut self,
        message: impl Into<String>,
        action: UndoAction,
        window: Duration,
    ) -> ToastId {
        self.insert(message.into(), ToastKind::Info, Some(action), window)
    }

    fn insert(
        &mut self,
        message: String,
        kind: ToastKind,
        undo: Option<UndoAction>,
        ttl: Duration,
    ) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        let now = Instant::now();
        self.toasts.push(Toast {
            id,
            message,
            kind,
            undo,
            expires_at: now + ttl,
        });
        if self.toasts.len() > MAX_TOASTS {
            let older = &self.toasts[..self.toasts.len() - 1];
            if let Some(pos) = older
                .iter()
                .position(|t| t.undo.is_none() || t.is_expired(now))
            {
                self.toasts.remove(pos);
            }
        }
        id
    }

    /// Claim the undo action of a live toast, removing the toast. Expired or
    /// unknown toasts yield nothing.
    pub fn take_undo(&mut self, id: ToastId, now: Instant) -> Option<UndoAction> {
        let pos = self.toasts.iter().position(|t| t.id == id)?;
        if self.toasts[pos].is_expired(now) || self.toasts[pos].undo.is_none() {
            return None;
        }
        self.toasts.remove(pos).undo
    }

    pub fn contains(&self, id: ToastId) -> bool {
        self.toasts.iter().any(|t| t.id == id)
    }

    pub fn dismiss(&mut self, id: ToastId) -> Option<Toast> {
        let pos = self.toasts.iter().position(|t| t.id == id)?;
        Some(self.toasts.remove(pos))
    }

    /// Remove and return every toast whose time is up
    pub fn prune(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|t| t.is_expired(now));
        self.toasts = live;
        expired
    }

    pub fn live(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |t| !t.is_expired(now))
    }

    /// Newest live toast that still offers an undo
    pub fn latest_undo(&self, now: Instant) -> Option<ToastId> {
        self.live(now)
            .filter(|t| t.undo.is_some())
            .map(|t| t.id)
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removal(value: &str) -> UndoAction {
        UndoAction::RestoreTime {
            profile: Some("acct-1".into()),
            removal: Removal {
                index: 0,
                value: value.into(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn undo_is_claimed_once() {
        let mut board = ToastBoard::new(Duration::from_secs(2));
        let id = board.push_undo("Time removed: 09:00", removal("09:00"), Duration::from_secs(5));

        assert_eq!(board.take_undo(id, Instant::now()), Some(removal("09:00")));
        assert_eq!(board.take_undo(id, Instant::now()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn undo_expires_with_its_window() {
        let mut board = ToastBoard::new(Duration::from_secs(2));
        let id = board.push_undo("Time removed: 09:00", removal("09:00"), Duration::from_secs(5));

        tokio::time::advance(Duration::from_millis(5001)).await;
        assert_eq!(board.take_undo(id, Instant::now()), None);
        assert_eq!(board.prune(Instant::now()).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn prune_keeps_live_toasts() {
        let mut board = ToastBoard::new(Duration::from_secs(2));
        board.push("Configuration saved", ToastKind::Success);
        let undo = board.push_undo("Message removed", removal("x"), Duration::from_secs(5));

        tokio::time::advance(Duration::from_secs(3)).await;
        let expired = board.prune(Instant::now());
        assert_eq!(expired.len(), 1);
        assert_eq!(board.live(Instant::now()).count(), 1);
        assert_eq!(board.latest_undo(Instant::now()), Some(undo));
    }

    #[tokio::test(start_paused = true)]
    async fn board_is_bounded() {
        let mut board = ToastBoard::new(Duration::from_secs(2));
        for i in 0..20 {
            board.push(format!("toast {}", i), ToastKind::Info);
        }
        let messages: Vec<_> = board.live(Instant::now()).map(|t| t.message.clone()).collect();
        assert_eq!(messages.len(), MAX_TOASTS);
        assert_eq!(messages.last().map(String::as_str), Some("toast 19"));
    }

    #[tokio::test(start_paused = true)]
    async fn live_undo_toasts_survive_the_cap() {
        let mut board = ToastBoard::new(Duration::from_secs(2));
        let first = board.push_undo("Time removed: 00:00", removal("00:00"), Duration::from_secs(5));
        for i in 1..12 {
            board.push_undo(format!("Time removed: {:02}:00", i), removal("x"), Duration::from_secs(5));
        }
        board.push("Configuration saved", ToastKind::Success);
        board.push("Configuration saved", ToastKind::Success);

        assert!(board.contains(first));
        assert_eq!(board.take_undo(first, Instant::now()), Some(removal("00:00")));
        // Plain toasts make way for each other
        let plain = board.live(Instant::now()).filter(|t| t.undo.is_none()).count();
        assert_eq!(plain, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_undo_toasts_are_evicted_first() {
        let mut board = ToastBoard::new(Duration::from_secs(60));
        let stale = board.push_undo("Message removed", removal("a"), Duration::from_secs(5));
        for i in 0..MAX_TOASTS - 1 {
            board.push_undo(format!("Message removed {}", i), removal("b"), Duration::from_secs(60));
        }
        tokio::time::advance(Duration::from_secs(6)).await;
        board.push("Configuration saved", ToastKind::Success);

        assert!(!board.contains(stale));
        assert_eq!(board.live(Instant::now()).count(), MAX_TOASTS);
    }

    #[test]
    fn list_restores_are_bound_to_their_profile() {
        let action = removal("09:00");
        assert!(action.applies_to(Some("acct-1")));
        assert!(!action.applies_to(Some("acct-2")));
        assert!(!action.applies_to(None));

        let profile = UndoAction::RestoreProfile {
            name: "Config 2".into(),
            config: Settings::default(),
            was_active: false,
        };
        assert!(profile.applies_to(Some("acct-9")));
    }
}
