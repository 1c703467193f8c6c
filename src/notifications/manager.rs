//! Notification manager — ordered in-memory toast list with one cancellable
//! expiry task per toast, broadcasting changes to subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Notification, NotificationEvent, NotificationKind, RemovalReason};
use crate::config::DEFAULT_TOAST_DURATION;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

#[derive(Default)]
struct State {
    /// Live toasts in insertion order.
    entries: Vec<Notification>,
    /// Pending expiry task per live toast.
    timers: HashMap<Uuid, JoinHandle<()>>,
}

/// Holds the visible toasts.
///
/// Any number of toasts may be live at once. Expiry and explicit removal both
/// filter by id, so removing an id twice (or racing a timer) is a no-op.
pub struct NotificationManager {
    default_duration: Duration,
    state: RwLock<State>,
    tx: broadcast::Sender<NotificationEvent>,
}

impl NotificationManager {
    /// Create a manager with the 5 second default lifetime.
    pub fn new() -> Arc<Self> {
        Self::with_default_duration(DEFAULT_TOAST_DURATION)
    }

    pub fn with_default_duration(default_duration: Duration) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            default_duration,
            state: RwLock::new(State::default()),
            tx,
        })
    }

    /// Subscribe to show/remove events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    /// Append a toast and schedule its removal after `duration` (or the
    /// manager default). Returns the new toast's id.
    pub async fn show(
        self: &Arc<Self>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> Uuid {
        let duration = duration.unwrap_or(self.default_duration);
        let notification = Notification::new(kind, title, message, duration);
        let id = notification.id;
        let deadline = Instant::now() + duration;

        info!(
            notification_id = %id,
            kind = %notification.kind,
            title = %notification.title,
            duration_ms = duration.as_millis() as u64,
            "Notification shown"
        );

        let msg = NotificationEvent::Shown {
            notification: notification.clone(),
        };
        let mut state = self.state.write().await;
        state.entries.push(notification);
        // Sent under the lock: Shown always precedes Removed.
        let _ = self.tx.send(msg);
        // The task cannot expire the entry until this lock is released.
        let handle = spawn_expiry(Arc::downgrade(self), id, deadline);
        state.timers.insert(id, handle);
        id
    }

    pub async fn success(self: &Arc<Self>, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Success, title, message, None).await
    }

    pub async fn error(self: &Arc<Self>, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Error, title, message, None).await
    }

    pub async fn warning(self: &Arc<Self>, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Warning, title, message, None).await
    }

    pub async fn info(self: &Arc<Self>, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Info, title, message, None).await
    }

    /// Remove a toast now and cancel its timer. Returns `false` if it was
    /// already gone.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            if let Some(handle) = state.timers.remove(&id) {
                handle.abort();
            }
            take_entry(&mut state.entries, id)
        };

        if removed {
            debug!(notification_id = %id, "Notification dismissed");
            let _ = self.tx.send(NotificationEvent::Removed {
                id,
                reason: RemovalReason::Dismissed,
            });
        }
        removed
    }

    /// Remove every toast and cancel every timer.
    pub async fn clear(&self) -> usize {
        let drained: Vec<Notification> = {
            let mut state = self.state.write().await;
            for (_, handle) in state.timers.drain() {
                handle.abort();
            }
            std::mem::take(&mut state.entries)
        };

        for n in &drained {
            let _ = self.tx.send(NotificationEvent::Removed {
                id: n.id,
                reason: RemovalReason::Dismissed,
            });
        }
        if !drained.is_empty() {
            info!(count = drained.len(), "Notifications cleared");
        }
        drained.len()
    }

    /// Snapshot of live toasts in insertion order.
    pub async fn visible(&self) -> Vec<Notification> {
        self.state.read().await.entries.clone()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.state.read().await.entries.iter().any(|n| n.id == id)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Number of expiry tasks still scheduled.
    pub async fn pending_timers(&self) -> usize {
        self.state.read().await.timers.len()
    }

    /// Timer path: drop the entry without aborting the (running) task.
    async fn expire(&self, id: Uuid) {
        let removed = {
            let mut state = self.state.write().await;
            state.timers.remove(&id);
            take_entry(&mut state.entries, id)
        };

        if removed {
            debug!(notification_id = %id, "Notification expired");
            let _ = self.tx.send(NotificationEvent::Removed {
                id,
                reason: RemovalReason::Expired,
            });
        }
    }
}

impl Drop for NotificationManager {
    fn drop(&mut self) {
        for (_, handle) in self.state.get_mut().timers.drain() {
            handle.abort();
        }
    }
}

fn take_entry(entries: &mut Vec<Notification>, id: Uuid) -> bool {
    let before = entries.len();
    entries.retain(|n| n.id != id);
    entries.len() != before
}

fn spawn_expiry(manager: Weak<NotificationManager>, id: Uuid, deadline: Instant) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        if let Some(manager) = manager.upgrade() {
            manager.expire(id).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expires_after_duration_not_before() {
        let manager = NotificationManager::new();
        let id = manager
            .show(NotificationKind::Info, "Hi", "there", Some(Duration::from_millis(300)))
            .await;

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(manager.contains(id).await);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!manager.contains(id).await);
        assert_eq!(manager.pending_timers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn default_duration_is_five_seconds() {
        let manager = NotificationManager::new();
        let id = manager.success("Saved", "ok").await;

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(manager.contains(id).await);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(manager.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_is_idempotent_and_cancels_timer() {
        let manager = NotificationManager::new();
        let keep = manager.info("keep", "").await;
        let gone = manager.error("gone", "").await;

        assert!(manager.remove(gone).await);
        assert!(!manager.remove(gone).await);
        assert_eq!(manager.len().await, 1);
        assert_eq!(manager.pending_timers().await, 1);
        assert!(manager.contains(keep).await);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_after_expiry_is_noop() {
        let manager = NotificationManager::new();
        let id = manager
            .show(NotificationKind::Warning, "w", "", Some(Duration::from_millis(10)))
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!manager.remove(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn insertion_order_and_independent_lifetimes() {
        let manager = NotificationManager::new();
        let a = manager
            .show(NotificationKind::Info, "a", "", Some(Duration::from_millis(100)))
            .await;
        let b = manager
            .show(NotificationKind::Info, "b", "", Some(Duration::from_millis(50)))
            .await;
        let c = manager
            .show(NotificationKind::Info, "c", "", Some(Duration::from_millis(200)))
            .await;

        let ids: Vec<Uuid> = manager.visible().await.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b, c]);

        tokio::time::sleep(Duration::from_millis(60)).await;
        let ids: Vec<Uuid> = manager.visible().await.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, c]);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let ids: Vec<Uuid> = manager.visible().await.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![c]);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_aborts_all_timers() {
        let manager = NotificationManager::new();
        for i in 0..5 {
            manager.info(format!("n{i}"), "").await;
        }
        assert_eq!(manager.clear().await, 5);
        assert!(manager.is_empty().await);
        assert_eq!(manager.pending_timers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_reports_reason() {
        let manager = NotificationManager::new();
        let mut rx = manager.subscribe();

        let expiring = manager
            .show(NotificationKind::Info, "x", "", Some(Duration::from_millis(10)))
            .await;
        let dismissed = manager.info("y", "").await;

        match rx.recv().await.unwrap() {
            NotificationEvent::Shown { notification } => assert_eq!(notification.id, expiring),
            other => panic!("Expected Shown, got {other:?}"),
        }
        match rx.recv().await.unwrap() {
            NotificationEvent::Shown { notification } => assert_eq!(notification.id, dismissed),
            other => panic!("Expected Shown, got {other:?}"),
        }

        manager.remove(dismissed).await;
        match rx.recv().await.unwrap() {
            NotificationEvent::Removed { id, reason } => {
                assert_eq!(id, dismissed);
                assert_eq!(reason, RemovalReason::Dismissed);
            }
            other => panic!("Expected Removed, got {other:?}"),
        }

        match rx.recv().await.unwrap() {
            NotificationEvent::Removed { id, reason } => {
                assert_eq!(id, expiring);
                assert_eq!(reason, RemovalReason::Expired);
            }
            other => panic!("Expected Removed, got {other:?}"),
        }
    }
}
