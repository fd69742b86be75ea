//! Per-session request gate: one in-flight reasoning loop per session id,
//! no contention across unrelated sessions.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of session id to its request mutex. Mutexes are created lazily and
/// kept for the process lifetime; the per-session state is one `Arc<Mutex>`,
/// which is negligible next to the window history itself.
pub(crate) struct SessionGate {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionGate {
    pub(crate) fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquires the session's mutex, waiting behind any in-flight request for
    /// the same session. The map entry is only held long enough to clone the
    /// `Arc`, so other sessions never block on the lookup.
    pub(crate) async fn lock(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Drops the session's mutex when nobody holds or awaits it, so the map
    /// does not grow by one entry per session id ever seen. The shard write
    /// lock taken by `remove_if` excludes concurrent `lock` lookups, and a
    /// waiter that already cloned the `Arc` keeps the strong count above one,
    /// in which case the entry is kept.
    pub(crate) fn evict(&self, session_id: &str) {
        self.locks
            .remove_if(session_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }

    /// Number of session ids currently tracked.
    #[cfg(test)]
    pub(crate) fn tracked_sessions(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: the same session is mutually exclusive; a second lock waits
    /// until the first guard drops.**
    #[tokio::test]
    async fn same_session_is_exclusive() {
        let gate = Arc::new(SessionGate::new());

        let guard = gate.lock("s1").await;
        let gate_clone = Arc::clone(&gate);
        let waiter = tokio::spawn(async move {
            let _guard = gate_clone.lock("s1").await;
        });

        // The waiter cannot finish while the first guard is held.
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    /// **Test: distinct sessions lock independently.**
    #[tokio::test]
    async fn distinct_sessions_do_not_block() {
        let gate = SessionGate::new();
        let _a = gate.lock("a").await;
        // Must not deadlock.
        let _b = gate.lock("b").await;
    }

    /// **Test: evicting an uncontended session drops its map entry, and the
    /// session can still be locked again afterwards.**
    #[tokio::test]
    async fn evict_removes_uncontended_entry() {
        let gate = SessionGate::new();
        drop(gate.lock("s1").await);
        assert_eq!(gate.tracked_sessions(), 1);

        gate.evict("s1");
        assert_eq!(gate.tracked_sessions(), 0);

        // A fresh entry is created on demand.
        let _guard = gate.lock("s1").await;
        assert_eq!(gate.tracked_sessions(), 1);
    }

    /// **Test: an entry whose mutex is still held is kept by evict, so a
    /// waiter never loses its exclusion.**
    #[tokio::test]
    async fn evict_keeps_contended_entry() {
        let gate = SessionGate::new();
        let guard = gate.lock("s1").await;

        gate.evict("s1");
        assert_eq!(gate.tracked_sessions(), 1);

        drop(guard);
        gate.evict("s1");
        assert_eq!(gate.tracked_sessions(), 0);
    }
}
