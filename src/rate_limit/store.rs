use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Counter state for one key's current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Requests observed in this window, including rejected ones.
    pub count: u64,
    /// Epoch millisecond at which the window ends.
    pub reset_at: u64,
}

impl WindowEntry {
    /// Open a new window at `now` with the first request counted.
    pub fn open(now_millis: u64, window_ms: u64) -> Self {
        Self { count: 1, reset_at: now_millis.saturating_add(window_ms) }
    }

    /// A window is over once `now` is strictly past `reset_at`.
    pub fn is_expired(&self, now_millis: u64) -> bool {
        self.reset_at < now_millis
    }
}

/// Abstract storage interface for fixed-window counters.
///
/// This trait is designed to support both in-memory and distributed backends.
/// Limiters only go through [`update`](WindowStore::update), which must apply
/// its read-modify-write atomically per key.
pub trait WindowStore: Send + Sync + std::fmt::Debug {
    /// Fetch the entry for a key.
    fn get(&self, key: &str) -> Option<WindowEntry>;

    /// Overwrite the entry for a key.
    fn set(&self, key: &str, entry: WindowEntry);

    /// Remove a key, returning its last entry.
    fn delete(&self, key: &str) -> Option<WindowEntry>;

    /// Replace the entry for `key` with `f(current)` and return the new entry.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<WindowEntry>) -> WindowEntry,
    ) -> WindowEntry;

    /// Drop every entry whose window has ended as of `now_millis`.
    /// Returns how many were removed.
    fn sweep(&self, now_millis: u64) -> usize;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simple in-memory window store.
///
/// Clones share the same table.
#[derive(Default, Clone, Debug)]
pub struct InMemoryWindowStore {
    data: Arc<Mutex<HashMap<String, WindowEntry>>>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are plain counters, so a panic mid-update cannot leave them
    // half-written; keep serving after poisoning.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, WindowEntry>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WindowStore for InMemoryWindowStore {
    fn get(&self, key: &str) -> Option<WindowEntry> {
        self.lock().get(key).copied()
    }

    fn set(&self, key: &str, entry: WindowEntry) {
        self.lock().insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) -> Option<WindowEntry> {
        self.lock().remove(key)
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<WindowEntry>) -> WindowEntry,
    ) -> WindowEntry {
        let mut guard = self.lock();
        match guard.get_mut(key) {
            Some(slot) => {
                *slot = f(Some(*slot));
                *slot
            }
            None => {
                let entry = f(None);
                guard.insert(key.to_string(), entry);
                entry
            }
        }
    }

    fn sweep(&self, now_millis: u64) -> usize {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|_, entry| !entry.is_expired(now_millis));
        before - guard.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_delete() {
        let store = InMemoryWindowStore::new();
        assert!(store.is_empty());
        store.set("k", WindowEntry { count: 2, reset_at: 10 });
        assert_eq!(store.get("k"), Some(WindowEntry { count: 2, reset_at: 10 }));
        assert_eq!(store.delete("k"), Some(WindowEntry { count: 2, reset_at: 10 }));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn update_inserts_then_mutates() {
        let store = InMemoryWindowStore::new();
        let first = store.update("k", &mut |cur: Option<WindowEntry>| {
            assert!(cur.is_none());
            WindowEntry::open(0, 100)
        });
        assert_eq!(first, WindowEntry { count: 1, reset_at: 100 });

        let second = store.update("k", &mut |cur: Option<WindowEntry>| {
            let cur = cur.expect("entry exists");
            WindowEntry { count: cur.count + 1, ..cur }
        });
        assert_eq!(second.count, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let store = InMemoryWindowStore::new();
        store.set("old", WindowEntry { count: 5, reset_at: 99 });
        store.set("edge", WindowEntry { count: 1, reset_at: 100 });
        store.set("fresh", WindowEntry { count: 1, reset_at: 500 });

        assert_eq!(store.sweep(100), 1);
        assert!(store.get("old").is_none());
        assert!(store.get("edge").is_some(), "reset_at == now is still live");
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn clones_share_table() {
        let store = InMemoryWindowStore::new();
        let other = store.clone();
        store.set("k", WindowEntry::open(0, 1));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn survives_poisoned_lock() {
        let store = InMemoryWindowStore::new();
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            poisoner.update("k", &mut |_: Option<WindowEntry>| -> WindowEntry { panic!("boom") });
        })
        .join();

        store.set("k", WindowEntry::open(0, 10));
        assert_eq!(store.get("k").map(|e| e.count), Some(1));
    }
}
