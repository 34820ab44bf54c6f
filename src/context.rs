//! Ambient execution context with cross-thread capture/restore.
//!
//! A task runner carries a small key-value environment describing the current
//! run (run id, task slug, retry count, ...). The environment is thread-local:
//! work dispatched to another thread must capture a [`ContextSnapshot`] on the
//! calling thread and restore it on the worker thread for the duration of the
//! call.
//!
//! Snapshots are copies, never shared references. Each worker thread mutates
//! its own restored copy independently and discards it when its
//! [`ScopedContext`] guard drops.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

thread_local! {
    static CURRENT: RefCell<ContextSnapshot> = RefCell::new(ContextSnapshot::default());
}

/// An opaque, copyable capture of the ambient execution state.
///
/// Keys are strings, values arbitrary JSON. Backed by a `BTreeMap` for
/// deterministic ordering in logs and serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    values: BTreeMap<String, Value>,
}

impl ContextSnapshot {
    /// Look up a context value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Insert or replace a context value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl FromIterator<(String, Value)> for ContextSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Capture a copy of the calling thread's current context.
pub fn capture() -> ContextSnapshot {
    CURRENT.with(|current| current.borrow().clone())
}

/// Read a single value from the calling thread's current context.
pub fn get(key: &str) -> Option<Value> {
    CURRENT.with(|current| current.borrow().get(key).cloned())
}

/// Set a single value in the calling thread's current context.
pub fn set(key: impl Into<String>, value: impl Into<Value>) {
    CURRENT.with(|current| current.borrow_mut().set(key, value));
}

/// RAII guard that installs a snapshot as the calling thread's context and
/// restores the previous context when dropped.
///
/// Guards nest LIFO on a given thread. The guard is intentionally not `Send`:
/// it must drop on the thread it entered on.
#[derive(Debug)]
pub struct ScopedContext {
    previous: ContextSnapshot,
    // RefCell is !Sync, which also keeps this type !Send via the marker.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ScopedContext {
    /// Swap `snapshot` in as the current context, saving the previous one.
    pub fn enter(snapshot: ContextSnapshot) -> Self {
        let previous = CURRENT.with(|current| current.replace(snapshot));
        Self {
            previous,
            _not_send: std::marker::PhantomData,
        }
    }
}

impl Drop for ScopedContext {
    fn drop(&mut self) {
        CURRENT.with(|current| {
            *current.borrow_mut() = std::mem::take(&mut self.previous);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capture_reflects_current_values() {
        set("run_id", "abc-123");
        set("retry", 2);

        let snapshot = capture();
        assert_eq!(snapshot.get("run_id"), Some(&json!("abc-123")));
        assert_eq!(snapshot.get("retry"), Some(&json!(2)));
    }

    #[test]
    fn test_scoped_enter_restores_previous_on_drop() {
        set("task", "outer");

        let mut inner = ContextSnapshot::default();
        inner.set("task", "inner");
        {
            let _guard = ScopedContext::enter(inner);
            assert_eq!(get("task"), Some(json!("inner")));
        }
        assert_eq!(get("task"), Some(json!("outer")));
    }

    #[test]
    fn test_scoped_guards_nest_lifo() {
        set("depth", 0);

        let mut one = ContextSnapshot::default();
        one.set("depth", 1);
        let mut two = ContextSnapshot::default();
        two.set("depth", 2);

        {
            let _g1 = ScopedContext::enter(one);
            {
                let _g2 = ScopedContext::enter(two);
                assert_eq!(get("depth"), Some(json!(2)));
            }
            assert_eq!(get("depth"), Some(json!(1)));
        }
        assert_eq!(get("depth"), Some(json!(0)));
    }

    #[test]
    fn test_snapshot_is_a_copy_not_a_reference() {
        set("flag", "original");
        let snapshot = capture();

        // Mutating the live context after capture does not touch the snapshot.
        set("flag", "mutated");
        assert_eq!(snapshot.get("flag"), Some(&json!("original")));
    }

    #[test]
    fn test_restored_copy_on_another_thread_is_independent() {
        set("owner", "caller");
        let snapshot = capture();

        let handle = std::thread::spawn(move || {
            let _guard = ScopedContext::enter(snapshot);
            assert_eq!(get("owner"), Some(json!("caller")));
            // Worker-side mutation stays on the worker thread.
            set("owner", "worker");
            assert_eq!(get("owner"), Some(json!("worker")));
        });
        handle.join().unwrap();

        assert_eq!(get("owner"), Some(json!("caller")));
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let mut snapshot = ContextSnapshot::default();
        snapshot.set("run_id", "abc");
        snapshot.set("retry", 3);

        let encoded = serde_json::to_string(&snapshot).unwrap();
        let decoded: ContextSnapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ContextSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.get("missing"), None);
    }
}
