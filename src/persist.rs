//! Optional persistence contract and a sample in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a host durably keeps its current state.
///
/// A store is attached per tracker with
/// [`Tracker::with_store`](crate::Tracker::with_store). When present, its
/// `read` takes priority over the tracker's in-memory field on every state
/// query, so an external source of truth always wins; `write` is called as
/// part of every successful transition and may veto it by returning
/// `false`, which rolls the in-memory state back and fails the invocation.
///
/// The engine knows nothing about the storage format. A store for a real
/// backend typically maps `machine` to a column or key on the host's row.
///
/// # Example
///
/// ```rust
/// use statehood::StateStore;
///
/// struct Paperwork;
///
/// struct DeskDrawer {
///     filed: Option<String>,
/// }
///
/// impl StateStore<Paperwork> for DeskDrawer {
///     fn read(&self, _host: &Paperwork, _machine: &str) -> Option<String> {
///         self.filed.clone()
///     }
///
///     fn write(&mut self, _host: &mut Paperwork, _machine: &str, to: &str) -> bool {
///         self.filed = Some(to.to_string());
///         true
///     }
/// }
/// ```
pub trait StateStore<H> {
    /// Read the recorded state for `machine`, if any. `None` falls back to
    /// the tracker's in-memory field, then to the machine's initial state.
    fn read(&self, host: &H, machine: &str) -> Option<String>;

    /// Record the new state for `machine`. Returning `false` vetoes the
    /// in-flight transition.
    fn write(&mut self, host: &mut H, machine: &str, to: &str) -> bool;
}

/// One accepted write, as remembered by [`MemoryStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub machine: String,
    /// State before the write; `None` on the first write for a machine.
    pub from: Option<String>,
    pub to: String,
    pub at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    current: HashMap<String, String>,
    records: Vec<TransitionRecord>,
}

/// In-memory [`StateStore`] that accepts every write and remembers them.
///
/// Clones share storage, so a test or caller can keep a handle after the
/// store moves into a tracker and inspect what was written:
///
/// ```rust
/// use statehood::{MemoryStore, StateStore};
///
/// let store = MemoryStore::new();
/// let mut handle = store.clone();
///
/// handle.write(&mut (), "default", "closed");
/// assert_eq!(store.state_of("default"), Some("closed".to_string()));
/// assert_eq!(store.records().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last accepted state for `machine`, if any was written.
    pub fn state_of(&self, machine: &str) -> Option<String> {
        self.lock().current.get(machine).cloned()
    }

    /// Snapshot of every accepted write, in order.
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock still holds the last complete write.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H> StateStore<H> for MemoryStore {
    fn read(&self, _host: &H, machine: &str) -> Option<String> {
        self.state_of(machine)
    }

    fn write(&mut self, _host: &mut H, machine: &str, to: &str) -> bool {
        let mut inner = self.lock();
        let from = inner.current.insert(machine.to_string(), to.to_string());
        inner.records.push(TransitionRecord {
            machine: machine.to_string(),
            from,
            to: to.to_string(),
            at: Utc::now(),
        });
        true
    }
}
