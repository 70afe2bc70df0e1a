use crate::action::Action;
use crate::error::{Error, Result};
use crate::state::{GlobalState, KeySet, Partial};
use crate::store::StoreConfig;
use serde_json::Value;
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Listener = Box<dyn Fn(&GlobalState, &KeySet)>;

struct Entry {
    id: u64,
    // `None` listens to every update.
    keys: Option<KeySet>,
    active: Cell<bool>,
    callback: Listener,
}

struct StoreInner {
    state: RefCell<GlobalState>,
    listeners: RefCell<Vec<Rc<Entry>>>,
    pending: RefCell<VecDeque<Pending>>,
    notifying: Cell<bool>,
    next_id: Cell<u64>,
    log_changes: bool,
}

/// An update queued while a cycle or batch is running.
enum Pending {
    Merge(Partial),
    // Run against the state as it is when the queue reaches it.
    Apply { action: Action, args: Vec<Value> },
}

/// Resets the notification flag when a cycle ends. On unwind the queued
/// updates are discarded as well.
struct CycleGuard<'a>(&'a StoreInner);

impl<'a> CycleGuard<'a> {
    fn enter(inner: &'a StoreInner) -> Self {
        inner.notifying.set(true);
        Self(inner)
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.notifying.set(false);
        if std::thread::panicking() {
            let dropped = std::mem::take(&mut *self.0.pending.borrow_mut());
            tracing::warn!(dropped = dropped.len(), "discarding queued updates after a panic");
        }
    }
}

/// A single-threaded container for [`GlobalState`] with subscribe/notify.
///
/// `Store` is a cheap handle; clones share the same state and listeners.
/// Create one at startup, pass it to whatever needs it, and call
/// [`Store::teardown`] when the tree that uses it goes away.
///
/// # Examples
///
/// ```
/// use unibind::{GlobalState, Partial, Store};
/// use serde_json::json;
///
/// let store = Store::new(GlobalState::try_from(json!({ "count": 0 })).unwrap());
/// store.set_state(Partial::new().with("count", 1));
/// assert_eq!(store.get_state().get("count"), Some(&json!(1)));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// Create a new store with the given initial state.
    pub fn new(initial: GlobalState) -> Self {
        Self::build(initial, false)
    }

    /// Create a store from loaded configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::build(config.initial_state.clone(), config.log_changes)
    }

    fn build(initial: GlobalState, log_changes: bool) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
                next_id: Cell::new(0),
                log_changes,
            }),
        }
    }

    /// Get a snapshot of the current state.
    pub fn get_state(&self) -> GlobalState {
        self.inner.state.borrow().clone()
    }

    /// Read state without cloning it.
    ///
    /// `f` must not call `set_state` outside of a notification cycle or
    /// [`Store::batch`]; the state is borrowed while it runs.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&GlobalState) -> R,
    {
        let state = self.inner.state.borrow();
        f(&state)
    }

    /// Merge `partial` into the state and notify subscribers.
    ///
    /// Called from inside a listener, the update is queued and applied once
    /// the running notification cycle has finished.
    pub fn set_state(&self, partial: Partial) {
        if self.inner.notifying.get() {
            tracing::trace!(keys = ?partial.keys(), "deferring update issued during notification");
            self.inner.pending.borrow_mut().push_back(Pending::Merge(partial));
            return;
        }

        self.run_cycle(partial);
        self.drain_pending();
    }

    /// Run `f` with updates deferred until it returns.
    ///
    /// Any `set_state` or `apply` issued inside `f` is queued and applied,
    /// in order, afterwards. Nested inside a notification cycle this is a
    /// plain call.
    pub fn batch<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.inner.notifying.get() {
            return f();
        }

        let result = {
            let _guard = CycleGuard::enter(&self.inner);
            f()
        };
        self.drain_pending();
        result
    }

    fn drain_pending(&self) {
        loop {
            // Release the queue borrow before listeners run.
            let next = self.inner.pending.borrow_mut().pop_front();
            match next {
                Some(Pending::Merge(partial)) => self.run_cycle(partial),
                Some(Pending::Apply { action, args }) => {
                    let result = self.read(|state| action.invoke(state, &args));
                    match result {
                        Ok(partial) => self.run_cycle(partial),
                        Err(e) => {
                            tracing::warn!(action = action.name(), error = %e, "queued action failed");
                        }
                    }
                }
                None => break,
            }
        }
    }

    /// Compute `action(state, args)` and merge the result.
    ///
    /// An error from the action is returned as is and the state is left
    /// untouched. Inside a cycle or batch the action is checked against the
    /// current state, then queued and run again on the state it is finally
    /// applied to, so consecutive dispatches compose.
    pub fn apply(&self, action: &Action, args: &[Value]) -> Result<()> {
        let partial = self.read(|state| action.invoke(state, args))?;
        if self.inner.notifying.get() {
            tracing::trace!(action = action.name(), "deferring action issued during notification");
            self.inner.pending.borrow_mut().push_back(Pending::Apply {
                action: action.clone(),
                args: args.to_vec(),
            });
            return Ok(());
        }
        self.set_state(partial);
        Ok(())
    }

    /// Register a listener called after every `set_state`, in registration
    /// order.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GlobalState, &KeySet) + 'static,
    {
        self.register(None, Box::new(listener))
    }

    /// Register a listener called only when one of `keys` changed value.
    pub fn subscribe_keys<F>(&self, keys: KeySet, listener: F) -> Subscription
    where
        F: Fn(&GlobalState, &KeySet) + 'static,
    {
        self.register(Some(keys), Box::new(listener))
    }

    fn register(&self, keys: Option<KeySet>, callback: Listener) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let entry = Rc::new(Entry {
            id,
            keys,
            active: Cell::new(true),
            callback,
        });
        let handle = Rc::downgrade(&entry);
        self.inner.listeners.borrow_mut().push(entry);
        tracing::trace!(id, "listener subscribed");

        Subscription {
            id,
            entry: Some(handle),
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Drop every listener and any queued update.
    pub fn teardown(&self) {
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        for entry in &listeners {
            entry.active.set(false);
        }
        self.inner.pending.borrow_mut().clear();
        tracing::debug!(released = listeners.len(), "store torn down");
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn run_cycle(&self, partial: Partial) {
        let changed = self.inner.state.borrow_mut().merge(partial);
        if self.inner.log_changes && !changed.is_empty() {
            tracing::debug!(changed = ?changed, "state changed");
        }

        // Listeners added during this cycle wait for the next one.
        let snapshot: Vec<Rc<Entry>> = self.inner.listeners.borrow().clone();
        tracing::trace!(listeners = snapshot.len(), "notifying subscribers");

        let _guard = CycleGuard::enter(&self.inner);

        for entry in snapshot {
            if !entry.active.get() {
                continue;
            }
            if let Some(keys) = &entry.keys {
                if !keys.intersects(&changed) {
                    continue;
                }
            }
            let state: Ref<'_, GlobalState> = self.inner.state.borrow();
            (entry.callback)(&state, &changed);
        }
    }
}

/// A non-owning store handle held by bound action callbacks.
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

impl WeakStore {
    /// Recover the store, or fail if it has been dropped.
    pub fn upgrade(&self) -> Result<Store> {
        self.inner
            .upgrade()
            .map(|inner| Store { inner })
            .ok_or(Error::StoreDropped)
    }
}

/// RAII handle for a registered listener.
///
/// Dropping it unsubscribes. Calling [`Subscription::unsubscribe`] more than
/// once is a no-op.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    entry: Option<Weak<Entry>>,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Remove the listener. It will not be called again, even later in a
    /// notification cycle that is already running.
    pub fn unsubscribe(&mut self) {
        let Some(entry) = self.entry.take() else {
            return;
        };
        if let Some(entry) = entry.upgrade() {
            entry.active.set(false);
        }
        if let Some(inner) = self.store.upgrade() {
            let removed = {
                let mut listeners = inner.listeners.borrow_mut();
                listeners
                    .iter()
                    .position(|e| e.id == self.id)
                    .map(|idx| listeners.remove(idx))
            };
            // The listener may own other subscriptions; drop it with the list
            // unborrowed.
            drop(removed);
            tracing::trace!(id = self.id, "listener unsubscribed");
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.entry
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|entry| entry.active.get())
    }

    /// Keep the listener registered for as long as the store lives.
    ///
    /// A detached listener that captures a `Store` clone keeps the store
    /// alive through an `Rc` cycle; only [`Store::teardown`] breaks it.
    /// Capture a [`WeakStore`] instead.
    pub fn detach(mut self) {
        self.entry = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
