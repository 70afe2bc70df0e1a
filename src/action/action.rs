use crate::error::{Error, Result};
use crate::state::{GlobalState, Partial};
use crate::store::{Store, WeakStore};
use crate::view::Handler;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type ActionFn = dyn Fn(&GlobalState, &[Value]) -> Result<Partial>;

/// A named pure function producing a partial state update.
#[derive(Clone)]
pub struct Action {
    name: Rc<str>,
    run: Rc<ActionFn>,
}

impl Action {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&GlobalState, &[Value]) -> Result<Partial> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            run: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the action against `state`. Nothing is merged.
    pub fn invoke(&self, state: &GlobalState, args: &[Value]) -> Result<Partial> {
        (self.run)(state, args)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// An immutable set of actions, registered once at startup.
#[derive(Clone, Debug, Default)]
pub struct Actions {
    by_name: Rc<BTreeMap<String, Action>>,
}

impl Actions {
    pub fn builder() -> ActionsBuilder {
        ActionsBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.by_name.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Pre-bind every action to dispatch through `store`.
    pub fn bind(&self, store: &Store) -> BoundActions {
        BoundActions {
            actions: self.clone(),
            store: store.downgrade(),
        }
    }
}

/// Collects actions before they are frozen into [`Actions`].
#[derive(Default)]
pub struct ActionsBuilder {
    by_name: BTreeMap<String, Action>,
}

impl ActionsBuilder {
    /// Register an action. A later registration under the same name wins.
    pub fn action<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&GlobalState, &[Value]) -> Result<Partial> + 'static,
    {
        if self
            .by_name
            .insert(name.to_string(), Action::new(name, f))
            .is_some()
        {
            tracing::warn!(action = name, "action registered twice, keeping the later one");
        }
        self
    }

    pub fn build(self) -> Actions {
        Actions {
            by_name: Rc::new(self.by_name),
        }
    }
}

/// The capability a component uses to trigger state changes.
pub trait Dispatchable {
    /// Invoke the action called `name` with `args`.
    fn dispatch(&self, name: &str, args: &[Value]) -> Result<()>;
}

/// Action callbacks bound to a store.
///
/// Calling one computes `action(current_state, args)` and merges the result.
#[derive(Clone)]
pub struct BoundActions {
    actions: Actions,
    store: WeakStore,
}

impl BoundActions {
    pub fn call(&self, name: &str, args: &[Value]) -> Result<()> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;
        let store = self.store.upgrade()?;
        tracing::trace!(action = name, args = args.len(), "dispatching action");
        store.apply(action, args)
    }

    /// A zero-argument callback for `name`, suitable for an event handler.
    pub fn callback(&self, name: &str) -> impl Fn() -> Result<()> + 'static {
        let bound = self.clone();
        let name = name.to_string();
        move || bound.call(&name, &[])
    }

    /// An event handler that dispatches `name`, for attaching to a view.
    pub fn handler(&self, name: &str) -> Handler {
        Handler::new(name, self.callback(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.names()
    }
}

impl Dispatchable for BoundActions {
    fn dispatch(&self, name: &str, args: &[Value]) -> Result<()> {
        self.call(name, args)
    }
}

impl fmt::Debug for BoundActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundActions")
            .field("actions", &self.actions.names().collect::<Vec<_>>())
            .finish()
    }
}
