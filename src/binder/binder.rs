use crate::action::{Actions, BoundActions};
use crate::binder::Selectable;
use crate::error::Result;
use crate::state::{GlobalState, KeySet, Slice};
use crate::store::{Store, Subscription};
use crate::view::{RenderSink, View};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A presentation component: props and bound actions in, view out.
pub trait Component<P> {
    fn render(&self, props: &P, actions: &BoundActions) -> View;
}

impl<P, F> Component<P> for F
where
    F: Fn(&P, &BoundActions) -> View,
{
    fn render(&self, props: &P, actions: &BoundActions) -> View {
        self(props, actions)
    }
}

/// Anything that can be mounted against a store and a render sink.
pub trait Mount {
    fn mount(&self, store: &Store, sink: Rc<dyn RenderSink>) -> Result<Mounted>;
}

type SelectFn<P> = dyn Fn(&GlobalState) -> Result<P>;

/// Connects components to a slice of state and a set of actions.
pub struct Binder<P> {
    keys: KeySet,
    select: Rc<SelectFn<P>>,
    actions: Actions,
}

/// Bind a component to `keys` and `actions`, seeing the raw [`Slice`].
pub fn bind(keys: KeySet, actions: Actions) -> Binder<Slice> {
    Binder::new(keys, actions)
}

impl Binder<Slice> {
    pub fn new(keys: KeySet, actions: Actions) -> Self {
        let selected = keys.clone();
        Self {
            keys,
            select: Rc::new(move |state: &GlobalState| -> Result<Slice> {
                Ok(state.slice(&selected))
            }),
            actions,
        }
    }
}

impl<P: Selectable> Binder<P> {
    /// Bind to the keys declared by `P`.
    pub fn typed(actions: Actions) -> Self {
        Self {
            keys: P::keys(),
            select: Rc::new(P::select),
            actions,
        }
    }
}

impl<P: PartialEq + 'static> Binder<P> {
    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Wrap `component` so it renders from the store.
    pub fn wrap<C>(&self, component: C) -> Connected<P>
    where
        C: Component<P> + 'static,
    {
        Connected {
            keys: self.keys.clone(),
            select: Rc::clone(&self.select),
            actions: self.actions.clone(),
            component: Rc::new(component),
        }
    }
}

/// A component wrapped by a [`Binder`], ready to mount.
pub struct Connected<P> {
    keys: KeySet,
    select: Rc<SelectFn<P>>,
    actions: Actions,
    component: Rc<dyn Component<P>>,
}

impl<P: PartialEq + 'static> Connected<P> {
    /// Render against `store` and keep rendering on relevant changes.
    ///
    /// Updates dispatched while mounting, including from the first render,
    /// are applied after the subscription is in place.
    pub fn mount(&self, store: &Store, sink: Rc<dyn RenderSink>) -> Result<Mounted> {
        store.batch(|| self.mount_now(store, sink))
    }

    fn mount_now(&self, store: &Store, sink: Rc<dyn RenderSink>) -> Result<Mounted> {
        let actions = self.actions.bind(store);
        let props = store.read(|state| (self.select)(state))?;
        sink.emit(self.component.render(&props, &actions));

        let renders = Rc::new(Cell::new(1));
        let previous = RefCell::new(props);

        let select = Rc::clone(&self.select);
        let component = Rc::clone(&self.component);
        let counter = Rc::clone(&renders);
        let subscription = store.subscribe_keys(self.keys.clone(), move |state, changed| {
            let next = match select(state) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!(changed = ?changed, error = %e, "skipping render, selection failed");
                    return;
                }
            };
            if *previous.borrow() == next {
                return;
            }
            let view = component.render(&next, &actions);
            *previous.borrow_mut() = next;
            counter.set(counter.get() + 1);
            sink.emit(view);
        });

        Ok(Mounted {
            subscription: Some(subscription),
            renders,
        })
    }
}

impl<P: PartialEq + 'static> Mount for Connected<P> {
    fn mount(&self, store: &Store, sink: Rc<dyn RenderSink>) -> Result<Mounted> {
        Connected::mount(self, store, sink)
    }
}

/// A component that reads no state. It renders once on mount.
pub struct Static<F>(pub F);

impl<F> Mount for Static<F>
where
    F: Fn() -> View,
{
    fn mount(&self, _store: &Store, sink: Rc<dyn RenderSink>) -> Result<Mounted> {
        sink.emit((self.0)());
        Ok(Mounted {
            subscription: None,
            renders: Rc::new(Cell::new(1)),
        })
    }
}

/// A mounted component. Dropping it unmounts.
pub struct Mounted {
    subscription: Option<Subscription>,
    renders: Rc<Cell<usize>>,
}

impl Mounted {
    /// Release the store subscription.
    pub fn unmount(mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// How many times the component has rendered, the initial render included.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Actions;
    use crate::error::Error;
    use crate::state::Partial;
    use crate::view::{element, text, Frames};
    use serde_json::{json, Value};

    fn store() -> Store {
        Store::new(GlobalState::try_from(json!({ "count": 0, "other": "a" })).unwrap())
    }

    fn increment() -> Actions {
        Actions::builder()
            .action("increment", |state, _| {
                let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
                Ok(Partial::new().with("count", count + 1))
            })
            .build()
    }

    fn show_count(slice: &Slice, _: &BoundActions) -> View {
        element("h2").child(text(slice.get("count").cloned().unwrap_or(Value::Null)))
    }

    #[test]
    fn mount_renders_and_follows_changes() {
        let store = store();
        let frames = Frames::new();
        let connected = bind(["count"].into_iter().collect(), increment()).wrap(show_count);

        let mounted = connected.mount(&store, Rc::new(frames.clone())).unwrap();
        assert_eq!(frames.last().unwrap().text_content(), "0");

        increment().bind(&store).call("increment", &[]).unwrap();
        assert_eq!(frames.last().unwrap().text_content(), "1");
        assert_eq!(mounted.render_count(), 2);
    }

    #[test]
    fn unrelated_key_does_not_render() {
        let store = store();
        let frames = Frames::new();
        let connected = bind(["count"].into_iter().collect(), increment()).wrap(show_count);
        let mounted = connected.mount(&store, Rc::new(frames.clone())).unwrap();

        store.set_state(Partial::new().with("other", "b"));

        assert_eq!(mounted.render_count(), 1);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn equal_selection_does_not_render() {
        let store = store();
        let frames = Frames::new();
        let keys: KeySet = ["count", "other"].into_iter().collect();
        let connected = Binder::new(keys, increment()).wrap(show_count);
        let mounted = connected.mount(&store, Rc::new(frames.clone())).unwrap();

        // Overwrite with identical values.
        store.set_state(Partial::new().with("count", 0).with("other", "a"));
        assert_eq!(mounted.render_count(), 1);
    }

    #[test]
    fn unmount_releases_subscription() {
        let store = store();
        let frames = Frames::new();
        let connected = bind(["count"].into_iter().collect(), increment()).wrap(show_count);
        let mounted = connected.mount(&store, Rc::new(frames.clone())).unwrap();
        assert!(mounted.is_subscribed());
        assert_eq!(store.subscriber_count(), 1);

        mounted.unmount();
        assert_eq!(store.subscriber_count(), 0);

        store.set_state(Partial::new().with("count", 9));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn dispatch_during_render_is_deferred() {
        let store = store();
        let frames = Frames::new();
        // Renders keep bumping the counter until it reaches 3.
        let connected = bind(["count"].into_iter().collect(), increment()).wrap(
            |slice: &Slice, actions: &BoundActions| {
                let count = slice.get("count").and_then(Value::as_i64).unwrap_or(0);
                if count < 3 {
                    actions.call("increment", &[]).unwrap();
                }
                element("h2").child(text(count))
            },
        );

        let mounted = connected.mount(&store, Rc::new(frames.clone())).unwrap();

        let rendered: Vec<String> = frames.all().iter().map(View::text_content).collect();
        assert_eq!(rendered, vec!["0", "1", "2", "3"]);
        assert_eq!(mounted.render_count(), 4);
    }

    #[test]
    fn selection_failure_on_mount_is_returned() {
        #[derive(PartialEq)]
        struct Strict(i64);

        let store = store();
        let binder: Binder<Strict> = Binder {
            keys: ["count"].into_iter().collect(),
            select: Rc::new(|_: &GlobalState| -> Result<Strict> {
                Err(Error::NoRoute("x".into()))
            }),
            actions: Actions::default(),
        };
        let connected = binder.wrap(|p: &Strict, _: &BoundActions| text(p.0));

        assert!(connected.mount(&store, Rc::new(Frames::new())).is_err());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn static_component_renders_once() {
        let store = store();
        let frames = Frames::new();
        let mounted = Static(|| text("hello"))
            .mount(&store, Rc::new(frames.clone()))
            .unwrap();

        store.set_state(Partial::new().with("count", 1));
        assert_eq!(frames.len(), 1);
        assert!(!mounted.is_subscribed());
    }
}
