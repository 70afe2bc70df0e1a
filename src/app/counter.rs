use crate::action::{Actions, BoundActions};
use crate::binder::{select_typed, Binder, Connected, Selectable};
use crate::error::{Error, Result};
use crate::state::{GlobalState, KeySet, Partial};
use crate::view::{element, link, text, View};
use serde::Deserialize;

/// The slice of state the counter reads.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CounterProps {
    pub count: i64,
}

impl Selectable for CounterProps {
    fn keys() -> KeySet {
        ["count"].into_iter().collect()
    }

    fn select(state: &GlobalState) -> Result<Self> {
        select_typed(state, &Self::keys())
    }
}

/// `{ count: 0 }`
pub fn initial_state() -> GlobalState {
    let mut state = GlobalState::new();
    state.merge(Partial::new().with("count", 0));
    state
}

fn count_of(action: &str, state: &GlobalState) -> Result<i64> {
    let value = state.get("count");
    value.and_then(|v| v.as_i64()).ok_or_else(|| Error::Action {
        action: action.to_string(),
        message: match value {
            Some(v) => format!("count must be an integer, found {v}"),
            None => "count is missing".to_string(),
        },
    })
}

fn step(action: &str, state: &GlobalState, by: i64) -> Result<Partial> {
    let count = count_of(action, state)?;
    let next = count.checked_add(by).ok_or_else(|| Error::Action {
        action: action.to_string(),
        message: format!("count {count} would overflow"),
    })?;
    Ok(Partial::new().with("count", next))
}

/// `increment` and `decrement`, each moving `count` by one.
pub fn counter_actions() -> Actions {
    Actions::builder()
        .action("increment", |state, _| step("increment", state, 1))
        .action("decrement", |state, _| step("decrement", state, -1))
        .build()
}

fn render(props: &CounterProps, actions: &BoundActions) -> View {
    element("div")
        .child(element("h2").child(text(props.count)))
        .child(
            element("button")
                .attr("class", "increment-btn")
                .on("click", actions.handler("increment"))
                .child(text("Increment")),
        )
        .child(
            element("button")
                .attr("class", "decrement-btn")
                .on("click", actions.handler("decrement"))
                .child(text("Decrement")),
        )
        .child(link("/about", "About"))
}

/// The counter view bound to `count` and both counter actions.
pub fn counter_app() -> Connected<CounterProps> {
    Binder::<CounterProps>::typed(counter_actions()).wrap(render)
}

/// Fire the click handler of the element with class `class` in `view`.
///
/// Stands in for the event a DOM renderer would deliver.
pub fn click(view: &View, class: &str) -> Result<()> {
    view.find_by_class(class)
        .ok_or_else(|| Error::NoHandler(format!("click on .{class}")))?
        .fire("click")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::view::Frames;
    use serde_json::json;
    use std::rc::Rc;

    fn mounted_counter() -> (Store, Frames, crate::binder::Mounted) {
        let store = Store::new(initial_state());
        let frames = Frames::new();
        let mounted = counter_app().mount(&store, Rc::new(frames.clone())).unwrap();
        (store, frames, mounted)
    }

    #[test]
    fn renders_count_and_controls() {
        let (_store, frames, _mounted) = mounted_counter();

        let view = frames.last().unwrap();
        assert!(view.to_string().starts_with("<div><h2>0</h2>"));
        assert!(view.find_by_class("increment-btn").is_some());
        assert!(view.find_by_class("decrement-btn").is_some());
        assert_eq!(view.links(), vec!["/about"]);
    }

    #[test]
    fn clicks_go_through_the_rendered_handlers() {
        let (store, frames, _mounted) = mounted_counter();

        click(&frames.last().unwrap(), "increment-btn").unwrap();
        click(&frames.last().unwrap(), "increment-btn").unwrap();
        click(&frames.last().unwrap(), "decrement-btn").unwrap();

        assert_eq!(store.get_state().get("count"), Some(&json!(1)));
        assert_eq!(frames.len(), 4);
        assert!(frames.last().unwrap().to_string().contains("<h2>1</h2>"));
    }

    #[test]
    fn unknown_class_is_not_an_action() {
        let (store, frames, _mounted) = mounted_counter();

        let err = click(&frames.last().unwrap(), "increment").unwrap_err();
        assert!(matches!(err, Error::NoHandler(_)));
        assert_eq!(store.get_state().get("count"), Some(&json!(0)));
    }

    #[test]
    fn non_integer_count_is_an_action_error() {
        let store = Store::new(GlobalState::try_from(json!({ "count": 1.5 })).unwrap());
        let actions = counter_actions().bind(&store);

        let err = actions.call("increment", &[]).unwrap_err();
        assert!(matches!(err, Error::Action { ref action, .. } if action == "increment"));
        assert_eq!(store.get_state().get("count"), Some(&json!(1.5)));
    }

    #[test]
    fn overflow_is_an_action_error() {
        let store = Store::new(GlobalState::try_from(json!({ "count": i64::MAX })).unwrap());
        let actions = counter_actions().bind(&store);

        assert!(matches!(actions.call("increment", &[]), Err(Error::Action { .. })));
        actions.call("decrement", &[]).unwrap();
        assert_eq!(store.get_state().get("count"), Some(&json!(i64::MAX - 1)));

        store.set_state(Partial::new().with("count", i64::MIN));
        assert!(matches!(actions.call("decrement", &[]), Err(Error::Action { .. })));
    }

    #[test]
    fn typed_selection_rejects_wrong_shape() {
        let mut state = initial_state();
        state.merge(Partial::new().with("count", "zero"));
        assert!(CounterProps::select(&state).is_err());
    }
}
