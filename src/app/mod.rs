//! The demo application: a counter page and an about page.

mod about;
mod counter;

pub use about::about;
pub use counter::{click, counter_actions, counter_app, initial_state, CounterProps};

use crate::router::RouteTable;

/// `/` shows the counter, `/about` the about page.
pub fn routes() -> RouteTable {
    RouteTable::new()
        .route("/", counter_app())
        .route("/about", about())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Navigator, Router};
    use crate::store::Store;
    use crate::view::Frames;
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn counter_survives_round_trip_through_about() {
        let store = Store::new(initial_state());
        let frames = Frames::new();
        let mut router = Router::new(routes(), store.clone(), Rc::new(frames.clone()));

        router.navigate("/").unwrap();
        click(&frames.last().unwrap(), "increment-btn").unwrap();
        router.navigate("/about").unwrap();
        assert_eq!(store.subscriber_count(), 0);
        assert!(click(&frames.last().unwrap(), "increment-btn").is_err());

        // The counter is unmounted, so this renders nothing.
        counter_actions().bind(&store).call("increment", &[]).unwrap();
        let before = frames.len();

        router.navigate("/").unwrap();
        assert_eq!(frames.len(), before + 1);
        assert!(frames.last().unwrap().to_string().contains("<h2>2</h2>"));
        assert_eq!(store.get_state().get("count"), Some(&json!(2)));
    }
}
