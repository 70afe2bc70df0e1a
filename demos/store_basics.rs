//! Store subscriptions without any views

use serde_json::json;
use unibind::{GlobalState, KeySet, Partial, Store};

fn main() {
    println!("=== Store Basics ===\n");

    let initial = GlobalState::try_from(json!({ "count": 0, "theme": "light" }))
        .unwrap_or_default();
    let store = Store::new(initial);

    println!("1. Setting up subscribers");
    let _all = store.subscribe(|state, changed| {
        println!("   [all] changed {:?} -> {}", changed, json!(state.as_map()));
    });
    let count_keys: KeySet = ["count"].into_iter().collect();
    let mut count_only = store.subscribe_keys(count_keys, |state, _| {
        println!("   [count] now {}", state.get("count").unwrap_or(&json!(null)));
    });

    println!("\n2. Updating count");
    store.set_state(Partial::new().with("count", 1));

    println!("\n3. Updating theme (count subscriber stays quiet)");
    store.set_state(Partial::new().with("theme", "dark"));

    println!("\n4. Unsubscribing the count subscriber twice");
    count_only.unsubscribe();
    count_only.unsubscribe();
    store.set_state(Partial::new().with("count", 2));

    println!("\n5. Final state: {}", json!(store.get_state().as_map()));
    println!("\n✓ Example complete!");
}
