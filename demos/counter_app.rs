//! The counter and about pages driven through the router.
//!
//! Run with `RUST_LOG=unibind=debug cargo run --example counter_app` to see
//! the store's change events.

use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use unibind::app::{click, routes};
use unibind::view::Frames;
use unibind::{Navigator, Router, Store, StoreConfig};

const CONFIG: &str = r#"
log_changes = true

[initial_state]
count = 0
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter App ===\n");

    let config = StoreConfig::from_toml_str(CONFIG)?;
    let store = Store::from_config(&config);
    let frames = Frames::new();
    let mut router = Router::new(routes(), store.clone(), Rc::new(frames.clone()));

    let show = |frames: &Frames| {
        if let Some(view) = frames.last() {
            println!("   {view}");
        }
    };

    println!("1. Home");
    router.navigate("/")?;
    show(&frames);

    println!("\n2. Clicking");
    for class in ["increment-btn", "decrement-btn"].iter().cycle().take(5) {
        println!("   click .{class}");
        if let Some(view) = frames.last() {
            click(&view, class)?;
        }
        show(&frames);
    }

    println!("\n3. About");
    router.navigate("/about")?;
    show(&frames);

    println!("\n4. Back home");
    router.navigate("/")?;
    show(&frames);

    router.clear();
    store.teardown();
    println!("\n✓ {} frames rendered", frames.len());
    Ok(())
}
