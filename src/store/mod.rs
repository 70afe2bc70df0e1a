//! The state container.
//!
//! A [`Store`] holds the [`GlobalState`](crate::GlobalState), merges partial
//! updates into it and notifies listeners in the order they subscribed.

mod config;
mod store;

pub use config::StoreConfig;
pub use store::{Store, Subscription, WeakStore};
