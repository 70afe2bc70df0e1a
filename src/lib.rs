//! # Unibind
//!
//! A global state container with key-scoped subscriptions, and a binder that
//! connects presentation components to it.
//!
//! ## Store (state container)
//!
//! - `Store` - Holds the `GlobalState`, merges partial updates, notifies
//!   subscribers in registration order
//! - `Subscription` - RAII handle; dropping or unsubscribing releases the listener
//! - `Action` / `Actions` - Named pure functions `(state, args) -> Partial`
//!
//! ## Binder (view glue)
//!
//! - `Binder<P>` - Selects props `P` from the state and pre-binds actions
//! - `Connected<P>` - A wrapped component that re-renders only when its
//!   selected props change
//! - `Router` - Mounts one routed component at a time
//!
//! Everything is single-threaded. Updates issued while subscribers are being
//! notified are queued and applied once the current cycle ends.

pub mod action;
pub mod app;
pub mod binder;
mod error;
pub mod router;
pub mod state;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use action::{Action, Actions, BoundActions, Dispatchable};
pub use binder::{bind, Binder, Component, Connected, Mounted, Selectable};
pub use error::{ConfigError, Error, Result};
pub use router::{Navigator, RouteTable, Router};
pub use state::{GlobalState, KeySet, Partial, Slice};
pub use store::{Store, StoreConfig, Subscription};
pub use view::{RenderSink, View};
