//! Binding presentation components to the store.
//!
//! A [`Binder`] pairs a selection of state keys with a set of actions. It
//! wraps a [`Component`] into a [`Connected`] component which, once mounted,
//! renders from the store and renders again whenever its selected props
//! change.

mod binder;
mod select;

pub use binder::{bind, Binder, Component, Connected, Mount, Mounted, Static};
pub use select::{select_typed, Selectable};
