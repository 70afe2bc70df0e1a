//! Actions and the callbacks bound from them.
//!
//! An [`Action`] is a pure function `(state, args) -> Partial`. Actions are
//! collected into an immutable [`Actions`] set at startup and bound to a
//! store as [`BoundActions`], which is what components receive.

mod action;
pub mod args;

pub use action::{Action, Actions, ActionsBuilder, BoundActions, Dispatchable};
