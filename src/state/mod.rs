//! Shared state data model.
//!
//! A [`GlobalState`] maps string keys to arbitrary JSON values. Updates are
//! shallow [`Partial`] maps; a [`KeySet`] names the keys a subscriber
//! watches and a [`Slice`] is what it sees of the state.

mod state;

pub use state::{GlobalState, KeySet, Partial, Slice};
