//! Client-side routing boundary.
//!
//! Routes are defined by the application as a [`RouteTable`]; the
//! [`Router`] mounts the component for the current path and unmounts the
//! previous one.

mod router;

pub use router::{Navigator, RouteTable, Router};
