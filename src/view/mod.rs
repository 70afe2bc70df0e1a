//! Component descriptions and the rendering boundary.

mod view;

pub use view::{element, link, text, Frames, Handler, RenderSink, View};
