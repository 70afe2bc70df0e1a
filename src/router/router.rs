use crate::binder::{Mount, Mounted};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::view::RenderSink;
use std::collections::BTreeMap;
use std::rc::Rc;

/// The navigation capability handed to views.
pub trait Navigator {
    /// Switch to the component registered for `path`.
    fn navigate(&mut self, path: &str) -> Result<()>;

    /// The path currently shown, if any.
    fn current(&self) -> Option<&str>;
}

/// Path to component mapping, supplied by the application.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Rc<dyn Mount>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under `path`, builder style.
    pub fn route<M: Mount + 'static>(mut self, path: impl Into<String>, component: M) -> Self {
        self.routes.insert(path.into(), Rc::new(component));
        self
    }

    pub fn get(&self, path: &str) -> Option<Rc<dyn Mount>> {
        self.routes.get(path).cloned()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

/// Keeps exactly one routed component mounted.
pub struct Router {
    table: RouteTable,
    store: Store,
    sink: Rc<dyn RenderSink>,
    active: Option<(String, Mounted)>,
}

impl Router {
    pub fn new(table: RouteTable, store: Store, sink: Rc<dyn RenderSink>) -> Self {
        Self {
            table,
            store,
            sink,
            active: None,
        }
    }

    /// The mounted component for the current path.
    pub fn mounted(&self) -> Option<&Mounted> {
        self.active.as_ref().map(|(_, mounted)| mounted)
    }

    /// Unmount whatever is shown.
    pub fn clear(&mut self) {
        if let Some((path, mounted)) = self.active.take() {
            tracing::debug!(path = %path, "unmounting route");
            mounted.unmount();
        }
    }
}

impl Navigator for Router {
    fn navigate(&mut self, path: &str) -> Result<()> {
        if self.current() == Some(path) {
            return Ok(());
        }
        let component = self
            .table
            .get(path)
            .ok_or_else(|| Error::NoRoute(path.to_string()))?;

        self.clear();
        let mounted = component.mount(&self.store, Rc::clone(&self.sink))?;
        tracing::debug!(path, "mounted route");
        self.active = Some((path.to_string(), mounted));
        Ok(())
    }

    fn current(&self) -> Option<&str> {
        self.active.as_ref().map(|(path, _)| path.as_str())
    }
}
