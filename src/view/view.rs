use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An event callback attached to an element.
///
/// Handlers compare by label, so views stay comparable.
#[derive(Clone)]
pub struct Handler {
    label: String,
    run: Rc<dyn Fn() -> Result<()>>,
}

impl Handler {
    pub fn new<F>(label: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> Result<()> + 'static,
    {
        Self {
            label: label.into(),
            run: Rc::new(run),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn call(&self) -> Result<()> {
        (self.run)()
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.label).finish()
    }
}

/// A component description handed to the rendering engine.
///
/// The binder never diffs or paints these; it only emits them.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        handlers: Vec<(String, Handler)>,
        children: Vec<View>,
    },
    Text(String),
    Link {
        href: String,
        children: Vec<View>,
    },
}

/// Start an element node.
pub fn element(tag: impl Into<String>) -> View {
    View::Element {
        tag: tag.into(),
        attrs: Vec::new(),
        handlers: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(content: impl fmt::Display) -> View {
    View::Text(content.to_string())
}

/// A client-side navigation link.
pub fn link(href: impl Into<String>, label: impl fmt::Display) -> View {
    View::Link {
        href: href.into(),
        children: vec![text(label)],
    }
}

impl View {
    /// Add an attribute. Ignored on text and link nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let View::Element { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    /// Attach a handler for `event`. Ignored on text and link nodes.
    pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        if let View::Element { handlers, .. } = &mut self {
            handlers.push((event.into(), handler));
        }
        self
    }

    /// Run the handler this element holds for `event`.
    pub fn fire(&self, event: &str) -> Result<()> {
        let handler = match self {
            View::Element { handlers, .. } => handlers
                .iter()
                .find(|(name, _)| name == event)
                .map(|(_, handler)| handler),
            _ => None,
        };
        handler
            .ok_or_else(|| Error::NoHandler(event.to_string()))?
            .call()
    }

    /// Append a child. Ignored on text nodes.
    pub fn child(mut self, node: View) -> Self {
        match &mut self {
            View::Element { children, .. } | View::Link { children, .. } => children.push(node),
            View::Text(_) => {}
        }
        self
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            View::Text(s) => s.clone(),
            View::Element { children, .. } | View::Link { children, .. } => {
                children.iter().map(View::text_content).collect()
            }
        }
    }

    /// Depth-first search for the first element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&View> {
        match self {
            View::Element {
                attrs, children, ..
            } => {
                let matches = attrs
                    .iter()
                    .any(|(k, v)| k == "class" && v.split_whitespace().any(|c| c == class));
                if matches {
                    return Some(self);
                }
                children.iter().find_map(|c| c.find_by_class(class))
            }
            View::Link { children, .. } => children.iter().find_map(|c| c.find_by_class(class)),
            View::Text(_) => None,
        }
    }

    /// Every link target in document order.
    pub fn links(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            View::Link { href, children } => {
                out.push(href);
                children.iter().for_each(|c| c.collect_links(out));
            }
            View::Element { children, .. } => children.iter().for_each(|c| c.collect_links(out)),
            View::Text(_) => {}
        }
    }
}

fn escape(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ch in s.chars() {
        match ch {
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '&' => f.write_str("&amp;")?,
            '"' => f.write_str("&quot;")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Text(s) => escape(s, f),
            View::Element {
                tag,
                attrs,
                children,
                ..
            } => {
                write!(f, "<{tag}")?;
                for (name, value) in attrs {
                    write!(f, " {name}=\"")?;
                    escape(value, f)?;
                    f.write_str("\"")?;
                }
                f.write_str(">")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
            View::Link { href, children } => {
                f.write_str("<a href=\"")?;
                escape(href, f)?;
                f.write_str("\">")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                f.write_str("</a>")
            }
        }
    }
}

/// The rendering engine's side of the boundary.
pub trait RenderSink {
    fn emit(&self, view: View);
}

/// A sink that records every emitted view.
#[derive(Clone, Default)]
pub struct Frames {
    frames: Rc<RefCell<Vec<View>>>,
}

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    /// The most recently emitted view.
    pub fn last(&self) -> Option<View> {
        self.frames.borrow().last().cloned()
    }

    pub fn all(&self) -> Vec<View> {
        self.frames.borrow().clone()
    }
}

impl RenderSink for Frames {
    fn emit(&self, view: View) {
        self.frames.borrow_mut().push(view);
    }
}
