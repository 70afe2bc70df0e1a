use crate::binder::Static;
use crate::view::{element, link, text, View};

const BLURB: &str = "This is a counter app rendered from a shared store. \
                     It uses unibind for state management and routing.";

fn render() -> View {
    element("div")
        .child(element("p").child(text(BLURB)))
        .child(link("/", "Home"))
}

/// A static page linking back home.
pub fn about() -> Static<fn() -> View> {
    Static(render as fn() -> View)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_home() {
        let view = render();
        assert_eq!(view.links(), vec!["/"]);
        assert!(view.text_content().contains("shared store"));
    }
}
