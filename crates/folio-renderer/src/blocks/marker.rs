//! Marker components met outside their container.

use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};

/// Renders nothing and records a warning.
///
/// Containers read their markers directly, so reaching this renderer means
/// the marker was misplaced.
pub(crate) struct MarkerRenderer {
    container: &'static str,
}

impl MarkerRenderer {
    pub(crate) fn new(container: &'static str) -> Self {
        Self { container }
    }
}

impl BlockRenderer for MarkerRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, _out: &mut String) {
        ctx.warn(format!(
            "<{}> outside <{}> ignored",
            element.name, self.container
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::highlight::PlainHighlighter;
    use crate::node::Element;
    use crate::registry::{Registry, RenderOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stray_marker_renders_nothing() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let output = registry.render(
            &[Element::new("Tab").with_text("orphan").into()],
            RenderOptions::new(&highlighter),
        );
        assert_eq!(output.html, "");
        assert_eq!(output.warnings, ["<Tab> outside <Tabs> ignored"]);
    }
}
