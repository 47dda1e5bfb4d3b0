//! Headings with anchors and table of contents entries.

use std::fmt::Write;

use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::escape_html;

pub(crate) struct HeadingRenderer {
    level: u8,
}

impl HeadingRenderer {
    pub(crate) fn new(level: u8) -> Self {
        Self { level }
    }
}

impl BlockRenderer for HeadingRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let title = element.text_content();
        let title = title.trim();
        let id = ctx.heading_anchor(self.level, title, element.attr_nonempty("id"));

        let _ = write!(out, r#"<h{} id="{}">"#, self.level, escape_html(&id));
        ctx.render_children(&element.children, out);
        let _ = write!(
            out,
            r##"<a class="heading-anchor" href="#{}" aria-hidden="true">#</a></h{}>"##,
            escape_html(&id),
            self.level
        );
    }
}
