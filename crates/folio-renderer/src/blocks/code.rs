//! `code` and `pre` elements.
//!
//! Inline code stays inline. Block code goes to the diagram hook when tagged
//! `mermaid` and one is configured, otherwise to [`CodeBlock`].

use crate::block::ContentBlock;
use crate::code_block::CodeBlock;
use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::escape_html;

pub(crate) struct CodeRenderer;

impl BlockRenderer for CodeRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let block = ContentBlock::classify(element);
        if block.is_inline {
            out.push_str("<code>");
            out.push_str(&escape_html(&block.text));
            out.push_str("</code>");
            return;
        }
        render_block(element, &block, ctx, out);
    }
}

/// Unwraps `pre > code` so the code element decides the rendering.
pub(crate) struct PreRenderer;

impl BlockRenderer for PreRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let mut significant = element.children.iter().filter(|n| !n.is_blank_text());
        let code = match (significant.next(), significant.next()) {
            (Some(node), None) => node.as_element().filter(|el| el.name == "code"),
            _ => None,
        };

        match code {
            // A fenced block without a language and on one line still
            // belongs in a block
            Some(code) => render_block(code, &ContentBlock::classify(code), ctx, out),
            None => {
                out.push_str("<pre>");
                out.push_str(&escape_html(&element.text_content()));
                out.push_str("</pre>");
            }
        }
    }
}

fn render_block(element: &Element, block: &ContentBlock, ctx: &mut RenderContext<'_>, out: &mut String) {
    if block.is_diagram() && ctx.render_diagram(block, out) {
        return;
    }

    let line_numbers = element.flag("showLineNumbers") || element.flag("lineNumbers");
    CodeBlock::new(&block.text, block.language.as_deref())
        .with_title(element.attr("title"))
        .with_line_numbers(line_numbers)
        .render_into(ctx.theme(), ctx.highlighter(), false, out);
}
