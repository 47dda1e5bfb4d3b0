//! Links and images.

use std::fmt::Write;

use crate::html::write_attr;
use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::{escape_html, is_external_url, is_safe_url, resolve_link};

pub(crate) struct LinkRenderer;

impl BlockRenderer for LinkRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let Some(href) = element.attr("href") else {
            out.push_str("<a>");
            ctx.render_children(&element.children, out);
            out.push_str("</a>");
            return;
        };
        if !is_safe_url(href) {
            ctx.warn(format!("Link with unsafe href '{href}' rendered as text"));
            ctx.render_children(&element.children, out);
            return;
        }

        let href = match ctx.base_path() {
            Some(base) => resolve_link(href, base),
            None => href.to_owned(),
        };
        out.push_str("<a");
        write_attr(out, "href", &href);
        if let Some(title) = element.attr_nonempty("title") {
            write_attr(out, "title", title);
        }
        if is_external_url(&href) {
            out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
        }
        out.push('>');
        ctx.render_children(&element.children, out);
        out.push_str("</a>");
    }
}

/// Images render as figures that open the preview on activation.
pub(crate) struct ImageRenderer;

impl BlockRenderer for ImageRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let Some(src) = element.attr_nonempty("src") else {
            ctx.warn("Image without src ignored");
            return;
        };
        if !is_safe_url(src) {
            ctx.warn(format!("Image with unsafe src '{src}' ignored"));
            return;
        }

        let alt = element.attr("alt").unwrap_or_default();
        let _ = write!(
            out,
            r#"<figure class="image"><img src="{}" alt="{}""#,
            escape_html(src),
            escape_html(alt)
        );
        let title = element.attr_nonempty("title");
        if let Some(title) = title {
            write_attr(out, "title", title);
        }
        out.push_str(r#" loading="lazy" data-preview-trigger="image">"#);
        if let Some(caption) = title {
            let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(caption));
        }
        out.push_str("</figure>");
    }
}
