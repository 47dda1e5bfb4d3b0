//! Default rendering for elements without a registered renderer.
//!
//! Known HTML tags are emitted with filtered attributes. Anything else is
//! unwrapped: its children are rendered in place and the tag is dropped.

use std::collections::BTreeMap;

use crate::node::Element;
use crate::registry::RenderContext;
use crate::util::{escape_html, is_safe_url};

/// Tags emitted as-is by the default renderer.
const ALLOWED_TAGS: &[&str] = &[
    "abbr",
    "b",
    "br",
    "dd",
    "del",
    "details",
    "div",
    "dl",
    "dt",
    "em",
    "figcaption",
    "figure",
    "hr",
    "i",
    "input",
    "kbd",
    "li",
    "mark",
    "ol",
    "p",
    "s",
    "section",
    "small",
    "span",
    "strong",
    "sub",
    "summary",
    "sup",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "u",
    "ul",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "wbr"];

/// Attributes holding URLs.
const URL_ATTRS: &[&str] = &["href", "src", "poster", "action", "formaction", "xlink:href"];

pub(crate) fn render_element(element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
    let name = element.name.as_str();

    if !ALLOWED_TAGS.contains(&name) {
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            ctx.warn(format!("Unknown component <{name}> rendered as its children"));
        }
        ctx.render_children(&element.children, out);
        return;
    }

    // Only read-only checkboxes survive (GFM task lists)
    if name == "input" && element.attr("type") != Some("checkbox") {
        return;
    }

    // Images render as figures, which can't sit inside <p>
    if name == "p" && is_image_only(element) {
        ctx.render_children(&element.children, out);
        return;
    }

    write_open_tag(out, name, &element.attrs);
    if VOID_TAGS.contains(&name) {
        return;
    }
    ctx.render_children(&element.children, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Write `<name attrs...>` keeping only safe attributes.
pub(crate) fn write_open_tag(out: &mut String, name: &str, attrs: &BTreeMap<String, String>) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        if !is_safe_attribute(key, value) {
            continue;
        }
        write_attr(out, key, value);
    }
    out.push('>');
}

/// Write ` key="value"`, or a bare ` key` for an empty value.
pub(crate) fn write_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
}

fn is_image_only(element: &Element) -> bool {
    let mut saw_image = false;
    for child in &element.children {
        if child.is_blank_text() {
            continue;
        }
        match child.as_element() {
            Some(el) if el.name == "img" => saw_image = true,
            _ => return false,
        }
    }
    saw_image
}

fn is_safe_attribute(key: &str, value: &str) -> bool {
    let valid_name = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'));
    if !valid_name || key.to_ascii_lowercase().starts_with("on") {
        return false;
    }
    if URL_ATTRS.contains(&key.to_ascii_lowercase().as_str()) {
        return is_safe_url(value);
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::highlight::PlainHighlighter;
    use crate::node::{Element, Node};
    use crate::registry::{Registry, RenderOptions, RenderOutput};
    use pretty_assertions::assert_eq;

    fn render(nodes: &[Node]) -> RenderOutput {
        let registry = Registry::builder().build();
        let highlighter = PlainHighlighter;
        registry.render(nodes, RenderOptions::new(&highlighter))
    }

    #[test]
    fn test_allowed_tag_with_attrs() {
        let nodes = [Element::new("span")
            .with_attr("class", "badge")
            .with_text("new")
            .into()];
        assert_eq!(render(&nodes).html, r#"<span class="badge">new</span>"#);
    }

    #[test]
    fn test_event_handlers_dropped() {
        let nodes = [Element::new("div")
            .with_attr("onclick", "steal()")
            .with_attr("ONLOAD", "steal()")
            .with_text("x")
            .into()];
        assert_eq!(render(&nodes).html, "<div>x</div>");
    }

    #[test]
    fn test_unknown_tag_unwrapped() {
        let nodes = [Element::new("script").with_text("alert(1)").into()];
        let output = render(&nodes);
        assert_eq!(output.html, "alert(1)");
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_unknown_component_warns() {
        let nodes = [Element::new("Widget").with_text("body").into()];
        let output = render(&nodes);
        assert_eq!(output.html, "body");
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("Widget"));
    }

    #[test]
    fn test_void_tags() {
        let nodes = [
            Element::new("hr").into(),
            Element::new("input")
                .with_attr("type", "checkbox")
                .with_attr("checked", "")
                .into(),
        ];
        assert_eq!(render(&nodes).html, r#"<hr><input checked type="checkbox">"#);
    }

    #[test]
    fn test_non_checkbox_input_dropped() {
        let nodes = [Element::new("input").with_attr("type", "text").into()];
        assert_eq!(render(&nodes).html, "");
    }

    #[test]
    fn test_image_only_paragraph_unwrapped() {
        let nodes = [Element::new("p")
            .with_child(Element::new("img"))
            .with_text(" ")
            .into()];
        assert_eq!(render(&nodes).html, "");

        let mixed = [Element::new("p")
            .with_text("see ")
            .with_child(Element::new("img"))
            .into()];
        assert_eq!(render(&mixed).html, "<p>see </p>");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let nodes = [Element::new("span")
            .with_attr("title", r#"a"b<c"#)
            .into()];
        assert_eq!(render(&nodes).html, r#"<span title="a&quot;b&lt;c"></span>"#);
    }
}
