//! Callouts and GFM alert blockquotes.

use std::fmt::Write;

use crate::html::write_open_tag;
use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::escape_html;

// SVG icons (GitHub Octicons-style, 16x16)
const SVG_INFO: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M0 8a8 8 0 1 1 16 0A8 8 0 0 1 0 8Zm8-6.5a6.5 6.5 0 1 0 0 13 6.5 6.5 0 0 0 0-13ZM6.5 7.75A.75.75 0 0 1 7.25 7h1a.75.75 0 0 1 .75.75v2.75h.25a.75.75 0 0 1 0 1.5h-2a.75.75 0 0 1 0-1.5h.25v-2h-.25a.75.75 0 0 1-.75-.75ZM8 6a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z"></path></svg>"#;
const SVG_NOTE: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M0 1.75C0 .784.784 0 1.75 0h12.5C15.216 0 16 .784 16 1.75v9.5A1.75 1.75 0 0 1 14.25 13H8.06l-2.573 2.573A1.458 1.458 0 0 1 3 14.543V13H1.75A1.75 1.75 0 0 1 0 11.25Zm1.75-.25a.25.25 0 0 0-.25.25v9.5c0 .138.112.25.25.25h2a.75.75 0 0 1 .75.75v2.19l2.72-2.72a.749.749 0 0 1 .53-.22h6.5a.25.25 0 0 0 .25-.25v-9.5a.25.25 0 0 0-.25-.25Zm7 2.25v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 9a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z"></path></svg>"#;
const SVG_TIP: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M8 1.5c-2.363 0-4 1.69-4 3.75 0 .984.424 1.625.984 2.304l.214.253c.223.264.47.556.673.848.284.411.537.896.621 1.49a.75.75 0 0 1-1.484.211c-.04-.282-.163-.547-.37-.847a8.456 8.456 0 0 0-.542-.68c-.084-.1-.173-.205-.268-.32C3.201 7.75 2.5 6.766 2.5 5.25 2.5 2.31 4.863 0 8 0s5.5 2.31 5.5 5.25c0 1.516-.701 2.5-1.328 3.259-.095.115-.184.22-.268.319-.207.245-.383.453-.541.681-.208.3-.33.565-.37.847a.751.751 0 0 1-1.485-.212c.084-.593.337-1.078.621-1.489.203-.292.45-.584.673-.848.075-.088.147-.173.213-.253.561-.679.985-1.32.985-2.304 0-2.06-1.637-3.75-4-3.75ZM5.75 12h4.5a.75.75 0 0 1 0 1.5h-4.5a.75.75 0 0 1 0-1.5ZM6 15.25a.75.75 0 0 1 .75-.75h2.5a.75.75 0 0 1 0 1.5h-2.5a.75.75 0 0 1-.75-.75Z"></path></svg>"#;
const SVG_SUCCESS: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M8 0a8 8 0 1 1 0 16A8 8 0 0 1 8 0Zm3.78 5.22a.75.75 0 0 0-1.06 0L7 8.94 5.28 7.22a.75.75 0 0 0-1.06 1.06l2.25 2.25a.75.75 0 0 0 1.06 0l4.25-4.25a.75.75 0 0 0 0-1.06Z"></path></svg>"#;
const SVG_WARNING: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M6.457 1.047c.659-1.234 2.427-1.234 3.086 0l6.082 11.378A1.75 1.75 0 0 1 14.082 15H1.918a1.75 1.75 0 0 1-1.543-2.575Zm1.763.707a.25.25 0 0 0-.44 0L1.698 13.132a.25.25 0 0 0 .22.368h12.164a.25.25 0 0 0 .22-.368Zm.53 3.996v2.5a.75.75 0 0 1-1.5 0v-2.5a.75.75 0 0 1 1.5 0ZM9 11a1 1 0 1 1-2 0 1 1 0 0 1 2 0Z"></path></svg>"#;
const SVG_DANGER: &str = r#"<svg class="callout-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M4.47.22A.749.749 0 0 1 5 0h6c.199 0 .389.079.53.22l4.25 4.25c.141.14.22.331.22.53v6a.749.749 0 0 1-.22.53l-4.25 4.25A.749.749 0 0 1 11 16H5a.749.749 0 0 1-.53-.22L.22 11.53A.749.749 0 0 1 0 11V5c0-.199.079-.389.22-.53Zm.84 1.28L1.5 5.31v5.38l3.81 3.81h5.38l3.81-3.81V5.31L10.69 1.5ZM8 4a.75.75 0 0 1 .75.75v3.5a.75.75 0 0 1-1.5 0v-3.5A.75.75 0 0 1 8 4Zm0 8a1 1 0 1 1 0-2 1 1 0 0 1 0 2Z"></path></svg>"#;

/// Callout severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    #[default]
    Info,
    Note,
    Tip,
    Success,
    Warning,
    Danger,
}

impl CalloutKind {
    pub const ALL: [Self; 6] = [
        Self::Info,
        Self::Note,
        Self::Tip,
        Self::Success,
        Self::Warning,
        Self::Danger,
    ];

    /// Parse a variant name, case-insensitively, accepting common aliases.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "info" | "important" => Some(Self::Info),
            "note" => Some(Self::Note),
            "tip" | "hint" => Some(Self::Tip),
            "success" | "check" => Some(Self::Success),
            "warning" | "warn" => Some(Self::Warning),
            "danger" | "caution" | "error" => Some(Self::Danger),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Title shown when the author supplies none.
    #[must_use]
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => SVG_INFO,
            Self::Note => SVG_NOTE,
            Self::Tip => SVG_TIP,
            Self::Success => SVG_SUCCESS,
            Self::Warning => SVG_WARNING,
            Self::Danger => SVG_DANGER,
        }
    }
}

/// Callout display state.
///
/// Collapsible callouts carry their own open/closed flag, initialised from
/// the default-open setting and flipped by [`toggle`](Self::toggle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Callout {
    kind: CalloutKind,
    title: Option<String>,
    collapsible: bool,
    open: bool,
}

impl Callout {
    #[must_use]
    pub fn new(kind: CalloutKind) -> Self {
        Self {
            kind,
            title: None,
            collapsible: false,
            open: true,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_owned);
        self
    }

    /// Make the callout collapsible, initially open or closed.
    #[must_use]
    pub fn collapsible(mut self, default_open: bool) -> Self {
        self.collapsible = true;
        self.open = default_open;
        self
    }

    /// Build from a `Callout` element's props.
    ///
    /// `type` selects the variant (unknown values fall back to info),
    /// `title` overrides the heading, `collapsible` and `defaultOpen` control
    /// collapsing.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let kind = element
            .attr("type")
            .and_then(CalloutKind::parse)
            .unwrap_or_default();
        let callout = Self::new(kind).with_title(element.attr_nonempty("title"));
        if element.flag("collapsible") {
            let default_open = element.attr("defaultOpen").is_none() || element.flag("defaultOpen");
            callout.collapsible(default_open)
        } else {
            callout
        }
    }

    #[must_use]
    pub fn kind(&self) -> CalloutKind {
        self.kind
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the open state of a collapsible callout. Returns the new state.
    /// Non-collapsible callouts stay open.
    pub fn toggle(&mut self) -> bool {
        if self.collapsible {
            self.open = !self.open;
        }
        self.open
    }

    /// Render with the given (already rendered) body markup.
    pub fn render(&self, body: &str, out: &mut String) {
        let kind = self.kind.as_str();
        let icon = self.kind.icon();
        let title = escape_html(self.title.as_deref().unwrap_or(self.kind.default_title()));

        if self.collapsible {
            let open = if self.open { " open" } else { "" };
            let _ = write!(
                out,
                r#"<details class="callout callout-{kind}"{open}><summary class="callout-title">{icon}{title}</summary><div class="callout-content">{body}</div></details>"#
            );
        } else {
            let _ = write!(
                out,
                r#"<div class="callout callout-{kind}" role="note"><div class="callout-title">{icon}{title}</div><div class="callout-content">{body}</div></div>"#
            );
        }
    }
}

pub(crate) struct CalloutRenderer;

impl BlockRenderer for CalloutRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        if let Some(kind) = element.attr("type")
            && CalloutKind::parse(kind).is_none()
        {
            ctx.warn(format!("Unknown callout type '{kind}', using info"));
        }
        let callout = Callout::from_element(element);
        let body = ctx.render_to_string(&element.children);
        callout.render(&body, out);
    }
}

/// Blockquotes, routing GFM alerts (`data-callout`) to the callout renderer.
pub(crate) struct BlockquoteRenderer;

impl BlockRenderer for BlockquoteRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        match element.attr("data-callout").and_then(CalloutKind::parse) {
            Some(kind) => {
                let body = ctx.render_to_string(&element.children);
                Callout::new(kind).render(&body, out);
            }
            None => {
                let mut attrs = element.attrs.clone();
                attrs.remove("data-callout");
                write_open_tag(out, "blockquote", &attrs);
                ctx.render_children(&element.children, out);
                out.push_str("</blockquote>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::highlight::PlainHighlighter;
    use crate::markdown::parse_markdown;
    use crate::registry::{DispatchMode, Registry, RenderOptions};
    use pretty_assertions::assert_eq;

    fn render_markdown(markdown: &str) -> String {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let doc = parse_markdown(markdown);
        registry
            .render(
                &doc.nodes,
                RenderOptions::new(&highlighter).with_mode(DispatchMode::Restricted),
            )
            .html
    }

    #[test]
    fn test_parse_variants_and_aliases() {
        assert_eq!(CalloutKind::parse("WARNING"), Some(CalloutKind::Warning));
        assert_eq!(CalloutKind::parse("caution"), Some(CalloutKind::Danger));
        assert_eq!(CalloutKind::parse("error"), Some(CalloutKind::Danger));
        assert_eq!(CalloutKind::parse("important"), Some(CalloutKind::Info));
        assert_eq!(CalloutKind::parse("check"), Some(CalloutKind::Success));
        assert_eq!(CalloutKind::parse("sparkly"), None);
    }

    #[test]
    fn test_every_variant_has_distinct_icon() {
        let icons: HashSet<&str> = CalloutKind::ALL.iter().map(|k| k.icon()).collect();
        assert_eq!(icons.len(), CalloutKind::ALL.len());
        assert_eq!(icons.len(), 6);
    }

    #[test]
    fn test_render_plain_callout() {
        let mut out = String::new();
        Callout::new(CalloutKind::Tip).render("<p>Body</p>", &mut out);
        assert!(out.starts_with(r#"<div class="callout callout-tip" role="note">"#));
        assert!(out.contains("Tip</div>"));
        assert!(out.contains(r#"<div class="callout-content"><p>Body</p></div>"#));
    }

    #[test]
    fn test_collapsible_toggle() {
        let mut callout = Callout::new(CalloutKind::Note).collapsible(false);
        assert!(!callout.is_open());
        assert!(callout.toggle());
        assert!(!callout.toggle());

        let mut out = String::new();
        callout.render("", &mut out);
        assert!(out.starts_with(r#"<details class="callout callout-note">"#));
    }

    #[test]
    fn test_non_collapsible_stays_open() {
        let mut callout = Callout::new(CalloutKind::Info);
        assert!(callout.toggle());
        assert!(callout.is_open());
    }

    #[test]
    fn test_from_element_props() {
        let el = Element::new("Callout")
            .with_attr("type", "danger")
            .with_attr("title", "Heads up")
            .with_attr("collapsible", "true")
            .with_attr("defaultOpen", "false");
        let callout = Callout::from_element(&el);
        assert_eq!(callout.kind(), CalloutKind::Danger);
        assert!(!callout.is_open());

        let mut out = String::new();
        callout.render("", &mut out);
        assert!(out.contains("Heads up</summary>"));
    }

    #[test]
    fn test_collapsible_defaults_open() {
        let el = Element::new("Callout").with_attr("collapsible", "");
        assert!(Callout::from_element(&el).is_open());
    }

    #[test]
    fn test_gfm_alert_renders_as_callout() {
        let html = render_markdown("> [!WARNING]\n> Mind the gap.");
        assert!(html.contains(r#"class="callout callout-warning""#));
        assert!(html.contains("Mind the gap."));
        assert!(!html.contains("<blockquote"));
    }

    #[test]
    fn test_plain_blockquote() {
        let html = render_markdown("> quoted");
        assert_eq!(html, "<blockquote><p>quoted</p></blockquote>");
    }
}
