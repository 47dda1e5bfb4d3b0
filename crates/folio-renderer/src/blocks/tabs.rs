//! Tabbed content.
//!
//! Every panel stays in the output; inactive panels carry `hidden`. Switching
//! tabs only moves the active marker, so panel content is never rebuilt and
//! keeps whatever state it had.
//!
//! ```html
//! <div class="tabs" id="tabs-0">
//!   <div class="tabs-buttons" role="tablist">
//!     <button role="tab" id="tab-0-0" aria-controls="panel-0-0"
//!             aria-selected="true" tabindex="0" data-key="macos">macOS</button>
//!     <button role="tab" id="tab-0-1" aria-controls="panel-0-1"
//!             aria-selected="false" tabindex="-1" data-key="linux">Linux</button>
//!   </div>
//!   <div role="tabpanel" id="panel-0-0" aria-labelledby="tab-0-0" data-key="macos">...</div>
//!   <div role="tabpanel" id="panel-0-1" aria-labelledby="tab-0-1" data-key="linux" hidden>...</div>
//! </div>
//! ```

use std::collections::HashSet;
use std::fmt::Write;

use crate::node::{Element, Node};
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::{escape_html, slugify};

/// Child marker recognised inside `Tabs`.
pub const TAB_MARKER: &str = "Tab";

/// One tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabItem {
    /// Stable key used for selection.
    pub key: String,
    pub label: String,
    pub body: Vec<Node>,
}

/// Key for a tab: the explicit value, else the slugified label, else `tab-<index>`.
///
/// ```
/// use folio_renderer::tab_key;
///
/// assert_eq!(tab_key("Mac OS", None, 0), "mac-os");
/// assert_eq!(tab_key("Mac OS", Some("darwin"), 0), "darwin");
/// assert_eq!(tab_key("日本語", None, 2), "tab-2");
/// ```
#[must_use]
pub fn tab_key(label: &str, explicit: Option<&str>, index: usize) -> String {
    if let Some(value) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_owned();
    }
    let slug = slugify(label);
    if slug.is_empty() {
        format!("tab-{index}")
    } else {
        slug
    }
}

/// Tab set with one active tab.
///
/// Keys are unique: the first tab with a key wins and later tabs with the
/// same key are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabsBlock {
    items: Vec<TabItem>,
    active: usize,
    dropped: Vec<TabItem>,
}

impl TabsBlock {
    /// Create a tab set. The tab whose key equals `default_value` starts
    /// active; otherwise the first one does.
    #[must_use]
    pub fn new(items: Vec<TabItem>, default_value: Option<&str>) -> Self {
        let mut seen = HashSet::new();
        let (items, dropped): (Vec<_>, Vec<_>) = items
            .into_iter()
            .partition(|item| seen.insert(item.key.clone()));
        let active = default_value
            .and_then(|value| items.iter().position(|item| item.key == value))
            .unwrap_or(0);
        Self {
            items,
            active,
            dropped,
        }
    }

    /// Convert a `Tabs` element, keeping `Tab` children and dropping the rest.
    ///
    /// Each `Tab` takes its label from `label` (or `title`) and its key from
    /// `value`. The container's `defaultValue` picks the initial tab.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let items = element
            .element_children()
            .filter(|child| child.name == TAB_MARKER)
            .enumerate()
            .map(|(index, child)| {
                let label = child
                    .attr_nonempty("label")
                    .or_else(|| child.attr_nonempty("title"))
                    .map_or_else(|| format!("Tab {}", index + 1), str::to_owned);
                TabItem {
                    key: tab_key(&label, child.attr("value"), index),
                    label,
                    body: child.children.clone(),
                }
            })
            .collect();
        Self::new(items, element.attr_nonempty("defaultValue"))
    }

    #[must_use]
    pub fn items(&self) -> &[TabItem] {
        &self.items
    }

    /// Tabs discarded because an earlier tab had the same key.
    #[must_use]
    pub fn dropped(&self) -> &[TabItem] {
        &self.dropped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_key(&self) -> Option<&str> {
        self.items.get(self.active).map(|item| item.key.as_str())
    }

    /// Activate the first tab with `key`. Returns `false` if there is none.
    pub fn select(&mut self, key: &str) -> bool {
        match self.items.iter().position(|item| item.key == key) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Render as tab group number `group`.
    pub(crate) fn render(&self, group: usize, ctx: &mut RenderContext<'_>, out: &mut String) {
        if self.items.is_empty() {
            return;
        }

        let _ = write!(out, r#"<div class="tabs" id="tabs-{group}">"#);
        out.push_str(r#"<div class="tabs-buttons" role="tablist">"#);
        for (index, item) in self.items.iter().enumerate() {
            let selected = index == self.active;
            let _ = write!(
                out,
                r#"<button role="tab" id="tab-{group}-{index}" aria-controls="panel-{group}-{index}" aria-selected="{selected}" tabindex="{}" data-key="{}">{}</button>"#,
                if selected { "0" } else { "-1" },
                escape_html(&item.key),
                escape_html(&item.label)
            );
        }
        out.push_str("</div>");

        for (index, item) in self.items.iter().enumerate() {
            let hidden = if index == self.active { "" } else { " hidden" };
            let _ = write!(
                out,
                r#"<div role="tabpanel" id="panel-{group}-{index}" aria-labelledby="tab-{group}-{index}" data-key="{}"{hidden}>"#,
                escape_html(&item.key)
            );
            ctx.render_children(&item.body, out);
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
}

pub(crate) struct TabsRenderer;

impl BlockRenderer for TabsRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let tabs = TabsBlock::from_element(element);
        for item in tabs.dropped() {
            ctx.warn(format!(
                "Tab '{}' dropped: key '{}' is already used in this tab group",
                item.label, item.key
            ));
        }
        if tabs.is_empty() {
            return;
        }
        let group = ctx.next_sequence("tabs");
        tabs.render(group, ctx, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainHighlighter;
    use crate::registry::{Registry, RenderOptions};
    use pretty_assertions::assert_eq;

    fn tab(label: &str, body: &str) -> Element {
        Element::new("Tab")
            .with_attr("label", label)
            .with_child(Element::new("p").with_text(body))
    }

    fn render_block(tabs: &TabsBlock) -> String {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let mut ctx = RenderContext::new(&registry, RenderOptions::new(&highlighter));
        let mut out = String::new();
        tabs.render(0, &mut ctx, &mut out);
        out
    }

    /// Body markup of the panel with `key`.
    fn panel(html: &str, key: &str) -> String {
        let marker = r#"role="tabpanel" "#;
        let key_attr = format!(r#"data-key="{key}""#);
        let start = html
            .match_indices(marker)
            .map(|(i, _)| i)
            .find(|&i| html[i..].split('>').next().unwrap().contains(&key_attr))
            .unwrap();
        let body_start = start + html[start..].find('>').unwrap() + 1;
        let body_end = body_start + html[body_start..].find("</div>").unwrap();
        html[body_start..body_end].to_owned()
    }

    #[test]
    fn test_key_derivation() {
        assert_eq!(tab_key("npm install", None, 0), "npm-install");
        assert_eq!(tab_key("C++ / Rust!", None, 1), "c-rust");
        assert_eq!(tab_key("???", None, 3), "tab-3");
        assert_eq!(tab_key("x", Some("  "), 0), "x");
    }

    #[test]
    fn test_first_tab_active_by_default() {
        let tabs = TabsBlock::from_element(
            &Element::new("Tabs")
                .with_child(tab("A", "alpha"))
                .with_child(tab("B", "beta")),
        );
        assert_eq!(tabs.active_key(), Some("a"));
    }

    #[test]
    fn test_default_value_selects_tab() {
        let tabs = TabsBlock::from_element(
            &Element::new("Tabs")
                .with_attr("defaultValue", "b")
                .with_child(tab("A", "alpha"))
                .with_child(tab("B", "beta")),
        );
        assert_eq!(tabs.active_index(), 1);
    }

    #[test]
    fn test_unknown_default_value_falls_back_to_first() {
        let tabs = TabsBlock::from_element(
            &Element::new("Tabs")
                .with_attr("defaultValue", "zzz")
                .with_child(tab("A", "alpha")),
        );
        assert_eq!(tabs.active_index(), 0);
    }

    #[test]
    fn test_switching_preserves_panel_content() {
        let mut tabs = TabsBlock::from_element(
            &Element::new("Tabs")
                .with_child(tab("A", "alpha"))
                .with_child(tab("B", "beta")),
        );
        let initial = render_block(&tabs);
        let alpha = panel(&initial, "a");
        let beta = panel(&initial, "b");
        assert!(alpha.contains("alpha"));
        assert!(beta.contains("beta"));

        assert!(tabs.select("b"));
        let switched = render_block(&tabs);
        assert!(switched.contains(r#"data-key="a" hidden>"#));
        assert!(!switched.contains(r#"data-key="b" hidden>"#));

        assert!(tabs.select("a"));
        let back = render_block(&tabs);
        assert_eq!(panel(&back, "a"), alpha);
        assert_eq!(panel(&back, "b"), beta);
        assert_eq!(back, initial);
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let mut tabs = TabsBlock::from_element(
            &Element::new("Tabs")
                .with_child(tab("Install", "first"))
                .with_child(tab("Usage", "usage"))
                .with_child(tab("Install", "second")),
        );
        let keys: Vec<_> = tabs.items().iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, ["install", "usage"]);
        assert_eq!(tabs.dropped().len(), 1);

        assert!(tabs.select("install"));
        let html = render_block(&tabs);
        assert!(panel(&html, "install").contains("first"));
        assert!(!html.contains("second"));
        assert_eq!(html.matches(r#"aria-controls="panel-0-"#).count(), 2);
    }

    #[test]
    fn test_duplicate_key_warns() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let element = Element::new("Tabs")
            .with_child(tab("Install", "first"))
            .with_child(tab("Install", "second"));
        let output = registry.render(&[element.into()], RenderOptions::new(&highlighter));
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("'install'"));
    }

    #[test]
    fn test_select_unknown_key() {
        let mut tabs = TabsBlock::new(Vec::new(), None);
        assert!(!tabs.select("a"));
        assert_eq!(tabs.active_key(), None);
    }

    #[test]
    fn test_non_tab_children_ignored_and_empty_renders_nothing() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let element = Element::new("Tabs").with_child(Element::new("p").with_text("stray"));
        let output = registry.render(&[element.into()], RenderOptions::new(&highlighter));
        assert_eq!(output.html, "");
    }

    #[test]
    fn test_group_ids_unique_per_document() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let group = || -> Node {
            Element::new("Tabs").with_child(tab("A", "x")).into()
        };
        let output = registry.render(&[group(), group()], RenderOptions::new(&highlighter));
        assert!(output.html.contains(r#"id="tabs-0""#));
        assert!(output.html.contains(r#"id="tabs-1""#));
    }
}
