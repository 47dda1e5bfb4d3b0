//! Interactive checklist with progress.

use std::fmt::Write;

use crate::node::{Element, Node};
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::escape_html;

/// Child marker recognised inside `Checklist`.
pub const ITEM_MARKER: &str = "Item";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChecklistItem {
    pub checked: bool,
    pub body: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Checklist {
    title: Option<String>,
    items: Vec<ChecklistItem>,
}

impl Checklist {
    #[must_use]
    pub fn new(title: Option<&str>, items: Vec<ChecklistItem>) -> Self {
        Self {
            title: title.map(str::to_owned),
            items,
        }
    }

    /// Convert a `Checklist` element, keeping `Item` children. `checked`
    /// on an item marks it done.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let items = element
            .element_children()
            .filter(|child| child.name == ITEM_MARKER)
            .map(|child| ChecklistItem {
                checked: child.flag("checked"),
                body: child.children.clone(),
            })
            .collect();
        Self::new(element.attr_nonempty("title"), items)
    }

    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Flip item `index`. Returns its new state, or `None` if out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.checked = !item.checked;
        Some(item.checked)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>, out: &mut String) {
        if self.items.is_empty() {
            return;
        }
        out.push_str(r#"<div class="checklist"><div class="checklist-header">"#);
        if let Some(title) = &self.title {
            let _ = write!(out, r#"<span class="checklist-title">{}</span>"#, escape_html(title));
        }
        let _ = write!(
            out,
            r#"<span class="checklist-progress">{}/{}</span></div><ul class="checklist-items">"#,
            self.completed(),
            self.items.len()
        );
        for (index, item) in self.items.iter().enumerate() {
            let checked = if item.checked { " checked" } else { "" };
            let _ = write!(
                out,
                r#"<li class="checklist-item" data-checked="{}"><label><input type="checkbox" data-index="{index}"{checked}> "#,
                item.checked
            );
            ctx.render_children(&item.body, out);
            out.push_str("</label></li>");
        }
        out.push_str("</ul></div>");
    }
}

pub(crate) struct ChecklistRenderer;

impl BlockRenderer for ChecklistRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        Checklist::from_element(element).render(ctx, out);
    }
}
