//! Numbered steps.

use std::fmt::Write;

use crate::node::{Element, Node};
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::escape_html;

/// Child marker recognised inside `Steps`.
pub const STEP_MARKER: &str = "Step";

/// One step: optional title plus body content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub title: Option<String>,
    pub body: Vec<Node>,
}

/// Ordered sequence of steps.
///
/// Built from explicit [`Step`] descriptors. [`from_element`](Self::from_element)
/// converts a `Steps` element, keeping `Step` children and dropping the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepsBlock {
    steps: Vec<Step>,
}

impl StepsBlock {
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let steps = element
            .element_children()
            .filter(|child| child.name == STEP_MARKER)
            .map(|child| Step {
                title: child.attr_nonempty("title").map(str::to_owned),
                body: child.children.clone(),
            })
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>, out: &mut String) {
        if self.steps.is_empty() {
            return;
        }
        out.push_str(r#"<ol class="steps">"#);
        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            let _ = write!(
                out,
                r#"<li class="step" data-step="{number}"><div class="step-marker" aria-hidden="true">{number}</div><div class="step-body">"#
            );
            if let Some(title) = &step.title {
                let _ = write!(out, r#"<div class="step-title">{}</div>"#, escape_html(title));
            }
            ctx.render_children(&step.body, out);
            out.push_str("</div></li>");
        }
        out.push_str("</ol>");
    }
}

pub(crate) struct StepsRenderer;

impl BlockRenderer for StepsRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        StepsBlock::from_element(element).render(ctx, out);
    }
}
