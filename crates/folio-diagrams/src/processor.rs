//! Per-document diagram hook.
//!
//! During dispatch every diagram block becomes a placeholder comment and a
//! mounted [`DiagramView`]. After dispatch [`post_process`] renders each view
//! through the shared runtime, commits the outcome and substitutes the
//! view's markup for its placeholder in a single pass over the HTML.
//!
//! Placeholders start with `<`, which document text can never produce
//! unescaped.
//!
//! [`post_process`]: DiagramHook::post_process

use std::collections::HashMap;
use std::sync::Arc;

use folio_renderer::{ContentBlock, DiagramHook, Theme};

use crate::ids::instance_id;
use crate::runtime::DiagramRuntime;
use crate::view::{DiagramStatus, DiagramView, RenderJob};

const PLACEHOLDER_PREFIX: &str = "<!--DIAGRAM_";
const PLACEHOLDER_SUFFIX: &str = "-->";

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}")
}

/// Diagram hook for one document render.
pub struct DiagramProcessor {
    runtime: Arc<DiagramRuntime>,
    document_key: String,
    pending: Vec<(usize, RenderJob)>,
    views: Vec<DiagramView>,
    warnings: Vec<String>,
}

impl DiagramProcessor {
    /// `document_key` identifies the document (usually its path) and seeds
    /// the diagram instance ids.
    pub fn new(runtime: Arc<DiagramRuntime>, document_key: impl Into<String>) -> Self {
        Self {
            runtime,
            document_key: document_key.into(),
            pending: Vec::new(),
            views: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Views mounted during the render, in document order.
    #[must_use]
    pub fn views(&self) -> &[DiagramView] {
        &self.views
    }

    /// Take ownership of the views to keep them interactive after rendering.
    #[must_use]
    pub fn into_views(self) -> Vec<DiagramView> {
        self.views
    }
}

impl DiagramHook for DiagramProcessor {
    fn render_diagram(&mut self, block: &ContentBlock, index: usize, theme: Theme, out: &mut String) {
        let (view, job) = DiagramView::mount(instance_id(&self.document_key, index), &block.text, theme);
        self.views.push(view);
        self.pending.push((index, job));
        out.push_str(&placeholder(index));
    }

    fn post_process(&mut self, html: &mut String) {
        if self.pending.is_empty() {
            return;
        }

        let mut replacements = Replacements::with_capacity(self.pending.len());
        for ((index, job), view) in self.pending.drain(..).zip(self.views.iter_mut()) {
            let outcome = job.run(&self.runtime);
            view.commit(outcome);
            if let DiagramStatus::Failed(message) = view.status() {
                self.warnings.push(format!("diagram {index}: {message}"));
            }
            let mut markup = String::new();
            view.render_into(false, &mut markup);
            replacements.add(index, markup);
        }
        replacements.apply(html);
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Placeholder substitutions applied in one scan.
struct Replacements {
    map: HashMap<usize, String>,
}

impl Replacements {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    fn add(&mut self, index: usize, content: String) {
        self.map.insert(index, content);
    }

    /// Replace every known placeholder. Unknown or malformed ones stay as-is.
    fn apply(self, html: &mut String) {
        if self.map.is_empty() {
            return;
        }

        let mut result = String::with_capacity(html.len());
        let mut remaining = html.as_str();

        while let Some(start) = remaining.find(PLACEHOLDER_PREFIX) {
            result.push_str(&remaining[..start]);
            let after_prefix = &remaining[start + PLACEHOLDER_PREFIX.len()..];

            let Some(end) = after_prefix.find(PLACEHOLDER_SUFFIX) else {
                result.push_str(&remaining[start..]);
                remaining = "";
                break;
            };
            let whole = &remaining[start..start + PLACEHOLDER_PREFIX.len() + end + PLACEHOLDER_SUFFIX.len()];
            match after_prefix[..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.map.get(&index))
            {
                Some(replacement) => result.push_str(replacement),
                None => result.push_str(whole),
            }
            remaining = &after_prefix[end + PLACEHOLDER_SUFFIX.len()..];
        }

        result.push_str(remaining);
        *html = result;
    }
}
