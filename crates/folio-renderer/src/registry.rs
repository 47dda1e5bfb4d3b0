//! Block dispatch registry.
//!
//! Maps element names to renderers. The registry is built once and shared by
//! every render. Each entry is exposed either as a standard element (`a`,
//! `code`, `h2`) or as a named component (`Callout`, `Tabs`). Compiled
//! documents resolve both; restricted documents (raw markdown) resolve only
//! standard elements. Unresolved names fall back to default HTML rendering.

use std::collections::HashMap;
use std::fmt;

use crate::anchors::{AnchorIds, TocEntry};
use crate::block::ContentBlock;
use crate::blocks::{self, DEFAULT_FAVICON_SERVICE, LinkCardView, LinkPreviewMetadata};
use crate::highlight::Highlighter;
use crate::html;
use crate::node::{Element, Node};
use crate::theme::Theme;
use crate::util::escape_html;

/// Renders one element kind.
pub trait BlockRenderer: Send + Sync {
    /// Append markup for `element` to `out`.
    ///
    /// Children are rendered through [`RenderContext::render_children`] so
    /// nested elements go through the same dispatch.
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String);
}

/// Diagram rendering hook.
///
/// Called for every `code` element classified as a diagram. Implementations
/// usually emit a placeholder and substitute rendered output in
/// [`post_process`](Self::post_process), once the whole document has been
/// walked.
pub trait DiagramHook {
    /// Render the diagram at zero-based document position `index`.
    fn render_diagram(&mut self, block: &ContentBlock, index: usize, theme: Theme, out: &mut String);

    /// Finalize the document HTML.
    fn post_process(&mut self, _html: &mut String) {}

    /// Warnings collected while rendering diagrams.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Link card hook.
///
/// Called for every `LinkCard` with a usable href. Implementations own the
/// card's metadata fetch and write the finished card to `out`.
pub trait LinkCardHook {
    fn render_card(
        &mut self,
        href: &str,
        overrides: LinkPreviewMetadata,
        favicon_service: &str,
        out: &mut String,
    );
}

/// How a registry entry may be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exposure {
    /// Standard element name, resolvable from any document.
    Standard,
    /// Named component, resolvable only from compiled documents.
    Component,
}

/// Which entries a document may resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Compiled documents: standard elements and components.
    #[default]
    Compiled,
    /// Raw markdown: standard elements only.
    Restricted,
}

impl DispatchMode {
    fn allows(self, exposure: Exposure) -> bool {
        match self {
            Self::Compiled => true,
            Self::Restricted => exposure == Exposure::Standard,
        }
    }
}

struct Registration {
    exposure: Exposure,
    renderer: Box<dyn BlockRenderer>,
}

/// Name → renderer table.
pub struct Registry {
    entries: HashMap<String, Registration>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_default_blocks()
    }
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with the full block library.
    #[must_use]
    pub fn with_default_blocks() -> Self {
        blocks::register_defaults(Self::builder()).build()
    }

    /// Resolve `name` for a document in `mode`.
    #[must_use]
    pub fn lookup(&self, name: &str, mode: DispatchMode) -> Option<&dyn BlockRenderer> {
        self.entries
            .get(name)
            .filter(|entry| mode.allows(entry.exposure))
            .map(|entry| entry.renderer.as_ref())
    }

    /// Registered names with the given exposure, sorted.
    #[must_use]
    pub fn names(&self, exposure: Exposure) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.exposure == exposure)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Render a document tree.
    pub fn render<'a>(&'a self, nodes: &[Node], options: RenderOptions<'a>) -> RenderOutput {
        let mut ctx = RenderContext::new(self, options);
        let mut html = String::with_capacity(4096);
        ctx.render_children(nodes, &mut html);

        let RenderContext {
            options,
            toc,
            mut warnings,
            ..
        } = ctx;
        if let Some(hook) = options.diagrams {
            hook.post_process(&mut html);
            warnings.extend(hook.warnings().iter().cloned());
        }

        RenderOutput {
            html,
            toc,
            warnings,
        }
    }

    fn dispatch(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        match self.lookup(&element.name, ctx.mode()) {
            Some(renderer) => renderer.render(element, ctx, out),
            None => html::render_element(element, ctx, out),
        }
    }
}

/// Builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Registration>,
}

impl RegistryBuilder {
    /// Register a standard element renderer. Replaces any existing entry.
    #[must_use]
    pub fn standard(self, name: impl Into<String>, renderer: impl BlockRenderer + 'static) -> Self {
        self.insert(name.into(), Exposure::Standard, Box::new(renderer))
    }

    /// Register a component renderer. Replaces any existing entry.
    #[must_use]
    pub fn component(
        self,
        name: impl Into<String>,
        renderer: impl BlockRenderer + 'static,
    ) -> Self {
        self.insert(name.into(), Exposure::Component, Box::new(renderer))
    }

    fn insert(mut self, name: String, exposure: Exposure, renderer: Box<dyn BlockRenderer>) -> Self {
        self.entries.insert(name, Registration { exposure, renderer });
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Per-render inputs.
pub struct RenderOptions<'a> {
    mode: DispatchMode,
    theme: Theme,
    highlighter: &'a dyn Highlighter,
    diagrams: Option<&'a mut dyn DiagramHook>,
    link_cards: Option<&'a mut dyn LinkCardHook>,
    favicon_service: &'a str,
    base_path: Option<&'a str>,
}

impl<'a> RenderOptions<'a> {
    /// Compiled mode, light theme, no diagram or link card hook.
    pub fn new(highlighter: &'a dyn Highlighter) -> Self {
        Self {
            mode: DispatchMode::Compiled,
            theme: Theme::Light,
            highlighter,
            diagrams: None,
            link_cards: None,
            favicon_service: DEFAULT_FAVICON_SERVICE,
            base_path: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Route diagram blocks to `hook`. Without one they render as code.
    #[must_use]
    pub fn with_diagrams(mut self, hook: &'a mut dyn DiagramHook) -> Self {
        self.diagrams = Some(hook);
        self
    }

    /// Route link cards to `hook`. Without one cards show overrides only.
    #[must_use]
    pub fn with_link_cards(mut self, hook: &'a mut dyn LinkCardHook) -> Self {
        self.link_cards = Some(hook);
        self
    }

    /// Favicon URL template; `{host}` is replaced with the link's hostname.
    #[must_use]
    pub fn with_favicon_service(mut self, template: &'a str) -> Self {
        self.favicon_service = template;
        self
    }

    /// Base directory for resolving relative `.md` links.
    #[must_use]
    pub fn with_base_path(mut self, base_path: &'a str) -> Self {
        self.base_path = Some(base_path);
        self
    }
}

/// Result of rendering a document.
#[derive(Clone, Debug, Default)]
pub struct RenderOutput {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub warnings: Vec<String>,
}

/// Mutable state threaded through one render.
pub struct RenderContext<'a> {
    registry: &'a Registry,
    options: RenderOptions<'a>,
    anchors: AnchorIds,
    toc: Vec<TocEntry>,
    warnings: Vec<String>,
    diagram_index: usize,
    sequences: HashMap<&'static str, usize>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(registry: &'a Registry, options: RenderOptions<'a>) -> Self {
        Self {
            registry,
            options,
            anchors: AnchorIds::default(),
            toc: Vec::new(),
            warnings: Vec::new(),
            diagram_index: 0,
            sequences: HashMap::new(),
        }
    }

    /// Render nodes through the registry.
    pub fn render_children(&mut self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            self.render_node(node, out);
        }
    }

    /// Render one node through the registry.
    pub fn render_node(&mut self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(element) => {
                let registry = self.registry;
                registry.dispatch(element, self, out);
            }
        }
    }

    /// Render nodes into a fresh string.
    pub fn render_to_string(&mut self, nodes: &[Node]) -> String {
        let mut out = String::new();
        self.render_children(nodes, &mut out);
        out
    }

    #[must_use]
    pub fn mode(&self) -> DispatchMode {
        self.options.mode
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.options.theme
    }

    #[must_use]
    pub fn highlighter(&self) -> &'a dyn Highlighter {
        self.options.highlighter
    }

    #[must_use]
    pub fn favicon_service(&self) -> &'a str {
        self.options.favicon_service
    }

    #[must_use]
    pub fn base_path(&self) -> Option<&'a str> {
        self.options.base_path
    }

    /// Record a non-fatal problem with the document.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Next value of a per-render counter, starting at 0.
    ///
    /// Used for element IDs that must be unique within the output.
    pub fn next_sequence(&mut self, kind: &'static str) -> usize {
        let counter = self.sequences.entry(kind).or_insert(0);
        let value = *counter;
        *counter += 1;
        value
    }

    /// Assign an anchor to a heading and record it in the table of contents.
    pub(crate) fn heading_anchor(&mut self, level: u8, title: &str, explicit: Option<&str>) -> String {
        let id = match explicit {
            Some(id) => self.anchors.claim(id.to_owned()),
            None => self.anchors.generate(title),
        };
        self.toc.push(TocEntry {
            level,
            title: title.to_owned(),
            id: id.clone(),
        });
        id
    }

    /// Render a link card through the hook, or from `overrides` alone.
    pub(crate) fn render_link_card(
        &mut self,
        href: &str,
        overrides: LinkPreviewMetadata,
        out: &mut String,
    ) {
        let favicon_service = self.options.favicon_service;
        match self.options.link_cards.as_deref_mut() {
            Some(hook) => hook.render_card(href, overrides, favicon_service, out),
            None => LinkCardView::resolve(href, &overrides, favicon_service).render(true, out),
        }
    }

    /// Hand a diagram block to the hook. Returns `false` when none is set.
    pub(crate) fn render_diagram(&mut self, block: &ContentBlock, out: &mut String) -> bool {
        let theme = self.options.theme;
        let Some(hook) = self.options.diagrams.as_deref_mut() else {
            return false;
        };
        hook.render_diagram(block, self.diagram_index, theme, out);
        self.diagram_index += 1;
        true
    }
}
