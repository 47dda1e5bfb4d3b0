//! Block library: the renderers installed by [`Registry::with_default_blocks`].
//!
//! Standard elements (`a`, `img`, `code`, `pre`, `blockquote`, `h1`-`h6`)
//! resolve in every document. Components (`Callout`, `Steps`, `Tabs`,
//! `FileTree`, `Terminal`, `Checklist`, `LinkCard`) only resolve in compiled
//! documents.
//!
//! [`Registry::with_default_blocks`]: crate::Registry::with_default_blocks

mod callout;
mod checklist;
mod code;
mod file_tree;
mod heading;
mod link;
mod link_card;
mod marker;
mod steps;
mod tabs;
mod terminal;

pub use callout::{Callout, CalloutKind};
pub use checklist::{Checklist, ChecklistItem, ITEM_MARKER};
pub use file_tree::{EntryKind, FileTree, FileTreeEntry, INDENT_UNIT};
pub use link_card::{
    DEFAULT_FAVICON_SERVICE, LinkCardView, LinkMetadataSource, LinkPreviewMetadata, favicon_url,
    hostname,
};
pub use steps::{STEP_MARKER, Step, StepsBlock};
pub use tabs::{TAB_MARKER, TabItem, TabsBlock, tab_key};
pub use terminal::Terminal;

use crate::registry::RegistryBuilder;

/// Install the default block library into `builder`.
pub(crate) fn register_defaults(builder: RegistryBuilder) -> RegistryBuilder {
    let mut builder = builder
        .standard("a", link::LinkRenderer)
        .standard("img", link::ImageRenderer)
        .standard("code", code::CodeRenderer)
        .standard("pre", code::PreRenderer)
        .standard("blockquote", callout::BlockquoteRenderer);
    for level in 1..=6u8 {
        builder = builder.standard(format!("h{level}"), heading::HeadingRenderer::new(level));
    }

    builder
        .component("Callout", callout::CalloutRenderer)
        .component("Steps", steps::StepsRenderer)
        .component(STEP_MARKER, marker::MarkerRenderer::new("Steps"))
        .component("Tabs", tabs::TabsRenderer)
        .component(TAB_MARKER, marker::MarkerRenderer::new("Tabs"))
        .component("FileTree", file_tree::FileTreeRenderer)
        .component("Terminal", terminal::TerminalRenderer)
        .component("Checklist", checklist::ChecklistRenderer)
        .component(ITEM_MARKER, marker::MarkerRenderer::new("Checklist"))
        .component("LinkCard", link_card::LinkCardRenderer)
}
