//! Document rendering for folio.
//!
//! Documents are trees of [`Node`]s: either compiled component documents
//! (deserialized from JSON) or raw markdown parsed with [`parse_markdown`].
//! A [`Registry`] maps element names to [`BlockRenderer`]s and walks the tree
//! into HTML.
//!
//! # Architecture
//!
//! - [`resolve_language`] normalizes fence tags against a fixed language set
//! - [`CodeBlock`] renders highlighted source through a [`Highlighter`]
//! - [`DiagramHook`] receives `mermaid` blocks; the `folio-diagrams` crate
//!   provides the implementation
//! - [`LinkCardHook`] resolves link card metadata; the `folio-links` crate
//!   provides the implementation
//! - [`blocks`] holds the component library (callouts, steps, tabs, file
//!   trees, terminals, checklists, link cards)
//!
//! # Example
//!
//! ```
//! use folio_renderer::{DispatchMode, PlainHighlighter, Registry, RenderOptions, parse_markdown};
//!
//! let doc = parse_markdown("## Install\n\n```sh\ncargo install folio\n```\n");
//! let registry = Registry::with_default_blocks();
//! let highlighter = PlainHighlighter;
//! let output = registry.render(
//!     &doc.nodes,
//!     RenderOptions::new(&highlighter).with_mode(DispatchMode::Restricted),
//! );
//!
//! assert!(output.html.contains(r#"<h2 id="install">"#));
//! assert_eq!(output.toc[0].title, "Install");
//! ```

mod anchors;
mod block;
pub mod blocks;
mod clipboard;
mod code_block;
mod highlight;
mod html;
mod language;
mod markdown;
mod markup;
mod node;
mod registry;
mod theme;
mod util;

pub use anchors::TocEntry;
pub use block::{BlockKind, ContentBlock, DIAGRAM_LANGUAGE};
pub use blocks::{
    Callout, CalloutKind, Checklist, FileTree, LinkCardView, LinkMetadataSource, LinkPreviewMetadata,
    StepsBlock,
    TabsBlock, Terminal, tab_key,
};
pub use clipboard::{
    COPY_FEEDBACK_DURATION, Clipboard, ClipboardError, CopyFeedback, MemoryClipboard,
    UnavailableClipboard,
};
pub use code_block::{CodeBlock, render_copy_button};
pub use highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
pub use language::{LanguageId, resolve_language, supported_languages};
pub use markdown::{MarkdownDocument, parse_markdown, parser_options};
pub use markup::{TrustedMarkup, insert_raw_markup};
pub use node::{Element, Node};
pub use registry::{
    BlockRenderer, DiagramHook, DispatchMode, Exposure, LinkCardHook, Registry, RegistryBuilder,
    RenderContext, RenderOptions, RenderOutput,
};
pub use theme::{ParseThemeError, Theme};
pub use util::{escape_html, is_safe_url, slugify, strip_trailing_newline};
