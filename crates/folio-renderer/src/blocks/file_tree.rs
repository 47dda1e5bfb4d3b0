//! File tree listing from indented plain text.
//!
//! ```text
//! src/
//!   main.rs
//!   lib/
//!     mod.rs
//! Cargo.toml
//! ```
//!
//! Each two-space indent is one nesting level. A trailing `/` marks a
//! directory.

use std::fmt::Write;
use std::time::Instant;

use crate::clipboard::{Clipboard, CopyFeedback};
use crate::code_block::render_copy_button;
use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::{escape_html, strip_trailing_newline};

/// Spaces per nesting level.
pub const INDENT_UNIT: usize = 2;

const SVG_FOLDER: &str = r#"<svg class="file-tree-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M1.75 1A1.75 1.75 0 0 0 0 2.75v10.5C0 14.216.784 15 1.75 15h12.5A1.75 1.75 0 0 0 16 13.25v-8.5A1.75 1.75 0 0 0 14.25 3H7.5a.25.25 0 0 1-.2-.1l-.9-1.2C6.07 1.26 5.55 1 5 1H1.75Z"></path></svg>"#;
const SVG_FILE: &str = r#"<svg class="file-tree-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M2 1.75C2 .784 2.784 0 3.75 0h6.586c.464 0 .909.184 1.237.513l2.914 2.914c.329.328.513.773.513 1.237v9.586A1.75 1.75 0 0 1 13.25 16h-9.5A1.75 1.75 0 0 1 2 14.25Zm1.75-.25a.25.25 0 0 0-.25.25v12.5c0 .138.112.25.25.25h9.5a.25.25 0 0 0 .25-.25V6h-2.75A1.75 1.75 0 0 1 9 4.25V1.5Zm6.75.062V4.25c0 .138.112.25.25.25h2.688l-.011-.013-2.914-2.914-.013-.011Z"></path></svg>"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One line of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTreeEntry {
    /// Name as written, trailing `/` included for directories.
    pub name: String,
    pub depth: usize,
    pub kind: EntryKind,
}

/// Parsed file tree with a copy action for its plain-text form.
#[derive(Clone, Debug)]
pub struct FileTree {
    source: String,
    entries: Vec<FileTreeEntry>,
    copy: CopyFeedback,
}

impl FileTree {
    /// Parse indented text. One trailing newline is stripped; blank lines are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let source = strip_trailing_newline(text).to_owned();
        let entries = source
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let indent = line.len() - line.trim_start_matches(' ').len();
                let name = line.trim();
                let kind = if name.ends_with('/') {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                FileTreeEntry {
                    name: name.to_owned(),
                    depth: indent / INDENT_UNIT,
                    kind,
                }
            })
            .collect();
        Self {
            source,
            entries,
            copy: CopyFeedback::new(),
        }
    }

    /// Parse the flattened text of a `FileTree` element.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        Self::parse(&element.text_content())
    }

    #[must_use]
    pub fn entries(&self) -> &[FileTreeEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstructed plain text, as copied.
    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.source
    }

    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        self.copy.copy(clipboard, &self.source, now)
    }

    #[must_use]
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copy.is_active(now)
    }

    /// Render as of `now`. Empty trees render nothing.
    #[must_use]
    pub fn render(&self, now: Instant) -> String {
        let mut out = String::new();
        self.render_into(self.is_copied(now), &mut out);
        out
    }

    fn render_into(&self, copied: bool, out: &mut String) {
        if self.entries.is_empty() {
            return;
        }
        out.push_str(r#"<div class="file-tree"><div class="file-tree-header">"#);
        render_copy_button(&self.source, copied, out);
        out.push_str(r#"</div><ul class="file-tree-list" role="tree">"#);
        for entry in &self.entries {
            let (class, icon) = match entry.kind {
                EntryKind::Directory => ("directory", SVG_FOLDER),
                EntryKind::File => ("file", SVG_FILE),
            };
            let _ = write!(
                out,
                r#"<li class="file-tree-entry file-tree-{class}" role="treeitem" aria-level="{}" data-depth="{}" style="--depth: {}">{icon}<span class="file-tree-name">{}</span></li>"#,
                entry.depth + 1,
                entry.depth,
                entry.depth,
                escape_html(&entry.name)
            );
        }
        out.push_str("</ul></div>");
    }
}

pub(crate) struct FileTreeRenderer;

impl BlockRenderer for FileTreeRenderer {
    fn render(&self, element: &Element, _ctx: &mut RenderContext<'_>, out: &mut String) {
        FileTree::from_element(element).render_into(false, out);
    }
}
