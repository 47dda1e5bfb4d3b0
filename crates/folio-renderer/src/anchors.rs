//! Heading anchors and table of contents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::util::slugify;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Unique anchor IDs within one document.
#[derive(Debug, Default)]
pub(crate) struct AnchorIds {
    counts: HashMap<String, usize>,
}

impl AnchorIds {
    /// Generate a unique ID from heading text: `faq`, `faq-1`, `faq-2`.
    pub(crate) fn generate(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let base = if slug.is_empty() {
            "section".to_owned()
        } else {
            slug
        };
        self.claim(base)
    }

    /// Reserve an explicit ID, suffixing it if already taken.
    pub(crate) fn claim(&mut self, base: String) -> String {
        let count = self.counts.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}
