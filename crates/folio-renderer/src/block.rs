//! Content block classification for `code` elements.

use crate::node::Element;

/// Raw language tag that routes a code block to the diagram renderer.
///
/// Compared against the tag exactly as written, before normalization.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// What a content block should be rendered as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Source code, inline or block.
    TextCode,
    /// Diagram source to hand to the diagram renderer.
    Diagram,
    /// Anything that isn't a `code` element.
    Generic,
}

/// A classified content block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentBlock {
    pub text: String,
    /// Raw language marker, if any.
    pub language: Option<String>,
    pub is_inline: bool,
    pub kind: BlockKind,
}

impl ContentBlock {
    /// Classify an element.
    ///
    /// A `code` element is inline when it has no language marker and its text
    /// contains no line break. A non-inline `code` element tagged exactly
    /// `mermaid` is a diagram.
    #[must_use]
    pub fn classify(element: &Element) -> Self {
        let text = element.text_content();
        if element.name != "code" {
            return Self {
                text,
                language: None,
                is_inline: false,
                kind: BlockKind::Generic,
            };
        }

        let language = element.language_marker().map(str::to_owned);
        let is_inline = language.is_none() && !text.contains('\n');
        let kind = if !is_inline && language.as_deref() == Some(DIAGRAM_LANGUAGE) {
            BlockKind::Diagram
        } else {
            BlockKind::TextCode
        };

        Self {
            text,
            language,
            is_inline,
            kind,
        }
    }

    #[must_use]
    pub fn is_diagram(&self) -> bool {
        self.kind == BlockKind::Diagram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code(lang: Option<&str>, text: &str) -> Element {
        let mut el = Element::new("code").with_text(text);
        if let Some(lang) = lang {
            el = el.with_attr("class", format!("language-{lang}"));
        }
        el
    }

    #[test]
    fn test_inline_without_language_or_newline() {
        let block = ContentBlock::classify(&code(None, "cargo build"));
        assert!(block.is_inline);
        assert_eq!(block.kind, BlockKind::TextCode);
    }

    #[test]
    fn test_block_when_text_has_newline() {
        let block = ContentBlock::classify(&code(None, "a\nb"));
        assert!(!block.is_inline);
        assert_eq!(block.kind, BlockKind::TextCode);
    }

    #[test]
    fn test_block_when_language_present() {
        let block = ContentBlock::classify(&code(Some("ts"), "x"));
        assert!(!block.is_inline);
        assert_eq!(block.language.as_deref(), Some("ts"));
    }

    #[test]
    fn test_mermaid_is_diagram() {
        let block = ContentBlock::classify(&code(Some("mermaid"), "graph TD; A-->B\n"));
        assert!(block.is_diagram());
        assert_eq!(block.text, "graph TD; A-->B\n");
    }

    #[test]
    fn test_diagram_tag_is_exact() {
        let block = ContentBlock::classify(&code(Some("Mermaid"), "graph TD; A-->B\n"));
        assert_eq!(block.kind, BlockKind::TextCode);
    }

    #[test]
    fn test_non_code_is_generic() {
        let block = ContentBlock::classify(&Element::new("p").with_text("hi"));
        assert_eq!(block.kind, BlockKind::Generic);
        assert!(!block.is_inline);
    }
}
