//! Per-document link card hook.
//!
//! Every card rendered in a document is mounted as a [`LinkCardState`]. Cards
//! without an author title fetch through the shared source and commit the
//! result before the card's markup is written.

use std::sync::Arc;

use folio_renderer::{LinkCardHook, LinkMetadataSource, LinkPreviewMetadata};

use crate::card::LinkCardState;

/// Link card hook for one document render.
pub struct LinkCardProcessor {
    source: Arc<dyn LinkMetadataSource>,
    cards: Vec<LinkCardState>,
}

impl LinkCardProcessor {
    pub fn new(source: Arc<dyn LinkMetadataSource>) -> Self {
        Self {
            source,
            cards: Vec::new(),
        }
    }

    /// Cards mounted during the render, in document order.
    #[must_use]
    pub fn cards(&self) -> &[LinkCardState] {
        &self.cards
    }

    /// Take ownership of the cards to keep them interactive after rendering.
    #[must_use]
    pub fn into_cards(self) -> Vec<LinkCardState> {
        self.cards
    }
}

impl LinkCardHook for LinkCardProcessor {
    fn render_card(
        &mut self,
        href: &str,
        overrides: LinkPreviewMetadata,
        favicon_service: &str,
        out: &mut String,
    ) {
        let mut card = LinkCardState::new(href, overrides, favicon_service);
        if let Some(job) = card.begin_fetch() {
            let outcome = job.run(self.source.as_ref());
            card.commit(outcome);
        }
        out.push_str(&card.render());
        self.cards.push(card);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use folio_renderer::{Element, Node, PlainHighlighter, Registry, RenderOptions};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Recording {
        hrefs: Mutex<Vec<String>>,
    }

    impl LinkMetadataSource for Recording {
        fn fetch(&self, href: &str) -> Option<LinkPreviewMetadata> {
            self.hrefs.lock().unwrap().push(href.to_owned());
            href.contains("known").then(|| LinkPreviewMetadata {
                title: Some("Known Page".to_owned()),
                image: Some("https://example.com/og.png".to_owned()),
                ..LinkPreviewMetadata::default()
            })
        }
    }

    fn card(href: &str) -> Node {
        Element::new("LinkCard").with_attr("href", href).into()
    }

    #[test]
    fn test_cards_mounted_and_fetched() {
        let source = Arc::new(Recording::default());
        let mut processor = LinkCardProcessor::new(Arc::clone(&source) as Arc<dyn LinkMetadataSource>);
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let nodes = [
            card("https://known.example.com/a"),
            card("https://down.example.org/b"),
            Element::new("LinkCard")
                .with_attr("href", "https://titled.example.net")
                .with_attr("title", "Given")
                .into(),
        ];
        let output = registry.render(
            &nodes,
            RenderOptions::new(&highlighter).with_link_cards(&mut processor),
        );

        assert_eq!(
            *source.hrefs.lock().unwrap(),
            ["https://known.example.com/a", "https://down.example.org/b"]
        );
        assert!(output.html.contains(">Known Page</div>"));
        assert!(output.html.contains(">down.example.org</div>"));
        assert!(output.html.contains(">Given</div>"));

        let cards = processor.into_cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].view().title, "Known Page");
        assert!(cards.iter().all(|card| !card.is_loading()));
    }

    #[test]
    fn test_mounted_card_keeps_image_failure_flag() {
        let mut processor = LinkCardProcessor::new(Arc::new(Recording::default()));
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let output = registry.render(
            &[card("https://known.example.com/a")],
            RenderOptions::new(&highlighter).with_link_cards(&mut processor),
        );
        assert!(output.html.contains("og.png"));

        let mut cards = processor.into_cards();
        cards[0].mark_image_failed();
        assert!(!cards[0].render().contains("og.png"));
    }
}
