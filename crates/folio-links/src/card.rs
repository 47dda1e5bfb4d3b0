//! Per-card fetch state.

use std::sync::Arc;

use folio_renderer::{LinkCardView, LinkMetadataSource, LinkPreviewMetadata};
use folio_task::{TaskScope, TaskTicket};

/// A pending metadata fetch for one card.
#[derive(Debug)]
pub struct FetchJob {
    ticket: TaskTicket,
    href: String,
}

impl FetchJob {
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Fetch on the current thread.
    pub fn run(self, source: &dyn LinkMetadataSource) -> FetchOutcome {
        let metadata = if self.ticket.is_cancelled() {
            None
        } else {
            source.fetch(&self.href)
        };
        FetchOutcome {
            ticket: self.ticket,
            metadata,
        }
    }

    /// Fetch on the blocking pool, giving up as soon as the card is replaced
    /// or unmounted.
    pub async fn run_async(self, source: Arc<dyn LinkMetadataSource>) -> FetchOutcome {
        let href = self.href.clone();
        let fetch = tokio::task::spawn_blocking(move || source.fetch(&href));
        let metadata = self
            .ticket
            .run_until_cancelled(fetch)
            .await
            .and_then(Result::ok)
            .flatten();
        FetchOutcome {
            ticket: self.ticket,
            metadata,
        }
    }
}

/// Finished fetch, waiting to be committed.
#[derive(Debug)]
pub struct FetchOutcome {
    ticket: TaskTicket,
    metadata: Option<LinkPreviewMetadata>,
}

/// State of one rendered link card.
///
/// Author overrides are fixed at mount. Fetched metadata fills the remaining
/// fields once committed; a failed fetch leaves the hostname fallback.
#[derive(Debug)]
pub struct LinkCardState {
    href: String,
    overrides: LinkPreviewMetadata,
    fetched: Option<LinkPreviewMetadata>,
    favicon_service: String,
    image_failed: bool,
    scope: TaskScope,
}

impl LinkCardState {
    pub fn new(
        href: impl Into<String>,
        overrides: LinkPreviewMetadata,
        favicon_service: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            overrides,
            fetched: None,
            favicon_service: favicon_service.into(),
            image_failed: false,
            scope: TaskScope::new("link-card"),
        }
    }

    /// Start a fetch unless the author supplied a title.
    pub fn begin_fetch(&mut self) -> Option<FetchJob> {
        if !self.overrides.needs_fetch() {
            return None;
        }
        Some(FetchJob {
            ticket: self.scope.begin(),
            href: self.href.clone(),
        })
    }

    /// Commit a finished fetch. Superseded or post-unmount outcomes are dropped.
    pub fn commit(&mut self, outcome: FetchOutcome) -> bool {
        if !self.scope.finish(&outcome.ticket) {
            return false;
        }
        self.fetched = outcome.metadata;
        true
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.scope.has_inflight()
    }

    /// Abort any outstanding fetch.
    pub fn unmount(&mut self) {
        self.scope.close();
    }

    /// Record that the card image failed to load. It is not retried.
    pub fn mark_image_failed(&mut self) {
        self.image_failed = true;
    }

    #[must_use]
    pub fn image_failed(&self) -> bool {
        self.image_failed
    }

    /// Card contents with all fallbacks applied.
    #[must_use]
    pub fn view(&self) -> LinkCardView {
        let metadata = self.overrides.clone().merge(self.fetched.as_ref());
        LinkCardView::resolve(&self.href, &metadata, &self.favicon_service)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let view = self.view();
        view.render(!self.image_failed, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use folio_renderer::blocks::DEFAULT_FAVICON_SERVICE;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixed(Option<LinkPreviewMetadata>);

    impl LinkMetadataSource for Fixed {
        fn fetch(&self, _href: &str) -> Option<LinkPreviewMetadata> {
            self.0.clone()
        }
    }

    struct Slow {
        calls: AtomicUsize,
    }

    impl LinkMetadataSource for Slow {
        fn fetch(&self, _href: &str) -> Option<LinkPreviewMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            Some(LinkPreviewMetadata {
                title: Some("Late".to_owned()),
                ..LinkPreviewMetadata::default()
            })
        }
    }

    fn card(overrides: LinkPreviewMetadata) -> LinkCardState {
        LinkCardState::new("https://example.com/post", overrides, DEFAULT_FAVICON_SERVICE)
    }

    fn fetched() -> LinkPreviewMetadata {
        LinkPreviewMetadata {
            title: Some("Post".to_owned()),
            description: Some("About things".to_owned()),
            image: Some("https://example.com/og.png".to_owned()),
            icon: None,
        }
    }

    #[test]
    fn test_failed_fetch_shows_hostname() {
        let mut card = card(LinkPreviewMetadata::default());
        let job = card.begin_fetch().unwrap();
        assert!(card.is_loading());
        assert!(card.commit(job.run(&Fixed(None))));

        let view = card.view();
        assert_eq!(view.title, "example.com");
        assert_eq!(view.description, None);
        assert_eq!(view.image, None);
    }

    #[test]
    fn test_fetched_metadata_fills_gaps() {
        let mut card = card(LinkPreviewMetadata {
            description: Some("Mine".to_owned()),
            ..LinkPreviewMetadata::default()
        });
        let job = card.begin_fetch().unwrap();
        card.commit(job.run(&Fixed(Some(fetched()))));

        let view = card.view();
        assert_eq!(view.title, "Post");
        assert_eq!(view.description.as_deref(), Some("Mine"));
        assert!(card.render().contains("og.png"));
    }

    #[test]
    fn test_title_override_skips_fetch() {
        let mut card = card(LinkPreviewMetadata {
            title: Some("Given".to_owned()),
            ..LinkPreviewMetadata::default()
        });
        assert!(card.begin_fetch().is_none());
        assert_eq!(card.view().title, "Given");
    }

    #[test]
    fn test_superseded_fetch_dropped() {
        let mut card = card(LinkPreviewMetadata::default());
        let first = card.begin_fetch().unwrap();
        let second = card.begin_fetch().unwrap();

        assert!(card.commit(second.run(&Fixed(None))));
        assert!(!card.commit(first.run(&Fixed(Some(fetched())))));
        assert_eq!(card.view().title, "example.com");
    }

    #[test]
    fn test_image_failure_suppresses_image() {
        let mut card = card(LinkPreviewMetadata::default());
        let job = card.begin_fetch().unwrap();
        card.commit(job.run(&Fixed(Some(fetched()))));
        card.mark_image_failed();
        assert!(card.image_failed());
        assert!(!card.render().contains("og.png"));
    }

    #[tokio::test]
    async fn test_unmount_aborts_fetch() {
        let source = Arc::new(Slow {
            calls: AtomicUsize::new(0),
        });
        let mut card = card(LinkPreviewMetadata::default());
        let job = card.begin_fetch().unwrap();
        let task = tokio::spawn(job.run_async(source));
        tokio::task::yield_now().await;

        card.unmount();
        let outcome = task.await.unwrap();
        assert!(outcome.metadata.is_none());
        assert!(!card.commit(outcome));
        assert_eq!(card.view().title, "example.com");
    }
}
