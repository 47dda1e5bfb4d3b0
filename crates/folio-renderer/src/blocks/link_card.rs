//! Link preview cards.
//!
//! Card fields come from author overrides first, then from fetched page
//! metadata, then from the link itself (hostname as title, favicon service
//! as icon). Fetching belongs to the [`LinkCardHook`]; without one a card
//! renders from its overrides.
//!
//! [`LinkCardHook`]: crate::LinkCardHook

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::{escape_html, is_safe_url};

/// Favicon service used when a card has no explicit icon.
pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?domain={host}&sz=64";

/// Preview fields. Each is independently optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreviewMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
}

impl LinkPreviewMetadata {
    /// Author overrides from a `LinkCard` element.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let field = |key: &str| element.attr_nonempty(key).map(str::to_owned);
        Self {
            title: field("title"),
            description: field("description"),
            image: field("image"),
            icon: field("icon"),
        }
    }

    /// A fetch is only needed when no title was supplied.
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        self.title.is_none()
    }

    /// Fill fields missing from `self` with those from `fetched`.
    #[must_use]
    pub fn merge(self, fetched: Option<&Self>) -> Self {
        let Some(fetched) = fetched else {
            return self;
        };
        Self {
            title: self.title.or_else(|| fetched.title.clone()),
            description: self.description.or_else(|| fetched.description.clone()),
            image: self.image.or_else(|| fetched.image.clone()),
            icon: self.icon.or_else(|| fetched.icon.clone()),
        }
    }
}

/// Supplies page metadata for a link. `None` means "nothing usable".
pub trait LinkMetadataSource: Send + Sync {
    fn fetch(&self, href: &str) -> Option<LinkPreviewMetadata>;
}

/// Hostname of an absolute URL.
#[must_use]
pub fn hostname(href: &str) -> Option<String> {
    let url = url::Url::parse(href).ok()?;
    url.host_str().map(str::to_owned)
}

/// Expand a favicon service template for `host`.
#[must_use]
pub fn favicon_url(template: &str, host: &str) -> String {
    template.replace("{host}", host)
}

/// Fully resolved card contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkCardView {
    pub href: String,
    pub host: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: String,
}

impl LinkCardView {
    /// Apply the final fallbacks to merged metadata.
    ///
    /// Image and icon URLs with script schemes are discarded.
    #[must_use]
    pub fn resolve(href: &str, metadata: &LinkPreviewMetadata, favicon_service: &str) -> Self {
        let host = hostname(href).unwrap_or_else(|| href.to_owned());
        let safe = |value: &Option<String>| value.clone().filter(|url| is_safe_url(url));
        Self {
            href: href.to_owned(),
            title: metadata.title.clone().unwrap_or_else(|| host.clone()),
            description: metadata.description.clone(),
            image: safe(&metadata.image),
            icon: safe(&metadata.icon).unwrap_or_else(|| favicon_url(favicon_service, &host)),
            host,
        }
    }

    /// Render the card. `show_image` is cleared once the image failed to load.
    pub fn render(&self, show_image: bool, out: &mut String) {
        let _ = write!(
            out,
            r#"<a class="link-card" href="{}" target="_blank" rel="noopener noreferrer"><div class="link-card-body"><div class="link-card-title">{}</div>"#,
            escape_html(&self.href),
            escape_html(&self.title)
        );
        if let Some(description) = &self.description {
            let _ = write!(
                out,
                r#"<div class="link-card-description">{}</div>"#,
                escape_html(description)
            );
        }
        let _ = write!(
            out,
            r#"<div class="link-card-host"><img class="link-card-icon" src="{}" alt="" width="16" height="16" loading="lazy">{}</div></div>"#,
            escape_html(&self.icon),
            escape_html(&self.host)
        );
        if show_image && let Some(image) = &self.image {
            let _ = write!(
                out,
                r#"<div class="link-card-image"><img src="{}" alt="" loading="lazy"></div>"#,
                escape_html(image)
            );
        }
        out.push_str("</a>");
    }
}

pub(crate) struct LinkCardRenderer;

impl BlockRenderer for LinkCardRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext<'_>, out: &mut String) {
        let Some(href) = element.attr_nonempty("href") else {
            ctx.warn("LinkCard without href ignored");
            return;
        };
        if !is_safe_url(href) {
            ctx.warn(format!("LinkCard with unsafe href '{href}' ignored"));
            return;
        }

        ctx.render_link_card(href, LinkPreviewMetadata::from_element(element), out);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::highlight::PlainHighlighter;
    use crate::registry::{LinkCardHook, Registry, RenderOptions, RenderOutput};
    use pretty_assertions::assert_eq;

    struct Failing;

    impl LinkMetadataSource for Failing {
        fn fetch(&self, _href: &str) -> Option<LinkPreviewMetadata> {
            None
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl LinkMetadataSource for Counting {
        fn fetch(&self, _href: &str) -> Option<LinkPreviewMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(LinkPreviewMetadata {
                title: Some("Fetched".to_owned()),
                description: Some("From the page".to_owned()),
                image: Some("https://example.com/og.png".to_owned()),
                icon: None,
            })
        }
    }

    /// Fetches inline and records every href it was handed.
    struct Fetching<'a> {
        source: &'a dyn LinkMetadataSource,
        hrefs: Vec<String>,
    }

    impl LinkCardHook for Fetching<'_> {
        fn render_card(
            &mut self,
            href: &str,
            overrides: LinkPreviewMetadata,
            favicon_service: &str,
            out: &mut String,
        ) {
            self.hrefs.push(href.to_owned());
            let fetched = if overrides.needs_fetch() {
                self.source.fetch(href)
            } else {
                None
            };
            let metadata = overrides.merge(fetched.as_ref());
            LinkCardView::resolve(href, &metadata, favicon_service).render(true, out);
        }
    }

    fn render(element: Element, source: &dyn LinkMetadataSource) -> RenderOutput {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let mut hook = Fetching {
            source,
            hrefs: Vec::new(),
        };
        registry.render(
            &[element.into()],
            RenderOptions::new(&highlighter).with_link_cards(&mut hook),
        )
    }

    #[test]
    fn test_failed_fetch_falls_back_to_hostname() {
        let metadata = LinkPreviewMetadata::default().merge(None);
        let view = LinkCardView::resolve(
            "https://docs.example.com/guide",
            &metadata,
            DEFAULT_FAVICON_SERVICE,
        );
        assert_eq!(view.title, "docs.example.com");
        assert_eq!(view.description, None);
        assert_eq!(view.image, None);
        assert_eq!(
            view.icon,
            "https://www.google.com/s2/favicons?domain=docs.example.com&sz=64"
        );
    }

    #[test]
    fn test_renderer_with_failing_source() {
        let output = render(
            Element::new("LinkCard").with_attr("href", "https://example.org/a"),
            &Failing,
        );
        assert!(output.html.contains(r#"<div class="link-card-title">example.org</div>"#));
        assert!(!output.html.contains("link-card-description"));
        assert!(!output.html.contains("link-card-image"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = LinkPreviewMetadata {
            description: Some("Mine".to_owned()),
            ..LinkPreviewMetadata::default()
        };
        let fetched = LinkPreviewMetadata {
            title: Some("Theirs".to_owned()),
            description: Some("Theirs".to_owned()),
            ..LinkPreviewMetadata::default()
        };
        let merged = overrides.merge(Some(&fetched));
        assert_eq!(merged.title.as_deref(), Some("Theirs"));
        assert_eq!(merged.description.as_deref(), Some("Mine"));
    }

    #[test]
    fn test_explicit_title_skips_fetch() {
        let source = Counting::default();
        let output = render(
            Element::new("LinkCard")
                .with_attr("href", "https://example.org")
                .with_attr("title", "Given"),
            &source,
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(output.html.contains(">Given<"));
    }

    #[test]
    fn test_fetched_metadata_used() {
        let source = Counting::default();
        let output = render(
            Element::new("LinkCard").with_attr("href", "https://example.org"),
            &source,
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(output.html.contains(">Fetched<"));
        assert!(output.html.contains(r#"<img src="https://example.com/og.png""#));
    }

    #[test]
    fn test_image_suppressed_after_failure() {
        let metadata = LinkPreviewMetadata {
            image: Some("https://example.com/broken.png".to_owned()),
            ..LinkPreviewMetadata::default()
        };
        let view = LinkCardView::resolve("https://example.com", &metadata, DEFAULT_FAVICON_SERVICE);
        let mut out = String::new();
        view.render(false, &mut out);
        assert!(!out.contains("broken.png"));
    }

    #[test]
    fn test_icon_override_and_unsafe_image() {
        let metadata = LinkPreviewMetadata {
            icon: Some("/favicon.svg".to_owned()),
            image: Some("javascript:alert(1)".to_owned()),
            ..LinkPreviewMetadata::default()
        };
        let view = LinkCardView::resolve("https://example.com", &metadata, DEFAULT_FAVICON_SERVICE);
        assert_eq!(view.icon, "/favicon.svg");
        assert_eq!(view.image, None);
    }

    #[test]
    fn test_without_hook_uses_overrides_only() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let element = Element::new("LinkCard")
            .with_attr("href", "https://example.org/a")
            .with_attr("description", "Given");
        let output = registry.render(&[element.into()], RenderOptions::new(&highlighter));
        assert!(output.html.contains(">example.org</div>"));
        assert!(output.html.contains(">Given</div>"));
    }

    #[test]
    fn test_unsafe_href_never_reaches_hook() {
        let registry = Registry::with_default_blocks();
        let highlighter = PlainHighlighter;
        let mut hook = Fetching {
            source: &Failing,
            hrefs: Vec::new(),
        };
        let output = registry.render(
            &[Element::new("LinkCard")
                .with_attr("href", "javascript:alert(1)")
                .into()],
            RenderOptions::new(&highlighter).with_link_cards(&mut hook),
        );
        assert!(hook.hrefs.is_empty());
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_missing_href_warns() {
        let output = render(Element::new("LinkCard"), &Failing);
        assert_eq!(output.html, "");
        assert_eq!(output.warnings.len(), 1);
    }
}
