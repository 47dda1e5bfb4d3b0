//! Render pipeline assembled from configuration.

use std::fmt::Write as _;
use std::sync::Arc;

use folio_config::Config;
use folio_diagrams::{DiagramProcessor, DiagramRuntime, KrokiEngine};
use folio_links::{LinkCardProcessor, ProxyFetcher, ProxyMetadataSource};
use folio_renderer::blocks::DEFAULT_FAVICON_SERVICE;
use folio_renderer::{
    Highlighter, LinkMetadataSource, PlainHighlighter, Registry, RenderOptions, RenderOutput,
    SyntectHighlighter, Theme, escape_html,
};

use crate::{DocumentMetadata, LoadedDocument};

/// Everything needed to turn a [`LoadedDocument`] into HTML.
///
/// The registry, highlighter, diagram runtime and link metadata source are
/// shared across documents; each render gets its own diagram and link card
/// processors.
pub struct Pipeline {
    registry: Registry,
    highlighter: Box<dyn Highlighter>,
    diagrams: Arc<DiagramRuntime>,
    links: Option<Arc<dyn LinkMetadataSource>>,
    theme: Theme,
    base_path: Option<String>,
    favicon_service: String,
}

impl Pipeline {
    /// Plain highlighting, light theme, no link metadata.
    pub fn new(diagrams: Arc<DiagramRuntime>) -> Self {
        Self {
            registry: Registry::with_default_blocks(),
            highlighter: Box::new(PlainHighlighter),
            diagrams,
            links: None,
            theme: Theme::default(),
            base_path: None,
            favicon_service: DEFAULT_FAVICON_SERVICE.to_owned(),
        }
    }

    /// Full pipeline: syntect highlighting, Kroki diagrams and, when
    /// enabled, link previews through the configured proxy.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let engine = KrokiEngine::with_timeout(&config.diagrams.kroki_url, config.diagrams.timeout());
        let mut pipeline = Self::new(Arc::new(DiagramRuntime::new(engine)))
            .with_highlighter(SyntectHighlighter::new())
            .with_theme(config.render.theme)
            .with_favicon_service(&config.link_preview.favicon_service);

        if let Some(base_path) = &config.render.base_path {
            pipeline = pipeline.with_base_path(base_path);
        }
        if config.link_preview.enabled {
            let fetcher = ProxyFetcher::new(
                &config.link_preview.proxy_url,
                config.link_preview.timeout(),
            );
            pipeline = pipeline.with_link_source(Arc::new(ProxyMetadataSource::new(fetcher)));
        }

        tracing::debug!(
            kroki_url = %config.diagrams.kroki_url,
            theme = %config.render.theme,
            link_previews = config.link_preview.enabled,
            "Render pipeline ready"
        );
        pipeline
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    #[must_use]
    pub fn with_link_source(mut self, source: Arc<dyn LinkMetadataSource>) -> Self {
        self.links = Some(source);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    #[must_use]
    pub fn with_favicon_service(mut self, template: impl Into<String>) -> Self {
        self.favicon_service = template.into();
        self
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn diagrams(&self) -> &Arc<DiagramRuntime> {
        &self.diagrams
    }

    /// Render the document body. `key` identifies the document and seeds
    /// diagram ids.
    pub fn render(&self, document: &LoadedDocument, key: &str) -> RenderOutput {
        let mut processor = DiagramProcessor::new(Arc::clone(&self.diagrams), key);
        let mut cards = self
            .links
            .as_ref()
            .map(|source| LinkCardProcessor::new(Arc::clone(source)));
        let mut options = RenderOptions::new(self.highlighter.as_ref())
            .with_mode(document.dispatch_mode())
            .with_theme(self.theme)
            .with_favicon_service(&self.favicon_service)
            .with_diagrams(&mut processor);
        if let Some(cards) = cards.as_mut() {
            options = options.with_link_cards(cards);
        }
        if let Some(base_path) = self.base_path.as_deref() {
            options = options.with_base_path(base_path);
        }

        let output = self.registry.render(&document.nodes, options);
        for warning in &output.warnings {
            tracing::warn!(document = key, warning = %warning, "Render warning");
        }
        output
    }

    /// Render a standalone HTML page: banner, then the document body.
    ///
    /// The returned output's `html` is the whole page.
    pub fn render_page(&self, document: &LoadedDocument, key: &str) -> RenderOutput {
        let output = self.render(document, key);
        let title = document
            .metadata
            .title()
            .map(str::to_owned)
            .or_else(|| output.toc.first().map(|entry| entry.title.clone()))
            .unwrap_or_else(|| key.to_owned());

        let mut page = String::with_capacity(output.html.len() + 512);
        let _ = write!(
            page,
            "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n",
            self.theme,
            escape_html(&title)
        );
        if let Some(description) = document.metadata.description.as_deref() {
            let _ = writeln!(
                page,
                "<meta name=\"description\" content=\"{}\">",
                escape_html(description)
            );
        }
        page.push_str("</head>\n<body>\n");
        write_article(&document.metadata, &output.html, &mut page);
        page.push_str("\n</body>\n</html>\n");

        RenderOutput {
            html: page,
            ..output
        }
    }
}

/// Banner (when titled) followed by the body, inside an `<article>`.
pub(crate) fn write_article(metadata: &DocumentMetadata, body: &str, out: &mut String) {
    out.push_str(r#"<article class="document">"#);
    metadata.render_banner(out);
    out.push_str(r#"<div class="document-body">"#);
    out.push_str(body);
    out.push_str("</div></article>");
}


#[cfg(test)]
mod tests {
    use folio_renderer::{Element, LinkPreviewMetadata, Node};

    use super::testing::StubEngine;
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(DiagramRuntime::new(StubEngine::new())))
    }

    struct FixedSource;

    impl LinkMetadataSource for FixedSource {
        fn fetch(&self, _href: &str) -> Option<LinkPreviewMetadata> {
            Some(LinkPreviewMetadata {
                title: Some("Fetched Title".to_owned()),
                ..LinkPreviewMetadata::default()
            })
        }
    }

    #[test]
    fn test_raw_document_is_restricted() {
        let document = LoadedDocument::from_markdown("<Callout>hi</Callout>\n").unwrap();
        let output = pipeline().render(&document, "raw.md");
        assert!(!output.html.contains(r#"class="callout"#));
        assert!(output.html.contains("&lt;Callout&gt;"));
    }

    #[test]
    fn test_compiled_document_uses_components() {
        let document = LoadedDocument::compiled(vec![Node::Element(
            Element::new("Callout")
                .with_attr("type", "warning")
                .with_text("Careful"),
        )]);
        let output = pipeline().render(&document, "compiled.json");
        assert!(output.html.contains("callout"));
        assert!(output.html.contains("Careful"));
    }

    #[test]
    fn test_diagrams_rendered_through_runtime() {
        let document =
            LoadedDocument::from_markdown("```mermaid\ngraph TD; A-->B\n```\n").unwrap();
        let pipeline = pipeline().with_theme(Theme::Dark);
        let output = pipeline.render(&document, "diagrams.md");

        assert!(output.html.contains(r#"data-theme="dark""#));
        assert!(!output.html.contains("<!--DIAGRAM_"));
        assert!(pipeline.diagrams().is_initialized());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_diagram_failure_is_a_warning() {
        let document = LoadedDocument::from_markdown("```mermaid\ninvalid\n```\n").unwrap();
        let output = pipeline().render(&document, "broken.md");
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("Parse error"));
    }

    #[test]
    fn test_link_source_used_for_cards() {
        let document = LoadedDocument::compiled(vec![Node::Element(
            Element::new("LinkCard").with_attr("href", "https://example.com/post"),
        )]);
        let output = pipeline()
            .with_link_source(Arc::new(FixedSource))
            .render(&document, "cards.json");
        assert!(output.html.contains("Fetched Title"));
    }

    #[test]
    fn test_render_page_uses_banner_title() {
        let document =
            LoadedDocument::from_markdown("---\ntitle: Setup & Go\n---\n\n## Steps\n").unwrap();
        let page = pipeline().render_page(&document, "setup.md").html;
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Setup &amp; Go</title>"));
        assert!(page.contains(r#"<header class="document-banner">"#));
        assert!(page.contains(r#"<h2 id="steps">"#));
    }

    #[test]
    fn test_render_page_without_metadata() {
        let document = LoadedDocument::from_markdown("## Overview\n").unwrap();
        let page = pipeline().render_page(&document, "overview.md").html;
        assert!(page.contains("<title>Overview</title>"));
        assert!(!page.contains("document-banner"));
    }

    #[test]
    fn test_from_config_applies_settings() {
        let mut config = Config::default();
        config.render.theme = Theme::Dark;

        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.theme(), Theme::Dark);
        assert!(pipeline.links.is_some());
        assert!(!pipeline.diagrams().is_initialized());
    }
}
