//! What the preview shows.

use folio_renderer::{TrustedMarkup, escape_html, insert_raw_markup};

/// Preview content supplied by the trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewContent {
    Image { src: String, alt: String },
    /// Markup produced by a diagram engine.
    Markup(TrustedMarkup),
}

impl PreviewContent {
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    #[must_use]
    pub fn markup(markup: TrustedMarkup) -> Self {
        Self::Markup(markup)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Markup(_) => "markup",
        }
    }

    pub(crate) fn render(&self, out: &mut String) {
        match self {
            Self::Image { src, alt } => {
                out.push_str(r#"<img class="preview-image" src=""#);
                out.push_str(&escape_html(src));
                out.push_str(r#"" alt=""#);
                out.push_str(&escape_html(alt));
                out.push_str(r#"" draggable="false">"#);
            }
            Self::Markup(markup) => insert_raw_markup(markup, out),
        }
    }
}
