//! Document metadata and the header banner.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate};
use folio_renderer::{escape_html, is_safe_url};
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Metadata supplied with a document, from front matter or the host.
///
/// Every field is optional. The banner only renders when a title is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl DocumentMetadata {
    /// Parse YAML front matter. Blank input yields empty metadata.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Metadata`] for malformed YAML.
    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(trimmed)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Title, when present and not blank.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Render the header banner into `out`. Returns `false` without output
    /// when there is no title.
    pub fn render_banner(&self, out: &mut String) -> bool {
        let Some(title) = self.title() else {
            return false;
        };

        out.push_str(r#"<header class="document-banner">"#);
        if let Some(cover) = non_blank(self.cover.as_deref()).filter(|src| is_safe_url(src)) {
            let _ = write!(
                out,
                r#"<img class="document-banner-cover" src="{}" alt="" loading="lazy">"#,
                escape_html(cover)
            );
        }
        let _ = write!(
            out,
            r#"<h1 class="document-banner-title">{}</h1>"#,
            escape_html(title)
        );
        if let Some(description) = non_blank(self.description.as_deref()) {
            let _ = write!(
                out,
                r#"<p class="document-banner-description">{}</p>"#,
                escape_html(description)
            );
        }
        self.render_byline(out);
        out.push_str("</header>");
        true
    }

    fn render_byline(&self, out: &mut String) {
        let author = non_blank(self.author.as_deref());
        let created = non_blank(self.created_at.as_deref());
        let updated = non_blank(self.updated_at.as_deref());
        if author.is_none() && created.is_none() && updated.is_none() {
            return;
        }

        out.push_str(r#"<p class="document-banner-meta">"#);
        if let Some(author) = author {
            let _ = write!(
                out,
                r#"<span class="document-banner-author">{}</span>"#,
                escape_html(author)
            );
        }
        for (label, value) in [("Created", created), ("Updated", updated)] {
            if let Some(value) = value {
                let _ = write!(
                    out,
                    r#"<time class="document-banner-date" datetime="{}">{label} {}</time>"#,
                    escape_html(value),
                    escape_html(&display_date(value))
                );
            }
        }
        out.push_str("</p>");
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Format a metadata date for display.
///
/// RFC 3339 timestamps and `YYYY-MM-DD` dates become `YYYY-MM-DD` (the
/// timestamp's own offset decides the day). Anything else is shown as given.
#[must_use]
pub fn display_date(value: &str) -> String {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return timestamp.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    value.to_owned()
}
