//! Metadata extraction from untrusted page HTML.
//!
//! The page is never parsed into a DOM or executed. Tags are matched with
//! regular expressions and only attribute values and the `<title>` text are
//! read. Everything extracted is escaped again at render time.

use std::collections::HashMap;
use std::sync::LazyLock;

use folio_renderer::LinkPreviewMetadata;
use regex::Regex;
use url::Url;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("invalid meta regex"));
static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\s[^>]*>").expect("invalid link regex"));
static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("invalid title regex"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("invalid attribute regex")
});
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("invalid entity regex"));

const TITLE_KEYS: &[&str] = &["og:title", "twitter:title"];
const DESCRIPTION_KEYS: &[&str] = &["og:description", "twitter:description", "description"];
const IMAGE_KEYS: &[&str] = &["og:image", "og:image:url", "twitter:image", "twitter:image:src"];

/// Extract preview metadata from `html` fetched from `page_url`.
///
/// Title prefers `og:title`/`twitter:title`, then the `<title>` element.
/// Relative image and icon URLs resolve against `page_url`.
#[must_use]
pub fn extract_metadata(html: &str, page_url: &str) -> LinkPreviewMetadata {
    let meta = meta_properties(html);
    let lookup = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| meta.get(*key))
            .map(|value| decode_entities(value).trim().to_owned())
            .filter(|value| !value.is_empty())
    };

    let title = lookup(TITLE_KEYS).or_else(|| {
        TITLE_TAG
            .captures(html)
            .map(|caps| collapse_whitespace(&decode_entities(&caps[1])))
            .filter(|title| !title.is_empty())
    });
    let base = Url::parse(page_url).ok();

    LinkPreviewMetadata {
        title,
        description: lookup(DESCRIPTION_KEYS),
        image: lookup(IMAGE_KEYS).and_then(|src| absolutize(base.as_ref(), &src)),
        icon: icon_href(html).and_then(|href| absolutize(base.as_ref(), &href)),
    }
}

/// `property`/`name` → `content` for every meta tag. First occurrence wins.
fn meta_properties(html: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    for tag in META_TAG.find_iter(html) {
        let attrs = attributes(tag.as_str());
        let key = attrs.get("property").or_else(|| attrs.get("name"));
        if let (Some(key), Some(content)) = (key, attrs.get("content")) {
            properties
                .entry(key.to_ascii_lowercase())
                .or_insert_with(|| content.clone());
        }
    }
    properties
}

fn icon_href(html: &str) -> Option<String> {
    LINK_TAG.find_iter(html).find_map(|tag| {
        let attrs = attributes(tag.as_str());
        let rel = attrs.get("rel")?.to_ascii_lowercase();
        rel.split_whitespace()
            .any(|r| r == "icon")
            .then(|| attrs.get("href").map(|href| decode_entities(href)))
            .flatten()
    })
}

fn attributes(tag: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
            Some((caps[1].to_ascii_lowercase(), value.as_str().to_owned()))
        })
        .collect()
}

/// Resolve `href` against `base`, keeping only http(s) results.
fn absolutize(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode numeric and the common named character references.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{00a0}'),
                    "mdash" => Some('\u{2014}'),
                    "ndash" => Some('\u{2013}'),
                    "hellip" => Some('\u{2026}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}
