//! Shared helpers for markup generation.

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Convert text to a URL-safe slug.
///
/// Lowercases, turns runs of whitespace, dashes and underscores into a single
/// dash, and drops every other non-alphanumeric character. May return an
/// empty string (e.g. for text made only of punctuation or non-ASCII letters).
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Strip exactly one trailing line ending (`\n` or `\r\n`).
///
/// ```
/// use folio_renderer::strip_trailing_newline;
///
/// assert_eq!(strip_trailing_newline("const x = 1;\n"), "const x = 1;");
/// assert_eq!(strip_trailing_newline("a\n\n"), "a\n");
/// assert_eq!(strip_trailing_newline("a"), "a");
/// ```
#[must_use]
pub fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// Whether a URL points outside the current site.
pub(crate) fn is_external_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

/// Whether a URL is safe to emit in `href`/`src`.
///
/// Rejects script-bearing schemes; everything else (relative paths,
/// fragments, http(s), mailto, tel, data images) is allowed.
pub fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("vbscript:"))
}

/// Resolve a markdown link URL relative to a base path.
///
/// Transforms relative `.md` links to clean absolute paths:
/// - `./sibling.md` → `/base/path/sibling`
/// - `../parent.md` → `/base/parent`
/// - `adr-101/index.md` → `/base/path/adr-101`
///
/// External links, fragment-only links, and non-markdown links are returned unchanged.
#[allow(clippy::case_sensitive_file_extension_comparisons)]
pub(crate) fn resolve_link(url: &str, base_path: &str) -> String {
    if is_external_url(url)
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    if !url.ends_with(".md") && !url.contains(".md#") {
        return url.to_owned();
    }

    let (path_part, fragment) = match url.find('#') {
        Some(hash_pos) => (&url[..hash_pos], Some(&url[hash_pos..])),
        None => (url, None),
    };

    let resolved = if path_part.starts_with('/') {
        path_part.trim_start_matches('/').to_owned()
    } else {
        resolve_relative_path(path_part, base_path)
    };

    let clean = resolved.strip_suffix(".md").unwrap_or(&resolved);
    let clean = clean.strip_suffix("/index").unwrap_or(clean);

    match fragment {
        Some(frag) => format!("/{clean}{frag}"),
        None => format!("/{clean}"),
    }
}

/// Resolve a relative path against a base directory path.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                // Clamped at root
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}
