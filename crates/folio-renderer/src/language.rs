//! Language tag normalization for code blocks.
//!
//! Author-supplied tags are free-form (`TS`, `yml`, `shell`). [`resolve_language`]
//! maps them onto a fixed set of canonical identifiers; anything unknown
//! becomes [`LanguageId::PLAIN_TEXT`]. The function is total and idempotent.

use std::fmt;

/// Canonical languages the highlighter is asked about. Sorted for lookup.
const SUPPORTED: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "diff",
    "dockerfile",
    "go",
    "graphql",
    "html",
    "ini",
    "java",
    "javascript",
    "json",
    "jsx",
    "kotlin",
    "lua",
    "makefile",
    "markdown",
    "mermaid",
    "php",
    "powershell",
    "python",
    "ruby",
    "rust",
    "scss",
    "sql",
    "swift",
    "text",
    "toml",
    "tsx",
    "typescript",
    "xml",
    "yaml",
];

/// Alias → canonical name. Checked before the supported set.
const ALIASES: &[(&str, &str)] = &[
    ("c#", "csharp"),
    ("c++", "cpp"),
    ("cjs", "javascript"),
    ("console", "bash"),
    ("cs", "csharp"),
    ("docker", "dockerfile"),
    ("golang", "go"),
    ("gql", "graphql"),
    ("htm", "html"),
    ("js", "javascript"),
    ("jsonc", "json"),
    ("kt", "kotlin"),
    ("make", "makefile"),
    ("md", "markdown"),
    ("mdx", "markdown"),
    ("mjs", "javascript"),
    ("plain", "text"),
    ("plaintext", "text"),
    ("ps1", "powershell"),
    ("py", "python"),
    ("py3", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("svg", "xml"),
    ("ts", "typescript"),
    ("txt", "text"),
    ("yml", "yaml"),
    ("zsh", "bash"),
];

/// Canonical language identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LanguageId(&'static str);

impl LanguageId {
    /// Sentinel for unknown or absent tags. Itself a member of the supported set.
    pub const PLAIN_TEXT: Self = Self("text");

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.0
    }

    #[must_use]
    pub fn is_plain_text(self) -> bool {
        self == Self::PLAIN_TEXT
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Canonical identifiers in sorted order.
#[must_use]
pub fn supported_languages() -> &'static [&'static str] {
    SUPPORTED
}

/// Normalize a free-form language tag.
///
/// Lowercases and trims the tag, applies the alias table, then checks the
/// supported set. Absent, empty and unknown tags map to plain text.
///
/// ```
/// use folio_renderer::{LanguageId, resolve_language};
///
/// assert_eq!(resolve_language(Some("TS")).as_str(), "typescript");
/// assert_eq!(resolve_language(Some("yml")).as_str(), "yaml");
/// assert_eq!(resolve_language(Some("brainfart")), LanguageId::PLAIN_TEXT);
/// assert_eq!(resolve_language(None), LanguageId::PLAIN_TEXT);
/// ```
#[must_use]
pub fn resolve_language(tag: Option<&str>) -> LanguageId {
    let Some(tag) = tag else {
        return LanguageId::PLAIN_TEXT;
    };
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return LanguageId::PLAIN_TEXT;
    }

    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map_or(tag.as_str(), |&(_, canonical)| canonical);

    SUPPORTED
        .binary_search(&name)
        .map_or(LanguageId::PLAIN_TEXT, |index| LanguageId(SUPPORTED[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_supported_is_sorted() {
        let mut sorted = SUPPORTED.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, SUPPORTED);
    }

    #[test]
    fn test_aliases_target_supported_names() {
        for (alias, canonical) in ALIASES {
            assert!(
                SUPPORTED.contains(canonical),
                "alias {alias} points at unsupported {canonical}"
            );
            assert!(!SUPPORTED.contains(alias), "alias {alias} shadows a canonical name");
        }
    }

    #[test]
    fn test_alias_resolves_like_canonical() {
        for (alias, canonical) in ALIASES {
            assert_eq!(
                resolve_language(Some(*alias)),
                resolve_language(Some(*canonical))
            );
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(resolve_language(Some("  Rust ")).as_str(), "rust");
        assert_eq!(resolve_language(Some("YML")).as_str(), "yaml");
    }

    #[test]
    fn test_unknown_and_empty_are_plain_text() {
        assert!(resolve_language(Some("")).is_plain_text());
        assert!(resolve_language(Some("   ")).is_plain_text());
        assert!(resolve_language(Some("cobol-2087")).is_plain_text());
        assert!(resolve_language(None).is_plain_text());
    }

    #[test]
    fn test_plain_text_sentinel_is_supported() {
        assert!(SUPPORTED.contains(&LanguageId::PLAIN_TEXT.as_str()));
        assert_eq!(resolve_language(Some("text")), LanguageId::PLAIN_TEXT);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let inputs = ["ts", "TS", "yml", "sh", "Python", "nope", "", "c++", "text"];
        for input in inputs {
            let once = resolve_language(Some(input));
            let twice = resolve_language(Some(once.as_str()));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }
}
