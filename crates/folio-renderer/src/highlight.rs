//! Syntax highlighting.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::language::LanguageId;
use crate::theme::Theme;

// Loaded once per process
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const LIGHT_THEME: &str = "InspiredGitHub";
const DARK_THEME: &str = "base16-ocean.dark";

/// Produces highlighted markup for code.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` line by line.
    ///
    /// Returns one HTML fragment per source line (no line terminators), or
    /// `None` when the language can't be highlighted. Callers fall back to
    /// escaped plain text on `None`.
    fn highlight_lines(&self, code: &str, language: LanguageId, theme: Theme)
    -> Option<Vec<String>>;
}

/// Highlighter that never highlights.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight_lines(&self, _: &str, _: LanguageId, _: Theme) -> Option<Vec<String>> {
        None
    }
}

/// Highlighter backed by syntect's bundled grammars and themes.
///
/// Light theme: `InspiredGitHub`. Dark theme: `base16-ocean.dark`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn theme_name(theme: Theme) -> &'static str {
        match theme {
            Theme::Light => LIGHT_THEME,
            Theme::Dark => DARK_THEME,
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight_lines(
        &self,
        code: &str,
        language: LanguageId,
        theme: Theme,
    ) -> Option<Vec<String>> {
        if language.is_plain_text() {
            return None;
        }
        let syntax = SYNTAX_SET.find_syntax_by_token(language.as_str())?;
        let theme = THEME_SET.themes.get(Self::theme_name(theme))?;
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(regions) => regions,
                Err(e) => {
                    tracing::debug!(language = %language, error = %e, "Highlighting failed");
                    return None;
                }
            };
            let regions: Vec<_> = regions
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            lines.push(styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
        }
        if code.is_empty() || code.ends_with('\n') {
            lines.push(String::new());
        }
        Some(lines)
    }
}
