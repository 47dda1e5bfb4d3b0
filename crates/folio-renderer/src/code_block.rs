//! Code block rendering: highlighted source with a copy action.

use std::fmt::Write;
use std::time::Instant;

use crate::clipboard::{Clipboard, CopyFeedback};
use crate::highlight::Highlighter;
use crate::language::{LanguageId, resolve_language};
use crate::theme::Theme;
use crate::util::{escape_html, strip_trailing_newline};

/// A displayed code block.
///
/// Holds the normalized source (one trailing newline stripped), the resolved
/// language and the copy indicator state. Highlighting happens at render time
/// so a theme change only needs a re-render.
#[derive(Clone, Debug)]
pub struct CodeBlock {
    code: String,
    language: LanguageId,
    title: Option<String>,
    line_numbers: bool,
    copy: CopyFeedback,
}

impl CodeBlock {
    /// Create a block from raw text and an optional language tag.
    pub fn new(raw: &str, language: Option<&str>) -> Self {
        Self {
            code: strip_trailing_newline(raw).to_owned(),
            language: resolve_language(language),
            title: None,
            line_numbers: false,
            copy: CopyFeedback::new(),
        }
    }

    /// Caption shown in the header instead of the language name.
    #[must_use]
    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_owned).filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Displayed source text. This is also what the copy action writes.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Copy the displayed text. Failures are swallowed.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        self.copy.copy(clipboard, &self.code, now)
    }

    /// Whether the copied indicator is showing at `now`.
    #[must_use]
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copy.is_active(now)
    }

    /// Render the block as of `now`.
    #[must_use]
    pub fn render(&self, theme: Theme, highlighter: &dyn Highlighter, now: Instant) -> String {
        let mut out = String::new();
        self.render_into(theme, highlighter, self.is_copied(now), &mut out);
        out
    }

    pub(crate) fn render_into(
        &self,
        theme: Theme,
        highlighter: &dyn Highlighter,
        copied: bool,
        out: &mut String,
    ) {
        let language = self.language.as_str();
        let _ = write!(
            out,
            r#"<figure class="code-block" data-language="{language}">"#
        );

        out.push_str(r#"<figcaption class="code-block-header">"#);
        let caption = self.title.as_deref().unwrap_or(language);
        let _ = write!(
            out,
            r#"<span class="code-block-title">{}</span>"#,
            escape_html(caption)
        );
        render_copy_button(&self.code, copied, out);
        out.push_str("</figcaption>");

        let _ = write!(
            out,
            r#"<pre class="language-{language}" data-theme="{theme}">"#
        );
        if self.line_numbers {
            out.push_str(r#"<code class="line-numbers">"#);
        } else {
            out.push_str("<code>");
        }

        let lines = highlighter
            .highlight_lines(&self.code, self.language, theme)
            .unwrap_or_else(|| {
                self.code
                    .split('\n')
                    .map(|line| escape_html(line.strip_suffix('\r').unwrap_or(line)))
                    .collect()
            });
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            if self.line_numbers {
                let _ = write!(
                    out,
                    r#"<span class="line" data-line="{}">{line}</span>"#,
                    index + 1
                );
            } else {
                out.push_str(line);
            }
        }

        out.push_str("</code></pre></figure>");
    }
}

/// Copy button carrying the exact text to write.
pub fn render_copy_button(text: &str, copied: bool, out: &mut String) {
    let (label, state) = if copied {
        ("Copied", "true")
    } else {
        ("Copy", "false")
    };
    let _ = write!(
        out,
        r#"<button type="button" class="copy-button" data-copy="{}" data-copied="{state}" aria-label="{label}">{label}</button>"#,
        escape_html(text)
    );
}
