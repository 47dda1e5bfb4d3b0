//! Terminal session transcript.

use std::fmt::Write;
use std::time::Instant;

use crate::clipboard::{Clipboard, CopyFeedback};
use crate::code_block::render_copy_button;
use crate::node::Element;
use crate::registry::{BlockRenderer, RenderContext};
use crate::util::{escape_html, strip_trailing_newline};

const PROMPT: &str = "$ ";

/// Terminal window with a title bar and copyable transcript.
///
/// Lines starting with `$ ` are commands; everything else is output.
#[derive(Clone, Debug)]
pub struct Terminal {
    title: Option<String>,
    text: String,
    copy: CopyFeedback,
}

impl Terminal {
    #[must_use]
    pub fn new(text: &str, title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_owned),
            text: strip_trailing_newline(text).to_owned(),
            copy: CopyFeedback::new(),
        }
    }

    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        Self::new(&element.text_content(), element.attr_nonempty("title"))
    }

    /// Transcript text, as copied.
    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        self.copy.copy(clipboard, &self.text, now)
    }

    #[must_use]
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copy.is_active(now)
    }

    #[must_use]
    pub fn render(&self, now: Instant) -> String {
        let mut out = String::new();
        self.render_into(self.is_copied(now), &mut out);
        out
    }

    fn render_into(&self, copied: bool, out: &mut String) {
        if self.is_empty() {
            return;
        }
        out.push_str(r#"<div class="terminal"><div class="terminal-header"><span class="terminal-dots" aria-hidden="true"></span>"#);
        if let Some(title) = &self.title {
            let _ = write!(out, r#"<span class="terminal-title">{}</span>"#, escape_html(title));
        }
        render_copy_button(&self.text, copied, out);
        out.push_str(r#"</div><pre class="terminal-body"><code>"#);
        for (index, line) in self.text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if index > 0 {
                out.push('\n');
            }
            match line.strip_prefix(PROMPT) {
                Some(command) => {
                    let _ = write!(
                        out,
                        r#"<span class="terminal-line terminal-command"><span class="terminal-prompt" aria-hidden="true">$</span> {}</span>"#,
                        escape_html(command)
                    );
                }
                None => {
                    let _ = write!(
                        out,
                        r#"<span class="terminal-line terminal-output">{}</span>"#,
                        escape_html(line)
                    );
                }
            }
        }
        out.push_str("</code></pre></div>");
    }
}

pub(crate) struct TerminalRenderer;

impl BlockRenderer for TerminalRenderer {
    fn render(&self, element: &Element, _ctx: &mut RenderContext<'_>, out: &mut String) {
        Terminal::from_element(element).render_into(false, out);
    }
}
