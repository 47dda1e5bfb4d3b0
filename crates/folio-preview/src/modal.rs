//! Modal dialog markup.

use std::fmt::Write;

use crate::controller::{MAX_SCALE, MIN_SCALE, PreviewController};

impl PreviewController {
    /// Render the modal for the current state. Closed previews render nothing.
    ///
    /// Toolbar buttons carry a `data-action` naming the event they send.
    #[must_use]
    pub fn render(&self) -> String {
        let (Some(state), Some(content)) = (self.state(), self.content()) else {
            return String::new();
        };

        let mut out = String::with_capacity(1024);
        let _ = write!(
            out,
            r#"<div class="preview-modal" role="dialog" aria-modal="true" aria-label="Preview" data-phase="{}">"#,
            self.phase().as_str()
        );
        out.push_str(r#"<div class="preview-toolbar" role="toolbar">"#);
        toolbar_button(&mut out, "zoom-out", "Zoom out", state.scale <= MIN_SCALE, None);
        let _ = write!(
            out,
            r#"<span class="preview-scale">{}%</span>"#,
            (state.scale * 100.0).round()
        );
        toolbar_button(&mut out, "zoom-in", "Zoom in", state.scale >= MAX_SCALE, None);
        toolbar_button(&mut out, "rotate", "Rotate", false, None);
        toolbar_button(&mut out, "toggle-fit", "Fit to screen", false, Some(state.fit_mode));
        toolbar_button(&mut out, "reset", "Reset", false, None);
        toolbar_button(&mut out, "close", "Close", false, None);
        out.push_str("</div>");

        let dragging = if state.drag.is_some() { " is-dragging" } else { "" };
        let _ = write!(
            out,
            r#"<div class="preview-viewport{dragging}"><div class="preview-content" style="transform: {}">"#,
            state.css_transform()
        );
        content.render(&mut out);
        out.push_str("</div></div></div>");
        out
    }
}

fn toolbar_button(out: &mut String, action: &str, label: &str, disabled: bool, pressed: Option<bool>) {
    let _ = write!(
        out,
        r#"<button type="button" class="preview-button" data-action="{action}" aria-label="{label}""#
    );
    if let Some(pressed) = pressed {
        let _ = write!(out, r#" aria-pressed="{pressed}""#);
    }
    if disabled {
        out.push_str(" disabled");
    }
    let _ = write!(out, ">{label}</button>");
}
