//! Per-diagram render state machine.
//!
//! ```text
//!            mount / source or theme change
//!   ┌──────────────────────────────────────────┐
//!   ▼                                          │
//! Pending ──commit(Ok)──▶ Rendered ────────────┤
//!    │                                         │
//!    └────commit(Err)──▶ Failed ───────────────┘
//! ```
//!
//! Every transition into `Pending` starts a [`RenderJob`] from the view's
//! [`TaskScope`]. Only the newest job's outcome is committed; older outcomes
//! are dropped. View mode (preview or source) is independent of the status.

use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use folio_preview::{PreviewContent, PreviewController};
use folio_renderer::{
    Clipboard, CopyFeedback, Theme, TrustedMarkup, escape_html, insert_raw_markup,
    render_copy_button, strip_trailing_newline,
};
use folio_task::{TaskScope, TaskTicket};

use crate::engine::EngineConfig;
use crate::error::DiagramError;
use crate::ids::session_id;
use crate::runtime::DiagramRuntime;

/// Render status of a diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramStatus {
    Pending,
    Rendered(TrustedMarkup),
    Failed(String),
}

impl DiagramStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Rendered(_) => "rendered",
            Self::Failed(_) => "failed",
        }
    }
}

/// What the diagram frame shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Preview,
    Source,
}

impl ViewMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Source => "source",
        }
    }
}

/// One render request, detached from the view so it can run anywhere.
#[derive(Debug)]
pub struct RenderJob {
    ticket: TaskTicket,
    session_id: String,
    source: String,
    config: EngineConfig,
}

impl RenderJob {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Render on the current thread.
    pub fn run(self, runtime: &DiagramRuntime) -> RenderOutcome {
        let result = runtime.render(&self.session_id, &self.source, &self.config);
        self.into_outcome(result)
    }

    /// Render on the blocking pool.
    pub async fn run_async(self, runtime: Arc<DiagramRuntime>) -> RenderOutcome {
        let session_id = self.session_id.clone();
        let source = self.source.clone();
        let config = self.config.clone();
        let result = tokio::task::spawn_blocking(move || runtime.render(&session_id, &source, &config))
            .await
            .unwrap_or_else(|e| Err(DiagramError::Task(e.to_string())));
        self.into_outcome(result)
    }

    fn into_outcome(self, result: Result<TrustedMarkup, DiagramError>) -> RenderOutcome {
        RenderOutcome {
            ticket: self.ticket,
            session_id: self.session_id,
            result,
        }
    }
}

/// Completed render, waiting to be committed.
#[derive(Debug)]
pub struct RenderOutcome {
    ticket: TaskTicket,
    session_id: String,
    result: Result<TrustedMarkup, DiagramError>,
}

impl RenderOutcome {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn error(&self) -> Option<&DiagramError> {
        self.result.as_ref().err()
    }
}

/// A mounted diagram.
#[derive(Debug)]
pub struct DiagramView {
    instance_id: String,
    source: String,
    theme: Theme,
    status: DiagramStatus,
    mode: ViewMode,
    session_id: String,
    scope: TaskScope,
    copy: CopyFeedback,
}

impl DiagramView {
    /// Mount a view in `Pending` and return its first render job.
    pub fn mount(instance_id: impl Into<String>, source: &str, theme: Theme) -> (Self, RenderJob) {
        let instance_id = instance_id.into();
        let mut view = Self {
            session_id: session_id(&instance_id, 0),
            instance_id,
            source: source.to_owned(),
            theme,
            status: DiagramStatus::Pending,
            mode: ViewMode::default(),
            scope: TaskScope::new("diagram"),
            copy: CopyFeedback::new(),
        };
        let job = view.restart();
        (view, job)
    }

    /// Replace the diagram source. Returns a new job if it changed.
    pub fn set_source(&mut self, source: &str) -> Option<RenderJob> {
        if self.source == source {
            return None;
        }
        source.clone_into(&mut self.source);
        Some(self.restart())
    }

    /// Follow a theme change. Returns a new job if it changed.
    pub fn set_theme(&mut self, theme: Theme) -> Option<RenderJob> {
        if self.theme == theme {
            return None;
        }
        self.theme = theme;
        Some(self.restart())
    }

    /// Commit a finished job. Returns `false` for superseded outcomes, which
    /// leave the view untouched.
    pub fn commit(&mut self, outcome: RenderOutcome) -> bool {
        if !self.scope.finish(&outcome.ticket) {
            return false;
        }
        self.status = match outcome.result {
            Ok(markup) => DiagramStatus::Rendered(markup),
            Err(e) => {
                tracing::warn!(diagram = %self.instance_id, session = %outcome.session_id, error = %e, "Diagram rendering failed");
                DiagramStatus::Failed(e.to_string())
            }
        };
        true
    }

    /// Stop accepting outcomes. Jobs still in flight are discarded on commit.
    pub fn unmount(&mut self) {
        self.scope.close();
    }

    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Id of the newest render session.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn status(&self) -> &DiagramStatus {
        &self.status
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> ViewMode {
        self.mode = match self.mode {
            ViewMode::Preview => ViewMode::Source,
            ViewMode::Source => ViewMode::Preview,
        };
        self.mode
    }

    /// Enlarging is only offered once the diagram rendered.
    #[must_use]
    pub fn can_enlarge(&self) -> bool {
        matches!(self.status, DiagramStatus::Rendered(_))
    }

    /// Open the rendered markup in the preview. No-op unless rendered.
    pub fn enlarge(&self, preview: &mut PreviewController) -> bool {
        let DiagramStatus::Rendered(markup) = &self.status else {
            return false;
        };
        preview.open(PreviewContent::markup(markup.clone()));
        true
    }

    /// Copy the diagram source. Failures are swallowed.
    pub fn copy_source(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        self.copy
            .copy(clipboard, strip_trailing_newline(&self.source), now)
    }

    #[must_use]
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copy.is_active(now)
    }

    /// Render the diagram frame as of `now`.
    #[must_use]
    pub fn render(&self, now: Instant) -> String {
        let mut out = String::new();
        self.render_into(self.is_copied(now), &mut out);
        out
    }

    pub(crate) fn render_into(&self, copied: bool, out: &mut String) {
        let _ = write!(
            out,
            r#"<figure class="diagram" id="{}" data-status="{}" data-mode="{}" data-session="{}">"#,
            escape_html(&self.instance_id),
            self.status.as_str(),
            self.mode.as_str(),
            escape_html(&self.session_id)
        );

        let (toggle_label, pressed) = match self.mode {
            ViewMode::Preview => ("Source", false),
            ViewMode::Source => ("Preview", true),
        };
        let _ = write!(
            out,
            r#"<div class="diagram-toolbar"><button type="button" data-action="toggle-source" aria-pressed="{pressed}">{toggle_label}</button>"#
        );
        let disabled = if self.can_enlarge() { "" } else { " disabled" };
        let _ = write!(
            out,
            r#"<button type="button" data-action="enlarge" data-preview-trigger="diagram" aria-label="Enlarge"{disabled}>Enlarge</button>"#
        );
        render_copy_button(strip_trailing_newline(&self.source), copied, out);
        out.push_str("</div>");

        match (self.mode, &self.status) {
            (ViewMode::Source, _) => {
                let _ = write!(
                    out,
                    r#"<pre class="diagram-source"><code class="language-mermaid">{}</code></pre>"#,
                    escape_html(strip_trailing_newline(&self.source))
                );
            }
            (ViewMode::Preview, DiagramStatus::Pending) => {
                out.push_str(r#"<div class="diagram-pending" aria-busy="true">Rendering diagram…</div>"#);
            }
            (ViewMode::Preview, DiagramStatus::Rendered(markup)) => {
                out.push_str(r#"<div class="diagram-content">"#);
                insert_raw_markup(markup, out);
                out.push_str("</div>");
            }
            (ViewMode::Preview, DiagramStatus::Failed(message)) => {
                let _ = write!(
                    out,
                    r#"<div class="diagram-error" role="alert">Diagram rendering failed: {}</div>"#,
                    escape_html(message)
                );
            }
        }
        out.push_str("</figure>");
    }

    fn restart(&mut self) -> RenderJob {
        let ticket = self.scope.begin();
        self.session_id = session_id(&self.instance_id, ticket.generation());
        self.status = DiagramStatus::Pending;
        RenderJob {
            ticket,
            session_id: self.session_id.clone(),
            source: self.source.clone(),
            config: EngineConfig::new(self.theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use folio_renderer::{MemoryClipboard, UnavailableClipboard};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::runtime::testing::EchoEngine;

    fn runtime() -> DiagramRuntime {
        DiagramRuntime::new(EchoEngine::default())
    }

    #[test]
    fn test_mount_then_commit_renders() {
        let runtime = runtime();
        let (mut view, job) = DiagramView::mount("diagram-x", "graph TD", Theme::Light);
        assert_eq!(view.status(), &DiagramStatus::Pending);
        assert_eq!(job.session_id(), "diagram-x-1");

        assert!(view.commit(job.run(&runtime)));
        let DiagramStatus::Rendered(markup) = view.status() else {
            panic!("expected rendered, got {:?}", view.status());
        };
        assert!(markup.as_str().contains(r#"id="diagram-x-1""#));
    }

    #[test]
    fn test_render_failure_keeps_source_available() {
        let runtime = runtime();
        let (mut view, job) = DiagramView::mount("diagram-x", "invalid", Theme::Light);
        assert!(view.commit(job.run(&runtime)));
        assert_eq!(
            view.status(),
            &DiagramStatus::Failed("HTTP 400: Parse error on line 1".to_owned())
        );
        assert!(!view.can_enlarge());

        view.set_mode(ViewMode::Source);
        let html = view.render(Instant::now());
        assert!(html.contains(r#"<pre class="diagram-source"><code class="language-mermaid">invalid</code></pre>"#));
    }

    #[test]
    fn test_stale_outcome_discarded() {
        let runtime = runtime();
        let (mut view, job_a) = DiagramView::mount("diagram-x", "graph A", Theme::Light);
        let job_b = view.set_theme(Theme::Dark).unwrap();

        let outcome_a = job_a.run(&runtime);
        let outcome_b = job_b.run(&runtime);

        // B resolves first, A resolves later and must not clobber it
        assert!(view.commit(outcome_b));
        assert!(!view.commit(outcome_a));
        let DiagramStatus::Rendered(markup) = view.status() else {
            panic!("expected rendered");
        };
        assert!(markup.as_str().contains(r#"data-theme="dark""#));
        assert_eq!(view.session_id(), "diagram-x-2");
    }

    #[test]
    fn test_unchanged_inputs_start_nothing() {
        let (mut view, _job) = DiagramView::mount("diagram-x", "graph", Theme::Light);
        assert!(view.set_theme(Theme::Light).is_none());
        assert!(view.set_source("graph").is_none());
        assert!(view.set_source("graph LR").is_some());
        assert_eq!(view.status(), &DiagramStatus::Pending);
    }

    #[test]
    fn test_commit_after_unmount_ignored() {
        let runtime = runtime();
        let (mut view, job) = DiagramView::mount("diagram-x", "graph", Theme::Light);
        view.unmount();
        assert!(!view.commit(job.run(&runtime)));
        assert_eq!(view.status(), &DiagramStatus::Pending);
    }

    #[test]
    fn test_enlarge_only_when_rendered() {
        let runtime = runtime();
        let mut preview = PreviewController::new();
        let (mut view, job) = DiagramView::mount("diagram-x", "graph", Theme::Light);

        assert!(!view.enlarge(&mut preview));
        assert!(!preview.is_open());
        assert!(view.render(Instant::now()).contains(r#"aria-label="Enlarge" disabled"#));

        view.commit(job.run(&runtime));
        assert!(view.enlarge(&mut preview));
        assert!(matches!(preview.content(), Some(PreviewContent::Markup(_))));
    }

    #[test]
    fn test_source_mode_independent_of_status() {
        let (mut view, _job) = DiagramView::mount("diagram-x", "graph <A>\n", Theme::Light);
        assert_eq!(view.toggle_mode(), ViewMode::Source);
        let html = view.render(Instant::now());
        assert!(html.contains(r#"data-status="pending" data-mode="source""#));
        assert!(html.contains("graph &lt;A&gt;</code>"));
        assert_eq!(view.toggle_mode(), ViewMode::Preview);
    }

    #[test]
    fn test_copy_source() {
        let clipboard = MemoryClipboard::new();
        let (mut view, _job) = DiagramView::mount("diagram-x", "graph TD\n", Theme::Light);
        let now = Instant::now();

        assert!(view.copy_source(&clipboard, now));
        assert_eq!(clipboard.contents().as_deref(), Some("graph TD"));
        assert!(view.is_copied(now + Duration::from_millis(500)));
        assert!(!view.is_copied(now + Duration::from_millis(1200)));

        let (mut other, _job) = DiagramView::mount("diagram-y", "graph", Theme::Light);
        assert!(!other.copy_source(&UnavailableClipboard, now));
        assert!(!other.is_copied(now));
    }

    #[tokio::test]
    async fn test_run_async() {
        let runtime = Arc::new(runtime());
        let (mut view, job) = DiagramView::mount("diagram-x", "graph", Theme::Dark);
        let outcome = job.run_async(Arc::clone(&runtime)).await;
        assert!(outcome.error().is_none());
        assert!(view.commit(outcome));
        assert!(view.can_enlarge());
    }
}
