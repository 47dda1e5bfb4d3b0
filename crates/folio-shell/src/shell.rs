//! Document shell: load state around one document.

use std::fmt::Write as _;

use folio_renderer::escape_html;
use folio_task::{TaskScope, TaskTicket};

use crate::pipeline::write_article;
use crate::{DocumentLoader, LoadError, LoadedDocument, Pipeline};

/// What the shell currently shows.
#[derive(Debug)]
pub enum ShellState {
    Loading,
    Loaded(LoadedDocument),
    Errored(String),
}

impl ShellState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Errored(_) => "errored",
        }
    }
}

/// A pending load.
#[derive(Debug)]
pub struct LoadJob {
    ticket: TaskTicket,
}

impl LoadJob {
    /// Run `loader`. Resolves early, without a result, when the load is
    /// superseded or the shell is unmounted.
    pub async fn run<L: DocumentLoader>(self, loader: &L) -> LoadOutcome {
        let result = self.ticket.run_until_cancelled(loader.load()).await;
        LoadOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// Finished load, waiting to be committed.
#[derive(Debug)]
pub struct LoadOutcome {
    ticket: TaskTicket,
    result: Option<Result<LoadedDocument, LoadError>>,
}

/// Shell around a document load.
///
/// Loads are keyed by loader identity: asking for the same identity again is
/// a no-op, a different identity starts a new load and supersedes the
/// previous one. Only the newest load may commit.
#[derive(Debug)]
pub struct DocumentShell {
    identity: Option<String>,
    state: ShellState,
    scope: TaskScope,
}

impl Default for DocumentShell {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentShell {
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: None,
            state: ShellState::Loading,
            scope: TaskScope::new("document-load"),
        }
    }

    /// Point the shell at `loader`. Returns a job when a load must start.
    pub fn set_loader<L: DocumentLoader>(&mut self, loader: &L) -> Option<LoadJob> {
        if self.identity.as_deref() == Some(loader.identity()) {
            return None;
        }
        self.identity = Some(loader.identity().to_owned());
        Some(self.begin())
    }

    /// Load the current loader again, e.g. after an error.
    pub fn reload(&mut self) -> Option<LoadJob> {
        self.identity.as_ref()?;
        Some(self.begin())
    }

    fn begin(&mut self) -> LoadJob {
        self.state = ShellState::Loading;
        LoadJob {
            ticket: self.scope.begin(),
        }
    }

    /// Commit a finished load. Returns `false` when the outcome was stale.
    pub fn commit(&mut self, outcome: LoadOutcome) -> bool {
        if !self.scope.finish(&outcome.ticket) {
            tracing::debug!(
                generation = outcome.ticket.generation(),
                "Discarding superseded document load"
            );
            return false;
        }
        let Some(result) = outcome.result else {
            return false;
        };
        self.state = match result {
            Ok(document) => ShellState::Loaded(document),
            Err(e) => {
                tracing::warn!(
                    document = self.identity.as_deref().unwrap_or_default(),
                    error = %e,
                    "Document load failed"
                );
                ShellState::Errored(e.to_string())
            }
        };
        true
    }

    /// Start, run and commit a load of `loader` in one step.
    pub async fn load<L: DocumentLoader>(&mut self, loader: &L) -> bool {
        match self.set_loader(loader) {
            Some(job) => {
                let outcome = job.run(loader).await;
                self.commit(outcome)
            }
            None => false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    #[must_use]
    pub fn document(&self) -> Option<&LoadedDocument> {
        match &self.state {
            ShellState::Loaded(document) => Some(document),
            ShellState::Loading | ShellState::Errored(_) => None,
        }
    }

    /// Abort any outstanding load.
    pub fn unmount(&mut self) {
        self.scope.close();
    }

    /// Render the shell for its current state.
    pub fn render(&self, pipeline: &Pipeline) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<div class="document-shell" data-state="{}""#,
            self.state.as_str()
        );
        match &self.state {
            ShellState::Loading => {
                out.push_str(r#" aria-busy="true"><div class="document-loading">Loading…</div>"#);
            }
            ShellState::Errored(message) => {
                let _ = write!(
                    out,
                    r#"><div class="document-error" role="alert"><p class="document-error-title">Failed to load document</p><pre class="document-error-message">{}</pre></div>"#,
                    escape_html(message)
                );
            }
            ShellState::Loaded(document) => {
                out.push('>');
                let key = self.identity.as_deref().unwrap_or_default();
                let output = pipeline.render(document, key);
                write_article(&document.metadata, &output.html, &mut out);
            }
        }
        out.push_str("</div>");
        out
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Arc;
    use std::time::Duration;

    use folio_diagrams::DiagramRuntime;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StaticLoader;
    use crate::pipeline::testing::StubEngine;

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(DiagramRuntime::new(StubEngine::new())))
    }

    fn markdown(identity: &str, text: &str) -> StaticLoader {
        StaticLoader::markdown(identity, text).unwrap()
    }

    /// Loader that waits before resolving.
    struct DelayedLoader {
        identity: String,
        delay: Duration,
        text: String,
    }

    impl DocumentLoader for DelayedLoader {
        fn identity(&self) -> &str {
            &self.identity
        }

        fn load(&self) -> impl Future<Output = Result<LoadedDocument, LoadError>> + Send {
            let delay = self.delay;
            let text = self.text.clone();
            async move {
                tokio::time::sleep(delay).await;
                LoadedDocument::from_markdown(&text)
            }
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let shell = DocumentShell::new();
        assert_eq!(shell.state().as_str(), "loading");
        assert!(shell.render(&pipeline()).contains(r#"aria-busy="true""#));
    }

    #[tokio::test]
    async fn test_successful_load() {
        let mut shell = DocumentShell::new();
        assert!(shell.load(&markdown("guide.md", "## Install\n")).await);
        assert_eq!(shell.state().as_str(), "loaded");

        let html = shell.render(&pipeline());
        assert!(html.contains(r#"data-state="loaded""#));
        assert!(html.contains(r#"<h2 id="install">"#));
    }

    #[tokio::test]
    async fn test_failed_load_shows_message() {
        let mut shell = DocumentShell::new();
        assert!(shell.load(&StaticLoader::failing("remote", "boom <500>")).await);

        match shell.state() {
            ShellState::Errored(message) => assert_eq!(message, "boom <500>"),
            other => panic!("expected error state, got {other:?}"),
        }
        let html = shell.render(&pipeline());
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("boom &lt;500&gt;"));
    }

    #[tokio::test]
    async fn test_same_identity_does_not_reload() {
        let loader = markdown("guide.md", "text\n");
        let mut shell = DocumentShell::new();
        assert!(shell.load(&loader).await);
        assert!(shell.set_loader(&loader).is_none());
        assert_eq!(shell.state().as_str(), "loaded");
    }

    #[tokio::test]
    async fn test_reload_after_error() {
        let mut shell = DocumentShell::new();
        assert!(shell.reload().is_none());
        shell.load(&StaticLoader::failing("remote", "offline")).await;

        let job = shell.reload().unwrap();
        assert_eq!(shell.state().as_str(), "loading");
        let outcome = job.run(&StaticLoader::failing("remote", "still offline")).await;
        assert!(shell.commit(outcome));
        assert!(matches!(shell.state(), ShellState::Errored(m) if m == "still offline"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_discarded() {
        let slow = DelayedLoader {
            identity: "old.md".to_owned(),
            delay: Duration::from_millis(500),
            text: "## Old\n".to_owned(),
        };
        let fast = DelayedLoader {
            identity: "new.md".to_owned(),
            delay: Duration::from_millis(10),
            text: "## New\n".to_owned(),
        };

        let mut shell = DocumentShell::new();
        let first = shell.set_loader(&slow).unwrap();
        let second = shell.set_loader(&fast).unwrap();

        let (first, second) = tokio::join!(first.run(&slow), second.run(&fast));
        assert!(shell.commit(second));
        assert!(!shell.commit(first));

        let html = shell.render(&pipeline());
        assert!(html.contains(r#"<h2 id="new">"#));
        assert!(!html.contains("Old"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_drops_result() {
        let loader = DelayedLoader {
            identity: "guide.md".to_owned(),
            delay: Duration::from_secs(5),
            text: "text\n".to_owned(),
        };
        let mut shell = DocumentShell::new();
        let job = shell.set_loader(&loader).unwrap();
        shell.unmount();

        let outcome = job.run(&loader).await;
        assert!(!shell.commit(outcome));
        assert_eq!(shell.state().as_str(), "loading");
    }

    #[tokio::test]
    async fn test_loaded_banner_rendered() {
        let mut shell = DocumentShell::new();
        shell
            .load(&markdown("guide.md", "---\ntitle: Guide\n---\n\nBody\n"))
            .await;
        let html = shell.render(&pipeline());
        assert!(html.contains(r#"<h1 class="document-banner-title">Guide</h1>"#));
    }
}
