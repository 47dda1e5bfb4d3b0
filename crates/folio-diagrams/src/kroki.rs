//! Mermaid rendering through a Kroki server.
//!
//! Each diagram is sent as `POST {server}/mermaid/svg` with the theme
//! injected as a mermaid init directive at the top of the source.

use std::time::Duration;

use folio_renderer::Theme;
use ureq::Agent;

use crate::engine::{DiagramEngine, EngineConfig};
use crate::error::DiagramError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT: &str = "mermaid";

/// Create an HTTP agent with the specified timeout.
///
/// Non-2xx statuses are returned as responses so their bodies can be read
/// for error details.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Mermaid theme name for the document theme.
#[must_use]
pub fn mermaid_theme(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "default",
        Theme::Dark => "dark",
    }
}

/// Prefix `source` with an init directive selecting the theme.
#[must_use]
pub fn with_init_directive(source: &str, theme: Theme) -> String {
    format!(
        "%%{{init: {{\"theme\": \"{}\"}}}}%%\n{source}",
        mermaid_theme(theme)
    )
}

/// [`DiagramEngine`] backed by a Kroki server.
pub struct KrokiEngine {
    server_url: String,
    agent: Agent,
    theme: Theme,
}

impl KrokiEngine {
    /// Engine for `server_url` (e.g. `https://kroki.io`) with the default timeout.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(server_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            agent: create_agent(timeout),
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint_url(&self) -> String {
        format!("{}/{ENDPOINT}/svg", self.server_url)
    }
}

impl DiagramEngine for KrokiEngine {
    fn initialize(&mut self, config: &EngineConfig) -> Result<(), DiagramError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(DiagramError::Initialization(format!(
                "invalid Kroki URL '{}'",
                self.server_url
            )));
        }
        self.theme = config.theme;
        tracing::info!(server = %self.server_url, theme = %config.theme, "Kroki engine ready");
        Ok(())
    }

    fn configure(&mut self, config: &EngineConfig) {
        self.theme = config.theme;
    }

    fn render(&self, id: &str, source: &str) -> Result<String, DiagramError> {
        tracing::debug!(id, theme = %self.theme, "Rendering diagram via Kroki");
        let body = with_init_directive(source, self.theme);

        let response = self
            .agent
            .post(&self.endpoint_url())
            .header("Content-Type", "text/plain")
            .send(body.as_bytes())
            .map_err(|e| DiagramError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let message = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::Rejected {
                status,
                message: message.trim().to_owned(),
            });
        }

        let svg = body
            .read_to_string()
            .map_err(|e| DiagramError::Io(e.to_string()))?;
        if svg.trim().is_empty() {
            return Err(DiagramError::EmptyOutput);
        }
        Ok(svg.trim().to_owned())
    }
}
