//! Diagram engine boundary.

use folio_renderer::Theme;

use crate::DiagramError;

/// Configuration handed to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub theme: Theme,
}

impl EngineConfig {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

/// An external diagram engine.
///
/// Output is inserted into documents verbatim; the engine is its own trust
/// boundary.
pub trait DiagramEngine: Send + Sync {
    /// Full one-time setup.
    fn initialize(&mut self, config: &EngineConfig) -> Result<(), DiagramError>;

    /// Apply theme-dependent configuration after initialization.
    fn configure(&mut self, config: &EngineConfig);

    /// Render `source` to markup. `id` is unique per render session and may
    /// be used by the engine for element ids inside the output.
    fn render(&self, id: &str, source: &str) -> Result<String, DiagramError>;
}
