//! Diagram rendering errors.

/// Error from initializing or calling a diagram engine.
///
/// Never escapes a document render: callers turn it into a failed view and
/// a warning.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Transport failure talking to the engine.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The engine rejected the diagram source.
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("I/O error: {0}")]
    Io(String),
    /// The engine returned nothing to display.
    #[error("engine returned empty output")]
    EmptyOutput,
    /// The engine could not be set up with the given configuration.
    #[error("engine initialization failed: {0}")]
    Initialization(String),
    /// The render task panicked or was aborted by the runtime.
    #[error("render task failed: {0}")]
    Task(String),
}
