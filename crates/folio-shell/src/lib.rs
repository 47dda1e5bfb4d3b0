//! Document shell for folio.
//!
//! Wraps loading a document body and turning it into a page:
//!
//! - [`DocumentLoader`]: async source of a document, with [`FileLoader`]
//!   (compiled `.json` or raw markdown on disk) and [`StaticLoader`]
//! - [`DocumentShell`]: loading/loaded/errored state that discards
//!   superseded loads
//! - [`DocumentMetadata`]: title, description, cover, author and dates,
//!   shown as a header banner when titled
//! - [`Pipeline`]: registry, highlighter, diagram runtime and link metadata
//!   source built from a [`Config`](folio_config::Config)

mod error;
mod loader;
mod metadata;
mod pipeline;
mod shell;

pub use error::LoadError;
pub use loader::{DocumentLoader, DocumentSource, FileLoader, LoadedDocument, StaticLoader};
pub use metadata::{DocumentMetadata, display_date};
pub use pipeline::Pipeline;
pub use shell::{DocumentShell, LoadJob, LoadOutcome, ShellState};
