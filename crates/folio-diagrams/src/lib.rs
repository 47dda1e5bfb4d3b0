//! Diagram rendering for folio documents.
//!
//! `mermaid` code blocks are rendered by an external [`DiagramEngine`]. This
//! crate owns the lifecycle around it:
//!
//! - [`DiagramRuntime`]: the shared engine, initialized once and
//!   reconfigured on theme changes
//! - [`DiagramView`]: per-diagram pending/rendered/failed state with
//!   stale-result suppression, source toggle, copy and enlarge actions
//! - [`DiagramProcessor`]: the [`DiagramHook`](folio_renderer::DiagramHook)
//!   that mounts a view for each diagram block during a document render
//! - [`KrokiEngine`]: engine backed by a Kroki server
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_diagrams::{DiagramProcessor, DiagramRuntime, KrokiEngine};
//! use folio_renderer::{PlainHighlighter, Registry, RenderOptions, parse_markdown};
//!
//! let runtime = Arc::new(DiagramRuntime::new(KrokiEngine::new("https://kroki.io")));
//! let mut processor = DiagramProcessor::new(runtime, "guide.md");
//! let doc = parse_markdown("```mermaid\ngraph TD; A-->B\n```");
//! let output = Registry::with_default_blocks().render(
//!     &doc.nodes,
//!     RenderOptions::new(&PlainHighlighter).with_diagrams(&mut processor),
//! );
//! ```

mod engine;
mod error;
mod ids;
mod kroki;
mod processor;
mod runtime;
mod view;

pub use engine::{DiagramEngine, EngineConfig};
pub use error::DiagramError;
pub use ids::{instance_id, session_id};
pub use kroki::{DEFAULT_TIMEOUT, KrokiEngine, create_agent, mermaid_theme, with_init_directive};
pub use processor::DiagramProcessor;
pub use runtime::DiagramRuntime;
pub use view::{DiagramStatus, DiagramView, RenderJob, RenderOutcome, ViewMode};
