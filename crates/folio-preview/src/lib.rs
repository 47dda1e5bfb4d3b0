//! Interactive preview for images and diagrams.
//!
//! One [`PreviewController`] serves every trigger on a page. Triggers hand it
//! a [`PreviewContent`]; the host feeds it [`PreviewEvent`]s from the modal
//! and re-renders with [`PreviewController::render`].
//!
//! # Example
//!
//! ```
//! use folio_preview::{PreviewContent, PreviewController, PreviewEvent, PreviewPhase};
//!
//! let mut preview = PreviewController::new();
//! preview.handle(PreviewEvent::Open(PreviewContent::image("/arch.png", "Architecture")));
//! preview.handle(PreviewEvent::ZoomIn);
//! assert_eq!(preview.phase(), PreviewPhase::OpenManual);
//!
//! preview.handle(PreviewEvent::Reset);
//! assert_eq!(preview.phase(), PreviewPhase::OpenFit);
//! ```

mod content;
mod controller;
mod modal;

pub use content::PreviewContent;
pub use controller::{
    Drag, MAX_SCALE, MIN_SCALE, Offset, PreviewController, PreviewEvent, PreviewPhase,
    PreviewState, ROTATION_STEP, WHEEL_ZOOM_STEP, ZOOM_STEP,
};
