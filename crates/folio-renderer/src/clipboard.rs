//! Clipboard access and transient "copied" feedback.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long the copied indicator stays visible after a successful copy.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1200);

/// Error from a clipboard write.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard is available in this environment.
    #[error("clipboard unavailable")]
    Unavailable,
    /// The platform rejected the write.
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Platform clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard that keeps the last written text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self
            .contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(text.to_owned());
        Ok(())
    }
}

/// Clipboard for environments without one. Every write fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Copied-indicator timer shared by every block with a copy action.
///
/// The indicator turns on after a successful write and turns off once
/// [`COPY_FEEDBACK_DURATION`] has elapsed since it turned on. Copies while it
/// is showing do not extend it. Failed writes leave the state untouched and
/// are never surfaced.
#[derive(Clone, Debug)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
    duration: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            copied_at: None,
            duration: COPY_FEEDBACK_DURATION,
        }
    }

    /// Write `text` to `clipboard`. Returns whether the write succeeded.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, text: &str, now: Instant) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                if !self.is_active(now) {
                    self.copied_at = Some(now);
                }
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Copy to clipboard failed");
                false
            }
        }
    }

    /// Whether the copied indicator is showing at `now`.
    #[must_use]
    pub fn is_active(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.duration)
    }
}
