//! Preview state machine.
//!
//! ```text
//!            open                zoom / wheel / drag / toggle-fit
//! Closed ──────────▶ OpenFit ─────────────────────────────────▶ OpenManual
//!   ▲                  ▲   ◀──────────── toggle-fit / reset ──────┘
//!   └──── close ───────┴──────────────────────────────────────────┘
//! ```
//!
//! Rotation is orthogonal to the phase. Scale and offset are kept verbatim
//! while in fit mode; they only stop affecting layout.

use serde::{Deserialize, Serialize};

use crate::content::PreviewContent;

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 6.0;
/// Scale change per zoom button press.
pub const ZOOM_STEP: f64 = 0.25;
/// Scale change per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;
/// Rotation per rotate action, in degrees.
pub const ROTATION_STEP: u16 = 90;

/// Viewport-relative translation in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Active drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    /// Pointer that started the drag. Other pointers are ignored until release.
    pub pointer_id: u32,
    /// Pointer position at pointer-down.
    pub origin: Offset,
    /// Content offset at pointer-down.
    pub start_offset: Offset,
}

/// Transform state of an open preview.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewState {
    pub scale: f64,
    /// Always one of 0, 90, 180, 270.
    pub rotation_degrees: u16,
    pub fit_mode: bool,
    pub offset: Offset,
    pub drag: Option<Drag>,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: 0,
            fit_mode: true,
            offset: Offset::ZERO,
            drag: None,
        }
    }
}

impl PreviewState {
    /// CSS transform for the content element.
    ///
    /// Fit mode applies rotation only. Manual mode applies
    /// translate → scale → rotate; the translation comes first so dragging
    /// moves along screen axes whatever the rotation.
    #[must_use]
    pub fn css_transform(&self) -> String {
        if self.fit_mode {
            format!("rotate({}deg)", self.rotation_degrees)
        } else {
            format!(
                "translate({}px, {}px) scale({}) rotate({}deg)",
                self.offset.x, self.offset.y, self.scale, self.rotation_degrees
            )
        }
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.fit_mode = false;
    }
}

/// Controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewPhase {
    Closed,
    OpenFit,
    OpenManual,
}

impl PreviewPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::OpenFit => "open-fit",
            Self::OpenManual => "open-manual",
        }
    }
}

/// User input understood by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PreviewEvent {
    Open(PreviewContent),
    Close,
    ZoomIn,
    ZoomOut,
    /// Wheel movement; positive is scroll-down.
    Wheel { delta_y: f64 },
    PointerDown { pointer_id: u32, x: f64, y: f64 },
    PointerMove { pointer_id: u32, x: f64, y: f64 },
    PointerUp { pointer_id: u32 },
    PointerCancel { pointer_id: u32 },
    Rotate,
    ToggleFit,
    Reset,
}

#[derive(Debug)]
struct Session {
    content: PreviewContent,
    state: PreviewState,
}

/// A single reusable preview modal.
///
/// Gesture methods return `true` when they changed the state. They are
/// no-ops while the preview is closed.
#[derive(Debug, Default)]
pub struct PreviewController {
    session: Option<Session>,
}

impl PreviewController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with `content`, replacing anything already shown. State always
    /// starts from defaults.
    pub fn open(&mut self, content: PreviewContent) {
        tracing::debug!(kind = content.kind(), "Opening preview");
        self.session = Some(Session {
            content,
            state: PreviewState::default(),
        });
    }

    /// Close and discard all session state. Returns `false` if already closed.
    pub fn close(&mut self) -> bool {
        self.session.take().is_some()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> PreviewPhase {
        match &self.session {
            None => PreviewPhase::Closed,
            Some(session) if session.state.fit_mode => PreviewPhase::OpenFit,
            Some(_) => PreviewPhase::OpenManual,
        }
    }

    /// Current state, `None` while closed.
    #[must_use]
    pub fn state(&self) -> Option<&PreviewState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// Content being shown, `None` while closed.
    #[must_use]
    pub fn content(&self) -> Option<&PreviewContent> {
        self.session.as_ref().map(|s| &s.content)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.update(|state| state.set_scale(state.scale + ZOOM_STEP))
    }

    pub fn zoom_out(&mut self) -> bool {
        self.update(|state| state.set_scale(state.scale - ZOOM_STEP))
    }

    /// Zoom by one wheel step: scroll-down zooms out, scroll-up zooms in.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if delta_y == 0.0 || delta_y.is_nan() {
            return false;
        }
        let step = if delta_y > 0.0 {
            -WHEEL_ZOOM_STEP
        } else {
            WHEEL_ZOOM_STEP
        };
        self.update(|state| state.set_scale(state.scale + step))
    }

    /// Begin a drag. Ignored while another pointer holds the capture.
    pub fn pointer_down(&mut self, pointer_id: u32, x: f64, y: f64) -> bool {
        self.update(|state| {
            if state.drag.is_none() {
                state.drag = Some(Drag {
                    pointer_id,
                    origin: Offset::new(x, y),
                    start_offset: state.offset,
                });
            }
        })
    }

    /// Move the content by the cursor delta from the drag origin.
    pub fn pointer_move(&mut self, pointer_id: u32, x: f64, y: f64) -> bool {
        self.update(|state| {
            let Some(drag) = state.drag.filter(|d| d.pointer_id == pointer_id) else {
                return;
            };
            state.offset = Offset::new(
                drag.start_offset.x + (x - drag.origin.x),
                drag.start_offset.y + (y - drag.origin.y),
            );
            state.fit_mode = false;
        })
    }

    /// Release the capture held by `pointer_id`.
    pub fn pointer_up(&mut self, pointer_id: u32) -> bool {
        self.update(|state| {
            if state.drag.is_some_and(|d| d.pointer_id == pointer_id) {
                state.drag = None;
            }
        })
    }

    pub fn pointer_cancel(&mut self, pointer_id: u32) -> bool {
        self.pointer_up(pointer_id)
    }

    pub fn rotate(&mut self) -> bool {
        self.update(|state| {
            state.rotation_degrees = (state.rotation_degrees + ROTATION_STEP) % 360;
        })
    }

    /// Flip between fit and manual layout, keeping scale, rotation and offset.
    pub fn toggle_fit(&mut self) -> bool {
        self.update(|state| state.fit_mode = !state.fit_mode)
    }

    /// Back to fit defaults without closing.
    pub fn reset(&mut self) -> bool {
        self.update(|state| *state = PreviewState::default())
    }

    /// Dispatch an event.
    pub fn handle(&mut self, event: PreviewEvent) -> bool {
        match event {
            PreviewEvent::Open(content) => {
                self.open(content);
                true
            }
            PreviewEvent::Close => self.close(),
            PreviewEvent::ZoomIn => self.zoom_in(),
            PreviewEvent::ZoomOut => self.zoom_out(),
            PreviewEvent::Wheel { delta_y } => self.wheel(delta_y),
            PreviewEvent::PointerDown { pointer_id, x, y } => self.pointer_down(pointer_id, x, y),
            PreviewEvent::PointerMove { pointer_id, x, y } => self.pointer_move(pointer_id, x, y),
            PreviewEvent::PointerUp { pointer_id } => self.pointer_up(pointer_id),
            PreviewEvent::PointerCancel { pointer_id } => self.pointer_cancel(pointer_id),
            PreviewEvent::Rotate => self.rotate(),
            PreviewEvent::ToggleFit => self.toggle_fit(),
            PreviewEvent::Reset => self.reset(),
        }
    }

    fn update(&mut self, f: impl FnOnce(&mut PreviewState)) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let before = session.state.clone();
        f(&mut session.state);
        session.state != before
    }
}
