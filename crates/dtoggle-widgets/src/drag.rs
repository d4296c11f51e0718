#![forbid(unsafe_code)]

//! One in-progress drag.
//!
//! A [`DragSession`] is created on press, follows the pointer, and is
//! consumed on release. It owns the [`ListenerGuard`] for the window
//! listeners, so the listeners live exactly as long as the session.
//!
//! Geometry is captured once at press time. If the host reports that the
//! geometry went away mid-drag the session is marked stale and its release
//! resolves to nothing.

use std::time::Duration;

use dtoggle_core::{
    BinaryState, Orientation, PointerInput, PointerKind, PointerPosition, ThumbGeometry,
    ToggleError, TrackSpan,
};
use web_time::Instant;

use crate::listeners::ListenerGuard;

/// State of one drag between press and release.
#[derive(Debug)]
pub struct DragSession {
    orientation: Orientation,
    pointer_kind: PointerKind,
    origin_pointer: PointerPosition,
    origin_offset: i32,
    offset: i32,
    span: TrackSpan,
    started_at: Instant,
    moves: u32,
    stale: bool,
    listeners: ListenerGuard,
}

/// What a finished drag resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRelease {
    /// Final clamped thumb offset.
    pub offset: i32,
    /// Side under the final offset; `None` when the geometry went stale.
    pub resolved: Option<BinaryState>,
    /// Number of move samples applied.
    pub moves: u32,
    /// Listeners detached by ending the session.
    pub listeners_released: usize,
    /// Time from press to release.
    pub duration: Duration,
}

impl DragSession {
    /// Start a drag at `input`, with the thumb measured as `geometry`.
    #[must_use]
    pub fn begin(
        orientation: Orientation,
        input: PointerInput,
        geometry: ThumbGeometry,
        listeners: ListenerGuard,
        now: Instant,
    ) -> Self {
        let span = geometry.span(orientation);
        let origin_offset = span.clamp(geometry.origin(orientation));
        Self {
            orientation,
            pointer_kind: input.kind,
            origin_pointer: input.position,
            origin_offset,
            offset: origin_offset,
            span,
            started_at: now,
            moves: 0,
            stale: false,
            listeners,
        }
    }

    /// Follow the pointer to `position`; returns the new clamped offset.
    pub fn update(&mut self, position: PointerPosition) -> i32 {
        let delta = position.delta_from(self.origin_pointer, self.orientation);
        self.offset = self.span.clamp(self.origin_offset.saturating_add(delta));
        self.moves = self.moves.saturating_add(1);
        self.offset
    }

    /// Current thumb offset along the drag axis.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Thumb offset when the drag started.
    #[must_use]
    pub const fn origin_offset(&self) -> i32 {
        self.origin_offset
    }

    #[must_use]
    pub const fn span(&self) -> TrackSpan {
        self.span
    }

    #[must_use]
    pub const fn pointer_kind(&self) -> PointerKind {
        self.pointer_kind
    }

    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Side the thumb would land on if released now.
    #[must_use]
    pub fn resolve(&self) -> BinaryState {
        self.span.resolve(self.offset)
    }

    /// Like [`DragSession::resolve`], but fails once the geometry is stale.
    pub fn try_resolve(&self) -> Result<BinaryState, ToggleError> {
        if self.stale {
            Err(ToggleError::StaleGeometry)
        } else {
            Ok(self.resolve())
        }
    }

    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// The measured geometry no longer exists.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Time since the press.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Finish the drag, detaching its listeners.
    #[must_use]
    pub fn end(self, now: Instant) -> DragRelease {
        let resolved = self.try_resolve().ok();
        let duration = self.elapsed(now);
        DragRelease {
            offset: self.offset,
            resolved,
            moves: self.moves,
            listeners_released: self.listeners.release(),
            duration,
        }
    }
}
