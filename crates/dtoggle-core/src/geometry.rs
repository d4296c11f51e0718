#![forbid(unsafe_code)]

//! Geometric primitives for the toggle track.
//!
//! All values are integer pixels. The thumb moves along one axis inside the
//! track; its offset is measured from the track's leading edge (top for
//! vertical, left for horizontal).
//!
//! # Invariants
//!
//! 1. [`TrackSpan::clamp`] never returns a negative offset and never exceeds
//!    [`TrackSpan::max_offset`].
//! 2. `max_offset` is floored at 0, so a thumb larger than its track pins to
//!    the leading edge instead of producing an inverted range.
//! 3. [`TrackSpan::resolve`] uses the strict tie-break `offset < extent / 2`:
//!    an offset exactly at the midpoint resolves to the off side.

use serde::{Deserialize, Serialize};

use crate::entity::BinaryState;

/// Axis the thumb travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Stable lowercase name (also the CSS class the card uses).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Width and height of an element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along the drag axis.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }
}

/// Position of an element relative to its offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub left: i32,
    pub top: i32,
}

impl Offset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }

    /// Offset along the drag axis.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.top,
            Orientation::Horizontal => self.left,
        }
    }
}

/// Thumb and track measurements captured by the host at drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ThumbGeometry {
    /// Thumb position inside the track.
    pub thumb_offset: Offset,
    /// Thumb box size.
    pub thumb_size: Size,
    /// Track box size.
    pub track_size: Size,
}

impl ThumbGeometry {
    /// Thumb offset along the drag axis.
    #[must_use]
    pub const fn origin(&self, orientation: Orientation) -> i32 {
        self.thumb_offset.along(orientation)
    }

    /// Track/thumb extents along the drag axis.
    #[must_use]
    pub const fn span(&self, orientation: Orientation) -> TrackSpan {
        TrackSpan::new(
            self.track_size.along(orientation),
            self.thumb_size.along(orientation),
        )
    }
}

/// One-dimensional view of the track: how far the thumb can travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrackSpan {
    pub track_extent: i32,
    pub thumb_extent: i32,
}

impl TrackSpan {
    /// Create a span from track and thumb extents.
    #[must_use]
    pub const fn new(track_extent: i32, thumb_extent: i32) -> Self {
        Self {
            track_extent,
            thumb_extent,
        }
    }

    /// Largest legal thumb offset, floored at 0.
    #[must_use]
    pub const fn max_offset(&self) -> i32 {
        let room = self.track_extent.saturating_sub(self.thumb_extent);
        if room < 0 { 0 } else { room }
    }

    /// Clamp a candidate offset into `[0, max_offset]`.
    #[must_use]
    pub fn clamp(&self, offset: i32) -> i32 {
        offset.clamp(0, self.max_offset())
    }

    /// Which side a thumb resting at `offset` resolves to.
    ///
    /// Computed as `2 * offset < track_extent` so odd extents need no
    /// floating point.
    #[must_use]
    pub fn resolve(&self, offset: i32) -> BinaryState {
        if 2 * i64::from(offset) < i64::from(self.track_extent) {
            BinaryState::On
        } else {
            BinaryState::Off
        }
    }
}
