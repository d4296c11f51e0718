#![forbid(unsafe_code)]

//! Canonical pointer input types.
//!
//! The host translates browser (or terminal) pointer signals into these
//! values before handing them to the controller.
//!
//! # Design Notes
//!
//! - Coordinates are client pixels as integers; sub-pixel precision is
//!   dropped by the host.
//! - Mouse and touch share one lifecycle. [`PointerKind`] is carried only for
//!   logging and host bookkeeping.
//! - [`HitTarget`] says which part of the card received the press or click.

use serde::{Deserialize, Serialize};

use crate::geometry::Orientation;

/// Input device that produced a pointer signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

impl PointerKind {
    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Touch => "touch",
        }
    }
}

/// Part of the card hit by a press or click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitTarget {
    /// The draggable thumb (or anything nested inside it).
    Thumb,
    /// The container, track, or side icons: anywhere except the thumb.
    Track,
}

/// A pointer coordinate in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component of this position along the drag axis.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.y,
            Orientation::Horizontal => self.x,
        }
    }

    /// Signed distance from `origin` to `self` along the drag axis.
    #[must_use]
    pub const fn delta_from(self, origin: Self, orientation: Orientation) -> i32 {
        self.along(orientation).saturating_sub(origin.along(orientation))
    }
}

impl From<(i32, i32)> for PointerPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// One pointer sample: where, and with what device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub position: PointerPosition,
}

impl PointerInput {
    /// A mouse sample at `(x, y)`.
    #[must_use]
    pub const fn mouse(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Mouse,
            position: PointerPosition::new(x, y),
        }
    }

    /// A touch sample at `(x, y)` (first touch point).
    #[must_use]
    pub const fn touch(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Touch,
            position: PointerPosition::new(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn along_picks_axis_component() {
        let p = PointerPosition::new(3, 40);
        assert_eq!(p.along(Orientation::Vertical), 40);
        assert_eq!(p.along(Orientation::Horizontal), 3);
    }

    #[test]
    fn delta_is_signed() {
        let origin = PointerPosition::new(10, 100);
        let up = PointerPosition::new(10, 60);
        assert_eq!(up.delta_from(origin, Orientation::Vertical), -40);
        assert_eq!(origin.delta_from(up, Orientation::Vertical), 40);
        // Cross-axis motion contributes nothing.
        let sideways = PointerPosition::new(90, 100);
        assert_eq!(sideways.delta_from(origin, Orientation::Vertical), 0);
    }

    #[test]
    fn delta_saturates_instead_of_overflowing() {
        let origin = PointerPosition::new(i32::MIN, 0);
        let far = PointerPosition::new(i32::MAX, 0);
        assert_eq!(far.delta_from(origin, Orientation::Horizontal), i32::MAX);
    }

    #[test]
    fn pointer_kind_serde_is_lowercase() {
        let json = serde_json::to_string(&PointerKind::Touch).unwrap();
        assert_eq!(json, "\"touch\"");
        let target: HitTarget = serde_json::from_str("\"thumb\"").unwrap();
        assert_eq!(target, HitTarget::Thumb);
    }
}
