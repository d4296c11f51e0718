#![forbid(unsafe_code)]

//! Core: entity vocabulary, pointer events, geometry, and card configuration.
//!
//! # Role in dtoggle
//! `dtoggle-core` is the vocabulary layer. It owns the types the controller
//! and the host agree on, and the two seams to the outside world:
//!
//! - **[`StateSource`](state::StateSource)**: keyed lookup of entity snapshots
//!   pushed by the home-automation system.
//! - **[`CommandSink`](command::CommandSink)**: fire-and-forget service calls.
//!
//! # Primary responsibilities
//! - **Entity kinds**: one static table mapping a kind to its state
//!   vocabulary and command selector.
//! - **Geometry**: track/thumb extents, clamping, and the midpoint tie-break.
//! - **Configuration**: the card options, their defaults, and setup-time
//!   validation.
//! - **Errors**: the taxonomy and the recovery action each one maps to.
//!
//! # How it fits in the system
//! The controller (`dtoggle-widgets`) consumes these types and never touches
//! I/O. The host adapter (`dtoggle-web`) feeds it and carries its outputs
//! back to the embedding environment.

pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod state;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;

pub use command::{CommandSink, RecordingSink, ServiceCall};
pub use config::{CardInfo, ReconcilePolicy, SizePreset, SizeSpec, ToggleConfig};
pub use entity::{BinaryState, CommandSelector, EntityBinding, EntityKind, Vocabulary};
pub use error::{ConfigError, Recovery, Result, ToggleError};
pub use event::{HitTarget, PointerInput, PointerKind, PointerPosition};
pub use geometry::{Offset, Orientation, Size, ThumbGeometry, TrackSpan};
pub use state::{EntityState, StateSnapshot, StateSource};
