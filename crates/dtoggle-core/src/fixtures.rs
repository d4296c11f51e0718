#![forbid(unsafe_code)]

//! Fixture builders for tests (feature `test-helpers`).

use crate::config::ToggleConfig;
use crate::entity::BinaryState;
use crate::geometry::ThumbGeometry;
use crate::state::StateSnapshot;

/// Default-option config bound to `entity`.
///
/// # Panics
/// If `entity` is blank.
#[must_use]
pub fn config(entity: &str) -> ToggleConfig {
    ToggleConfig::for_entity(entity).expect("fixture entity must not be blank")
}

/// Snapshot holding one entity.
#[must_use]
pub fn snapshot(entity: &str, state: &str) -> StateSnapshot {
    StateSnapshot::new().with(entity, state)
}

/// Geometry the host would measure for a thumb resting on `side`.
#[must_use]
pub fn resting_geometry(config: &ToggleConfig, side: BinaryState) -> ThumbGeometry {
    config
        .size_spec()
        .resting_geometry(config.orientation, side)
}
