#![forbid(unsafe_code)]

//! Entity state snapshots and the state source seam.
//!
//! The home-automation system pushes a full map of entity id → state object
//! on every refresh. The toggle only ever reads the `state` string of its
//! bound entity; attributes are kept so hosts can round-trip snapshots.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One entity's state object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    /// Raw state word (`on`, `off`, `locked`, `unavailable`, ...).
    pub state: String,
    /// Free-form attributes. Not interpreted.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl EntityState {
    /// A state object with no attributes.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: serde_json::Map::new(),
        }
    }
}

/// Keyed lookup from entity id to its current state object.
pub trait StateSource {
    /// State of `entity_id`, or `None` if the entity is unknown.
    fn entity(&self, entity_id: &str) -> Option<&EntityState>;
}

/// Owned snapshot of every entity state, as delivered by one refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    entities: AHashMap<String, EntityState>,
}

impl StateSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        self.insert(entity_id, EntityState::new(state));
        self
    }

    /// Insert or replace one entity.
    pub fn insert(&mut self, entity_id: impl Into<String>, state: EntityState) {
        self.entities.insert(entity_id.into(), state);
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the snapshot holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Parse the JSON state map (`{"light.x": {"state": "on", ...}, ...}`).
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl StateSource for StateSnapshot {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }
}

impl<S: StateSource + ?Sized> StateSource for &S {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        (**self).entity(entity_id)
    }
}
