#![forbid(unsafe_code)]

//! Entity kinds and the per-kind strategy table.
//!
//! Every bound entity is either a generic binary entity (`on`/`off`, toggled
//! with one generic service) or a lock (`locked`/`unlocked`, driven with two
//! distinct services). The gesture and reconciliation logic is identical for
//! both; only the words and the command differ, so the difference lives in
//! one table, [`EntityKind::binding`], resolved once per render or commit.
//!
//! # Invariants
//!
//! 1. [`Vocabulary::interpret`] is total: any raw string that is not the
//!    on-word (including `unavailable`, `jammed`, the empty string) maps to
//!    [`BinaryState::Off`].
//! 2. `interpret(word(s)) == s` for both sides of every vocabulary.

use serde::{Deserialize, Serialize};

use crate::command::ServiceCall;

/// Which side of the track the thumb rests on.
///
/// `On` is the leading edge (top/left). For locks the on side is `unlocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryState {
    On,
    Off,
}

impl BinaryState {
    /// The other side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// True for the on side.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Build from a boolean (`true` ⇒ on side).
    #[must_use]
    pub const fn from_on(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Stable lowercase name, used in log fields and CSS classes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// The two raw state words an entity kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub on: &'static str,
    pub off: &'static str,
}

impl Vocabulary {
    /// Raw word for a side.
    #[must_use]
    pub const fn word(&self, state: BinaryState) -> &'static str {
        match state {
            BinaryState::On => self.on,
            BinaryState::Off => self.off,
        }
    }

    /// Map a raw entity state onto a side.
    #[must_use]
    pub fn interpret(&self, raw: &str) -> BinaryState {
        BinaryState::from_on(raw == self.on)
    }
}

/// How a side change becomes a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSelector {
    /// One service flips the entity whichever way it goes.
    Toggle {
        domain: &'static str,
        service: &'static str,
    },
    /// A dedicated service per target side.
    Directed {
        domain: &'static str,
        to_on: &'static str,
        to_off: &'static str,
    },
}

impl CommandSelector {
    /// `(domain, service)` that moves the entity to `target`.
    #[must_use]
    pub const fn select(&self, target: BinaryState) -> (&'static str, &'static str) {
        match *self {
            Self::Toggle { domain, service } => (domain, service),
            Self::Directed {
                domain,
                to_on,
                to_off,
            } => match target {
                BinaryState::On => (domain, to_on),
                BinaryState::Off => (domain, to_off),
            },
        }
    }
}

/// Vocabulary and command selector for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityBinding {
    pub kind: EntityKind,
    pub vocabulary: Vocabulary,
    pub commands: CommandSelector,
}

impl EntityBinding {
    /// Service call that moves `entity_id` to `target`.
    #[must_use]
    pub fn command_for(&self, entity_id: &str, target: BinaryState) -> ServiceCall {
        let (domain, service) = self.commands.select(target);
        ServiceCall::new(domain, service, entity_id)
    }
}

const BINDINGS: [EntityBinding; 2] = [
    EntityBinding {
        kind: EntityKind::Generic,
        vocabulary: Vocabulary {
            on: "on",
            off: "off",
        },
        commands: CommandSelector::Toggle {
            domain: "homeassistant",
            service: "toggle",
        },
    },
    EntityBinding {
        kind: EntityKind::Lock,
        vocabulary: Vocabulary {
            on: "unlocked",
            off: "locked",
        },
        commands: CommandSelector::Directed {
            domain: "lock",
            to_on: "unlock",
            to_off: "lock",
        },
    },
];

/// Classification of the bound entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `on`/`off` entities: switches, lights, input booleans, ...
    Generic,
    /// `lock.*` entities.
    Lock,
}

impl EntityKind {
    /// Classify an entity id by its namespace (`<domain>.<object_id>`).
    #[must_use]
    pub fn from_entity_id(entity_id: &str) -> Self {
        match entity_id.split_once('.') {
            Some(("lock", _)) => Self::Lock,
            _ => Self::Generic,
        }
    }

    /// The strategy-table entry for this kind.
    #[must_use]
    pub const fn binding(self) -> &'static EntityBinding {
        match self {
            Self::Generic => &BINDINGS[0],
            Self::Lock => &BINDINGS[1],
        }
    }
}
