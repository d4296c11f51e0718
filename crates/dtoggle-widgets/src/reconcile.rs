#![forbid(unsafe_code)]

//! Optimistic state reconciliation.
//!
//! After a user toggle the controller shows the new side immediately, before
//! the home-automation system confirms it. [`Reconciler`] holds that
//! optimistic side and decides, on every refresh, whether the real state has
//! caught up.
//!
//! # Invariants
//!
//! 1. With [`ReconcilePolicy::ClearOnChange`], a refresh whose raw state equals
//!    the previous refresh's raw state never clears the optimistic side.
//! 2. The first refresh (nothing to compare against) never clears under
//!    `ClearOnChange`.
//! 3. A refresh that lacks the bound entity never clears under
//!    `ClearOnChange`, and the next refresh has nothing to compare against.
//! 4. Until a refresh has been observed the effective side is unavailable.

use dtoggle_core::logging::TARGET_RECONCILE;
use dtoggle_core::{BinaryState, EntityState, ReconcilePolicy, ToggleError, Vocabulary};

/// What a refresh did to the optimistic side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No optimistic side was pending.
    Idle,
    /// The optimistic side survived the refresh.
    Kept,
    /// The optimistic side was dropped; the real state is shown again.
    Cleared,
}

/// Tracks the last observed raw state and the pending optimistic side.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: ReconcilePolicy,
    optimistic: Option<BinaryState>,
    last_raw: Option<String>,
    delivered: bool,
}

impl Reconciler {
    /// Create a reconciler that has seen nothing yet.
    #[must_use]
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Active policy.
    #[must_use]
    pub const fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Pending optimistic side, if any.
    #[must_use]
    pub const fn optimistic(&self) -> Option<BinaryState> {
        self.optimistic
    }

    /// Raw state from the most recent refresh, if the entity was present.
    #[must_use]
    pub fn external_raw(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }

    /// Whether any refresh has been observed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.delivered
    }

    /// Record a user-initiated side change.
    pub fn set_optimistic(&mut self, side: BinaryState) {
        self.optimistic = Some(side);
    }

    /// Feed one refresh. `entity` is the bound entity's state in it.
    pub fn observe(&mut self, entity: Option<&EntityState>) -> ReconcileOutcome {
        let next = entity.map(|e| e.state.as_str());
        let outcome = match self.optimistic {
            None => ReconcileOutcome::Idle,
            Some(_) => {
                let clear = match self.policy {
                    ReconcilePolicy::ClearOnRefresh => true,
                    ReconcilePolicy::ClearOnChange => match (self.last_raw.as_deref(), next) {
                        (Some(prev), Some(next)) => prev != next,
                        _ => false,
                    },
                };
                if clear {
                    self.optimistic = None;
                    ReconcileOutcome::Cleared
                } else {
                    ReconcileOutcome::Kept
                }
            }
        };

        tracing::debug!(
            target: TARGET_RECONCILE,
            previous = self.last_raw.as_deref().unwrap_or("<none>"),
            next = next.unwrap_or("<none>"),
            ?outcome,
            "state refresh observed"
        );

        self.last_raw = next.map(str::to_owned);
        self.delivered = true;
        outcome
    }

    /// Side to render and to base gesture decisions on.
    ///
    /// Optimistic side first, then the real state, then the off side when the
    /// entity is missing from an otherwise delivered snapshot.
    pub fn effective(&self, vocabulary: &Vocabulary) -> Result<BinaryState, ToggleError> {
        if !self.delivered {
            return Err(ToggleError::Unavailable);
        }
        Ok(self.optimistic.unwrap_or_else(|| {
            self.last_raw
                .as_deref()
                .map_or(BinaryState::Off, |raw| vocabulary.interpret(raw))
        }))
    }
}
