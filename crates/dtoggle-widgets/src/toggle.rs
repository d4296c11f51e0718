#![forbid(unsafe_code)]

//! Drag-to-toggle controller.
//!
//! [`DragToggle`] is headless: the host feeds it state refreshes, pointer
//! samples, and clicks, and every call returns a [`ToggleDispatch`] saying
//! what the host must do (issue a service call, attach or detach the window
//! listeners) together with a structured [`ToggleLogEntry`].
//!
//! # Gesture lifecycle
//!
//! ```text
//! Idle --pointer_down(thumb)--> Dragging --pointer_up--> (commit) --> Idle
//!                                   |  ^
//!                          pointer_move |
//!                                   |--cancel / disconnect--> Idle
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] exists at a time, and its listeners are
//!    released exactly once, whichever path ends it.
//! 2. Gesture decisions compare against the effective side (optimistic side
//!    first), never against the raw external state alone.
//! 3. A release issues a command only when the resolved side differs from the
//!    effective side.
//! 4. Nothing is accepted before the first state refresh.

use dtoggle_core::logging::TARGET_GESTURE;
use dtoggle_core::{
    BinaryState, EntityBinding, EntityKind, HitTarget, PointerInput, PointerKind, Recovery,
    ServiceCall, StateSource, ThumbGeometry, ToggleConfig, ToggleError,
};
use web_time::Instant;

use crate::drag::DragSession;
use crate::listeners::{ListenerRegistry, OwnerId};
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::view::ToggleView;

/// Coarse gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
}

/// Host instruction for the window-level listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerCommand {
    /// Attach the move/up listeners to the window.
    Attach,
    /// Detach them.
    Detach,
}

/// Input recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLifecyclePhase {
    StateRefresh,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Click,
    GeometryLost,
    Connect,
    Disconnect,
}

/// Why an input changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIgnoredReason {
    /// No state refresh has been delivered yet.
    Unavailable,
    /// The host could not measure the thumb.
    StaleGeometry,
    /// A press arrived while a drag was already in progress.
    DragInProgress,
    /// Move, release, or cancel without a drag.
    NoActiveDrag,
    /// A press outside the thumb; the click that follows handles it.
    PressOffThumb,
    /// Clicks on the thumb are handled by the drag path.
    ThumbClick,
    /// The component is detached from the page.
    Disconnected,
    /// The click the page synthesizes after a drag ends off the thumb.
    ClickAfterDrag,
}

impl ToggleIgnoredReason {
    /// Error this reason corresponds to, if it is an error at all.
    #[must_use]
    pub const fn as_error(self) -> Option<ToggleError> {
        match self {
            Self::Unavailable => Some(ToggleError::Unavailable),
            Self::StaleGeometry => Some(ToggleError::StaleGeometry),
            _ => None,
        }
    }
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLogOutcome {
    Reconciled(ReconcileOutcome),
    DragStarted,
    DragMoved,
    /// A release or tap produced a side change and a command.
    Committed,
    /// A release landed on the side already in effect.
    NoChange,
    /// A release whose geometry went stale; listeners freed, nothing else.
    StaleRelease,
    Cancelled,
    GeometryInvalidated,
    Connected,
    Detached,
    Ignored(ToggleIgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleLogEntry {
    pub phase: ToggleLifecyclePhase,
    pub sequence: u64,
    pub pointer_kind: Option<PointerKind>,
    /// Thumb offset after the dispatch, when a drag was involved.
    pub offset: Option<i32>,
    /// Side committed by the dispatch, if any.
    pub side: Option<BinaryState>,
    pub listener_command: Option<ListenerCommand>,
    pub outcome: ToggleLogOutcome,
}

/// Result of one controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleDispatch {
    /// Service call the host must issue.
    pub service_call: Option<ServiceCall>,
    /// Listener change the host must apply.
    pub listener_command: Option<ListenerCommand>,
    pub log: ToggleLogEntry,
}

impl ToggleDispatch {
    fn new(phase: ToggleLifecyclePhase, outcome: ToggleLogOutcome) -> Self {
        Self {
            service_call: None,
            listener_command: None,
            log: ToggleLogEntry {
                phase,
                sequence: 0,
                pointer_kind: None,
                offset: None,
                side: None,
                listener_command: None,
                outcome,
            },
        }
    }

    fn ignored(phase: ToggleLifecyclePhase, reason: ToggleIgnoredReason) -> Self {
        Self::new(phase, ToggleLogOutcome::Ignored(reason))
    }

    fn with_pointer(mut self, kind: PointerKind) -> Self {
        self.log.pointer_kind = Some(kind);
        self
    }

    fn with_offset(mut self, offset: i32) -> Self {
        self.log.offset = Some(offset);
        self
    }

    fn with_listeners(mut self, command: ListenerCommand) -> Self {
        self.listener_command = Some(command);
        self.log.listener_command = Some(command);
        self
    }

    fn with_commit(mut self, side: BinaryState, call: ServiceCall) -> Self {
        self.log.side = Some(side);
        self.service_call = Some(call);
        self
    }

    /// Whether the input changed nothing.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, ToggleLogOutcome::Ignored(_))
    }
}

/// Headless drag-to-toggle controller for one entity.
#[derive(Debug)]
pub struct DragToggle {
    config: ToggleConfig,
    binding: &'static EntityBinding,
    reconciler: Reconciler,
    registry: ListenerRegistry,
    owner: OwnerId,
    session: Option<DragSession>,
    /// Set by a release that moved the thumb; consumed by the next input.
    swallow_click: bool,
    disconnected: bool,
    next_sequence: u64,
}

impl DragToggle {
    /// Create a controller. `registry` is the window shared by every toggle.
    #[must_use]
    pub fn new(config: ToggleConfig, registry: ListenerRegistry) -> Self {
        let binding = config.entity_kind().binding();
        let reconciler = Reconciler::new(config.optimistic_policy);
        let owner = registry.register_owner();
        Self {
            config,
            binding,
            reconciler,
            registry,
            owner,
            session: None,
            swallow_click: false,
            disconnected: false,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ToggleConfig {
        &self.config
    }

    #[must_use]
    pub const fn entity_kind(&self) -> EntityKind {
        self.binding.kind
    }

    /// Owner id under which this toggle registers window listeners.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    #[must_use]
    pub const fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        if self.session.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        !self.disconnected
    }

    /// Pending optimistic side.
    #[must_use]
    pub const fn optimistic(&self) -> Option<BinaryState> {
        self.reconciler.optimistic()
    }

    /// Raw state of the bound entity from the last refresh.
    #[must_use]
    pub fn external_state(&self) -> Option<&str> {
        self.reconciler.external_raw()
    }

    /// Side currently in effect.
    pub fn effective_state(&self) -> Result<BinaryState, ToggleError> {
        self.reconciler.effective(&self.binding.vocabulary)
    }

    /// Raw word for the side currently in effect.
    pub fn effective_word(&self) -> Result<&'static str, ToggleError> {
        self.effective_state()
            .map(|side| self.binding.vocabulary.word(side))
    }

    /// Live thumb offset while dragging.
    #[must_use]
    pub fn drag_offset(&self) -> Option<i32> {
        self.session.as_ref().map(DragSession::offset)
    }

    /// View model, or `None` until a state refresh has arrived.
    #[must_use]
    pub fn view(&self) -> Option<ToggleView> {
        let side = self.effective_state().ok()?;
        Some(ToggleView::build(&self.config, side, self.drag_offset()))
    }

    /// Deliver a new state snapshot.
    pub fn refresh<S: StateSource + ?Sized>(&mut self, states: &S) -> ToggleDispatch {
        self.dispatch(ToggleLifecyclePhase::StateRefresh, |this| {
            if this.disconnected {
                return ToggleDispatch::ignored(
                    ToggleLifecyclePhase::StateRefresh,
                    ToggleIgnoredReason::Disconnected,
                );
            }
            let entity = states.entity(&this.config.entity);
            let outcome = this.reconciler.observe(entity);
            ToggleDispatch::new(
                ToggleLifecyclePhase::StateRefresh,
                ToggleLogOutcome::Reconciled(outcome),
            )
        })
    }

    /// Press on the card. Only a press on the thumb starts a drag; `geometry`
    /// is the thumb/track measurement at this instant, `None` if the host
    /// could not take it.
    pub fn pointer_down(
        &mut self,
        target: HitTarget,
        input: PointerInput,
        geometry: Option<ThumbGeometry>,
        now: Instant,
    ) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::PointerDown;
        self.dispatch(PHASE, |this| {
            if let Some(reason) = this.input_blocker() {
                return ToggleDispatch::ignored(PHASE, reason).with_pointer(input.kind);
            }
            if this.session.is_some() {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::DragInProgress)
                    .with_pointer(input.kind);
            }
            if target != HitTarget::Thumb {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::PressOffThumb)
                    .with_pointer(input.kind);
            }
            let Some(geometry) = geometry else {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::StaleGeometry)
                    .with_pointer(input.kind);
            };

            let guard = this.registry.acquire(this.owner);
            let session =
                DragSession::begin(this.config.orientation, input, geometry, guard, now);
            let offset = session.offset();
            this.session = Some(session);
            ToggleDispatch::new(PHASE, ToggleLogOutcome::DragStarted)
                .with_pointer(input.kind)
                .with_offset(offset)
                .with_listeners(ListenerCommand::Attach)
        })
    }

    /// Pointer moved anywhere on the window.
    pub fn pointer_move(&mut self, input: PointerInput) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::PointerMove;
        self.dispatch(PHASE, |this| {
            let Some(session) = this.session.as_mut() else {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::NoActiveDrag)
                    .with_pointer(input.kind);
            };
            let offset = session.update(input.position);
            ToggleDispatch::new(PHASE, ToggleLogOutcome::DragMoved)
                .with_pointer(input.kind)
                .with_offset(offset)
        })
    }

    /// Pointer released anywhere on the window.
    ///
    /// The side is resolved from the thumb's last offset, not from the
    /// release coordinate.
    pub fn pointer_up(&mut self, input: PointerInput, now: Instant) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::PointerUp;
        self.dispatch(PHASE, |this| {
            this.finish_drag(PHASE, now).with_pointer(input.kind)
        })
    }

    /// Abort the drag without committing (pointer cancel, window blur).
    pub fn cancel(&mut self, now: Instant) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::PointerCancel;
        self.dispatch(PHASE, |this| {
            let Some(session) = this.session.take() else {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::NoActiveDrag);
            };
            let kind = session.pointer_kind();
            let release = session.end(now);
            ToggleDispatch::new(PHASE, ToggleLogOutcome::Cancelled)
                .with_pointer(kind)
                .with_offset(release.offset)
                .with_listeners(ListenerCommand::Detach)
        })
    }

    /// The measured thumb or track is gone (re-render, element removed).
    pub fn invalidate_geometry(&mut self) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::GeometryLost;
        self.dispatch(PHASE, |this| {
            let Some(session) = this.session.as_mut() else {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::NoActiveDrag);
            };
            session.mark_stale();
            ToggleDispatch::new(PHASE, ToggleLogOutcome::GeometryInvalidated)
                .with_pointer(session.pointer_kind())
                .with_offset(session.offset())
        })
    }

    /// Click on the card. A click outside the thumb flips the side, unless it
    /// is the click that directly follows a drag release.
    pub fn click(&mut self, target: HitTarget) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::Click;
        self.dispatch(PHASE, |this| {
            let after_drag = std::mem::take(&mut this.swallow_click);
            if let Some(reason) = this.input_blocker() {
                return ToggleDispatch::ignored(PHASE, reason);
            }
            if after_drag {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::ClickAfterDrag);
            }
            if target == HitTarget::Thumb {
                return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::ThumbClick);
            }
            let current = match this.effective_state() {
                Ok(side) => side,
                Err(_) => {
                    return ToggleDispatch::ignored(PHASE, ToggleIgnoredReason::Unavailable);
                }
            };
            this.commit(PHASE, current.flipped())
        })
    }

    /// Component attached to the page again.
    pub fn connect(&mut self) -> ToggleDispatch {
        self.dispatch(ToggleLifecyclePhase::Connect, |this| {
            this.disconnected = false;
            ToggleDispatch::new(ToggleLifecyclePhase::Connect, ToggleLogOutcome::Connected)
        })
    }

    /// Component removed from the page.
    ///
    /// A drag in progress is released through the normal release path and
    /// commits by the same rule; its listeners are detached either way.
    pub fn disconnect(&mut self, now: Instant) -> ToggleDispatch {
        const PHASE: ToggleLifecyclePhase = ToggleLifecyclePhase::Disconnect;
        self.dispatch(PHASE, |this| {
            let dispatch = if this.session.is_some() {
                this.finish_drag(PHASE, now)
            } else {
                ToggleDispatch::new(PHASE, ToggleLogOutcome::Detached)
            };
            this.disconnected = true;
            dispatch
        })
    }

    fn input_blocker(&self) -> Option<ToggleIgnoredReason> {
        if self.disconnected {
            Some(ToggleIgnoredReason::Disconnected)
        } else if !self.reconciler.is_available() {
            Some(ToggleIgnoredReason::Unavailable)
        } else {
            None
        }
    }

    fn finish_drag(&mut self, phase: ToggleLifecyclePhase, now: Instant) -> ToggleDispatch {
        let Some(session) = self.session.take() else {
            return ToggleDispatch::ignored(phase, ToggleIgnoredReason::NoActiveDrag);
        };
        let kind = session.pointer_kind();
        let release = session.end(now);
        tracing::trace!(
            target: TARGET_GESTURE,
            offset = release.offset,
            moves = release.moves,
            duration_us = u64::try_from(release.duration.as_micros()).unwrap_or(u64::MAX),
            "drag released"
        );
        self.swallow_click = release.moves > 0;

        let dispatch = match (release.resolved, self.effective_state()) {
            (None, _) => ToggleDispatch::new(phase, ToggleLogOutcome::StaleRelease),
            (Some(resolved), Ok(current)) if resolved != current => self.commit(phase, resolved),
            (Some(_), _) => ToggleDispatch::new(phase, ToggleLogOutcome::NoChange),
        };
        dispatch
            .with_pointer(kind)
            .with_offset(release.offset)
            .with_listeners(ListenerCommand::Detach)
    }

    fn commit(&mut self, phase: ToggleLifecyclePhase, target: BinaryState) -> ToggleDispatch {
        self.reconciler.set_optimistic(target);
        let call = self.binding.command_for(&self.config.entity, target);
        tracing::info!(
            target: TARGET_GESTURE,
            message = "toggle.commit",
            entity = %self.config.entity,
            side = target.as_str(),
            service = %call.qualified_name()
        );
        ToggleDispatch::new(phase, ToggleLogOutcome::Committed).with_commit(target, call)
    }

    fn dispatch(
        &mut self,
        phase: ToggleLifecyclePhase,
        f: impl FnOnce(&mut Self) -> ToggleDispatch,
    ) -> ToggleDispatch {
        let span = tracing::debug_span!(
            "toggle.dispatch",
            entity = %self.config.entity,
            phase = ?phase,
            sequence = self.next_sequence
        );
        let _enter = span.enter();

        if phase != ToggleLifecyclePhase::Click {
            self.swallow_click = false;
        }
        let mut dispatch = f(self);
        dispatch.log.sequence = self.next_sequence;
        self.next_sequence += 1;

        match dispatch.log.outcome {
            ToggleLogOutcome::Ignored(reason) => tracing::trace!(
                target: TARGET_GESTURE,
                ?reason,
                recovery = %reason
                    .as_error()
                    .map_or(Recovery::NoOp, |err| err.recovery()),
                "input ignored"
            ),
            outcome => tracing::debug!(
                target: TARGET_GESTURE,
                ?outcome,
                offset = dispatch.log.offset,
                listeners = ?dispatch.listener_command,
                "input dispatched"
            ),
        }
        dispatch
    }
}
