#![forbid(unsafe_code)]

//! Drag-to-toggle widget logic.
//!
//! - [`DragToggle`]: the headless controller. Feed it refreshes and pointer
//!   input, apply the [`ToggleDispatch`] it returns.
//! - [`Reconciler`]: optimistic side bookkeeping.
//! - [`ListenerRegistry`]: the window listeners a drag holds.
//! - [`ToggleView`]: what to draw.

pub mod drag;
pub mod listeners;
pub mod reconcile;
pub mod toggle;
pub mod view;

pub use drag::{DragRelease, DragSession};
pub use listeners::{ListenerGuard, ListenerRegistry, OwnerId, WindowListener};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use toggle::{
    DragToggle, GesturePhase, ListenerCommand, ToggleDispatch, ToggleIgnoredReason,
    ToggleLifecyclePhase, ToggleLogEntry, ToggleLogOutcome,
};
pub use view::{SideIcons, ToggleView};
