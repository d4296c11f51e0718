#![forbid(unsafe_code)]

//! Window-level listener bookkeeping.
//!
//! While a drag is in progress the toggle needs move and release events even
//! when the pointer leaves the thumb, so the host attaches four listeners to
//! the whole window. [`ListenerRegistry`] is the model of that window: a
//! shared, clonable handle that counts what is currently attached.
//!
//! [`ListenerRegistry::acquire`] attaches the full set and returns a
//! [`ListenerGuard`]. Dropping or releasing the guard detaches the set.
//!
//! # Invariants
//!
//! 1. A guard attaches exactly [`WindowListener::ALL`] and detaches exactly
//!    what it attached, once.
//! 2. A guard outliving its registry detaches nothing and does not panic.
//! 3. `acquired_total() - released_total()` equals the number of live guards.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use dtoggle_core::logging::TARGET_LISTENERS;

/// One of the window listeners a drag needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowListener {
    MouseMove,
    TouchMove,
    MouseUp,
    TouchEnd,
}

impl WindowListener {
    /// The full set attached for one drag.
    pub const ALL: [Self; 4] = [Self::MouseMove, Self::TouchMove, Self::MouseUp, Self::TouchEnd];

    /// DOM event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::MouseMove => "mousemove",
            Self::TouchMove => "touchmove",
            Self::MouseUp => "mouseup",
            Self::TouchEnd => "touchend",
        }
    }
}

/// Identifies the component that owns a set of listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    attached: Vec<(OwnerId, WindowListener)>,
    next_owner: u64,
    acquired_total: u64,
    released_total: u64,
}

/// Shared model of the listeners attached to the window.
///
/// Cloning creates a new handle to the **same** registry.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ListenerRegistry")
            .field("attached", &inner.attached.len())
            .field("acquired_total", &inner.acquired_total)
            .field("released_total", &inner.released_total)
            .finish()
    }
}

impl ListenerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh owner id.
    pub fn register_owner(&self) -> OwnerId {
        let mut inner = self.inner.borrow_mut();
        let id = OwnerId(inner.next_owner);
        inner.next_owner += 1;
        id
    }

    /// Attach the full listener set for `owner`.
    pub fn acquire(&self, owner: OwnerId) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        debug_assert!(
            inner.attached.iter().all(|(o, _)| *o != owner),
            "owner {owner:?} already holds listeners"
        );
        inner
            .attached
            .extend(WindowListener::ALL.iter().map(|l| (owner, *l)));
        inner.acquired_total += 1;
        tracing::trace!(
            target: TARGET_LISTENERS,
            owner = owner.get(),
            live = inner.attached.len(),
            "window listeners attached"
        );
        ListenerGuard {
            registry: Rc::downgrade(&self.inner),
            owner,
            released: false,
        }
    }

    /// Number of listeners currently attached, across all owners.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.borrow().attached.len()
    }

    /// Number of listeners currently attached by `owner`.
    #[must_use]
    pub fn count_for(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .attached
            .iter()
            .filter(|(o, _)| *o == owner)
            .count()
    }

    /// Whether `listener` is attached for `owner`.
    #[must_use]
    pub fn is_attached(&self, owner: OwnerId, listener: WindowListener) -> bool {
        self.inner.borrow().attached.contains(&(owner, listener))
    }

    /// Total guards ever handed out.
    #[must_use]
    pub fn acquired_total(&self) -> u64 {
        self.inner.borrow().acquired_total
    }

    /// Total guards released (explicitly or by drop).
    #[must_use]
    pub fn released_total(&self) -> u64 {
        self.inner.borrow().released_total
    }
}

/// RAII handle for one attached listener set.
///
/// The set is detached by [`ListenerGuard::release`] or, failing that, on drop.
pub struct ListenerGuard {
    registry: Weak<RefCell<RegistryInner>>,
    owner: OwnerId,
    released: bool,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("owner", &self.owner)
            .field("released", &self.released)
            .finish()
    }
}

impl ListenerGuard {
    /// Owner the set belongs to.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Detach the set now. Returns how many listeners were removed.
    pub fn release(mut self) -> usize {
        self.detach()
    }

    fn detach(&mut self) -> usize {
        if self.released {
            return 0;
        }
        self.released = true;
        let Some(inner) = self.registry.upgrade() else {
            return 0;
        };
        let mut inner = inner.borrow_mut();
        let before = inner.attached.len();
        let owner = self.owner;
        inner.attached.retain(|(o, _)| *o != owner);
        inner.released_total += 1;
        let removed = before - inner.attached.len();
        tracing::trace!(
            target: TARGET_LISTENERS,
            owner = owner.get(),
            removed,
            live = inner.attached.len(),
            "window listeners detached"
        );
        removed
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_attaches_full_set() {
        let registry = ListenerRegistry::new();
        let owner = registry.register_owner();
        let guard = registry.acquire(owner);
        assert_eq!(registry.live_count(), 4);
        for listener in WindowListener::ALL {
            assert!(registry.is_attached(owner, listener), "{listener:?}");
        }
        assert_eq!(guard.release(), 4);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn drop_detaches() {
        let registry = ListenerRegistry::new();
        let owner = registry.register_owner();
        {
            let _guard = registry.acquire(owner);
            assert_eq!(registry.count_for(owner), 4);
        }
        assert_eq!(registry.count_for(owner), 0);
        assert_eq!(registry.acquired_total(), 1);
        assert_eq!(registry.released_total(), 1);
    }

    #[test]
    fn owners_are_isolated() {
        let registry = ListenerRegistry::new();
        let a = registry.register_owner();
        let b = registry.register_owner();
        assert_ne!(a, b);
        let guard_a = registry.acquire(a);
        let _guard_b = registry.acquire(b);
        assert_eq!(registry.live_count(), 8);
        guard_a.release();
        assert_eq!(registry.count_for(a), 0);
        assert_eq!(registry.count_for(b), 4);
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let registry = ListenerRegistry::new();
        let owner = registry.register_owner();
        let guard = registry.acquire(owner);
        drop(registry);
        assert_eq!(guard.release(), 0);
    }

    #[test]
    fn clones_share_state() {
        let registry = ListenerRegistry::new();
        let view = registry.clone();
        let owner = registry.register_owner();
        let _guard = registry.acquire(owner);
        assert_eq!(view.live_count(), 4);
    }

    #[test]
    fn event_names_are_dom_names() {
        let names: Vec<_> = WindowListener::ALL.iter().map(|l| l.event_name()).collect();
        assert_eq!(names, ["mousemove", "touchmove", "mouseup", "touchend"]);
    }
}
