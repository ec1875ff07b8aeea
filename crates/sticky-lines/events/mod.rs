//! Change notification for sticky-lines registries
//!
//! Provides the `StickyLinesListener` trait implemented by consumers that must
//! re-render when a registry changes, and `ListenerList`, the ordered list a
//! registry keeps them in. Notification is synchronous and happens only when
//! the owner of a registry asks for it after a batch of changes.

use core::cell::Cell;
use core::fmt;
use std::rc::Rc;
use tracing::trace;

/// Consumer of registry change notifications
pub trait StickyLinesListener {
    /// Called after the registered sticky lines changed
    fn model_changed(&self);
}

impl<F: Fn()> StickyLinesListener for F {
    fn model_changed(&self) {
        self();
    }
}

/// Listener handle as stored by registries
///
/// Registration and removal work on the `Rc` itself, so the same allocation
/// identifies a listener.
pub type SharedListener = Rc<dyn StickyLinesListener>;

/// Statistics about listener notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Number of `notify` calls
    pub notifications_sent: usize,
    /// Total number of listener invocations across all notifications
    pub listener_calls: usize,
    /// Number of listener registrations currently held
    pub listeners_count: usize,
}

/// Ordered list of listeners
///
/// No uniqueness is enforced: a listener added twice is called twice.
#[derive(Default)]
pub struct ListenerList {
    /// Registered listeners in registration order
    listeners: Vec<SharedListener>,
    notifications_sent: Cell<usize>,
    listener_calls: Cell<usize>,
}

impl fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("listeners", &self.listeners.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl ListenerList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener
    pub fn add(&mut self, listener: SharedListener) {
        self.listeners.push(listener);
    }

    /// Remove the first registration of `listener`
    ///
    /// Returns whether a registration was found.
    pub fn remove(&mut self, listener: &SharedListener) -> bool {
        if let Some(index) = self
            .listeners
            .iter()
            .position(|registered| same_listener(registered, listener))
        {
            self.listeners.remove(index);
            true
        } else {
            false
        }
    }

    /// Number of registrations
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Call every listener once per registration, in registration order
    pub fn notify(&self) {
        self.notifications_sent.set(self.notifications_sent.get() + 1);
        for listener in &self.listeners {
            listener.model_changed();
        }
        self.listener_calls
            .set(self.listener_calls.get() + self.listeners.len());

        trace!(listeners = self.listeners.len(), "sticky lines listeners notified");
    }

    /// Get notification statistics
    #[must_use]
    pub fn stats(&self) -> ListenerStats {
        ListenerStats {
            notifications_sent: self.notifications_sent.get(),
            listener_calls: self.listener_calls.get(),
            listeners_count: self.listeners.len(),
        }
    }
}

/// Identity comparison on the data pointer, ignoring vtables
fn same_listener(a: &SharedListener, b: &SharedListener) -> bool {
    core::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}
