//! # Scoped Subscriptions
//!
//! RAII pairing of subscribe with unsubscribe.

use std::any::TypeId;
use std::fmt;

use super::bus::{EventBus, ListenerHandle};

/// Guard for a listener registration.
///
/// Dropping the guard unsubscribes, on every exit path of the owning scope
/// including unwinding. A deactivated consumer therefore never receives
/// events after its guard is gone.
///
/// # Example
///
/// ```rust
/// use foundations_core::EventBus;
///
/// struct Tick;
///
/// let bus = EventBus::new();
/// {
///     let _guard = bus.subscribe_scoped(|_: &Tick| {});
///     assert_eq!(bus.listener_count::<Tick>(), 1);
/// }
/// assert_eq!(bus.listener_count::<Tick>(), 0);
/// ```
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    bus: EventBus,
    type_id: TypeId,
    handle: ListenerHandle,
}

impl Subscription {
    pub(crate) fn new(bus: EventBus, type_id: TypeId, handle: ListenerHandle) -> Self {
        Self { bus, type_id, handle }
    }

    /// Returns the handle this guard registered under.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> ListenerHandle {
        self.handle
    }

    /// Unsubscribes now rather than at end of scope.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.bus.unsubscribe_erased(self.type_id, self.handle) {
            tracing::debug!(handle = self.handle.raw(), "scoped listener released");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Chime;

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&hits);
        let guard = bus.subscribe_scoped(move |_: &Chime| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        bus.publish(Chime);
        assert!(bus.is_subscribed::<Chime>(guard.handle()));

        drop(guard);
        bus.publish(Chime);

        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert_eq!(bus.listener_count::<Chime>(), 0);
    }

    #[test]
    fn test_cancel_releases() {
        let bus = EventBus::new();
        let guard = bus.subscribe_scoped(|_: &Chime| {});
        let handle = guard.handle();

        guard.cancel();
        assert!(!bus.is_subscribed::<Chime>(handle));
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let bus = EventBus::new();
        let inner = bus.clone();

        let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
            let _guard = inner.subscribe_scoped(|_: &Chime| {});
            panic!("consumer crashed");
        }));

        assert!(result.is_err());
        assert_eq!(bus.listener_count::<Chime>(), 0);
    }
}
