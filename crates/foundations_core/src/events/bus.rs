//! # Event Bus
//!
//! Type-indexed multicast dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  publish(E)  ┌────────────────────────────────┐
//! │   Producer   │─────────────>│ TypeId(E) → [L1, L2, L3, ...]  │
//! └──────────────┘              └───────┬────────┬────────┬──────┘
//!                                       ▼        ▼        ▼
//!                                      L1       L2       L3   (registration order)
//! ```
//!
//! The registry lock is released before any callback runs, so callbacks
//! may publish, subscribe or unsubscribe without deadlocking.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::subscription::Subscription;

/// Marker for values that can travel over the [`EventBus`].
///
/// Implemented for every `Send + Sync + 'static` type, so any plain struct
/// can be published without ceremony.
pub trait GameEvent: Any + Send + Sync {}

impl<T: Any + Send + Sync> GameEvent for T {}

/// Caller-supplied identity token for a listener registration.
///
/// Registration is de-duplicated by handle, not by callback content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    /// Mints a handle that is unique for the lifetime of the process.
    #[must_use]
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw handle value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ListenerHandle {
    fn default() -> Self {
        Self::new()
    }
}

type ErasedCallback = Arc<dyn Fn(&dyn Any) + Send + Sync>;

#[derive(Clone)]
struct Registration {
    handle: ListenerHandle,
    callback: ErasedCallback,
}

#[derive(Default)]
struct Registry {
    /// Dispatch chains, in registration order. Rebuilt on every change so
    /// `publish` only clones the `Arc`.
    chains: HashMap<TypeId, Arc<[Registration]>>,
    /// Active (event type, handle) pairs.
    active: HashSet<(TypeId, ListenerHandle)>,
}

/// Process-wide, type-keyed publish/subscribe dispatcher.
///
/// `EventBus` is a cheap handle: clones share the same listener tables.
/// Dispatch is synchronous; [`publish`](Self::publish) returns only after
/// every matching listener has run.
///
/// # Example
///
/// ```rust
/// use foundations_core::{EventBus, ListenerHandle};
///
/// struct Explosion { radius: f32 }
///
/// let bus = EventBus::new();
/// let handle = ListenerHandle::new();
/// bus.subscribe(handle, |e: &Explosion| assert!(e.radius > 0.0));
/// bus.publish(Explosion { radius: 2.5 });
/// bus.unsubscribe::<Explosion>(handle);
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
}

impl EventBus {
    /// Creates an empty, independent bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide bus, creating it on first access.
    ///
    /// The global bus lives for the remainder of the process.
    #[must_use]
    pub fn global() -> &'static EventBus {
        static GLOBAL: OnceLock<EventBus> = OnceLock::new();
        GLOBAL.get_or_init(EventBus::new)
    }

    /// Registers `callback` for every subsequently published `E`.
    ///
    /// Subscribing a handle that is already registered for `E` is a no-op
    /// and the new callback is discarded.
    ///
    /// # Returns
    ///
    /// `true` if a new registration was created.
    pub fn subscribe<E, F>(&self, handle: ListenerHandle, callback: F) -> bool
    where
        E: GameEvent,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();
        let mut registry = self.registry.write();

        if !registry.active.insert((type_id, handle)) {
            return false;
        }

        let callback: ErasedCallback = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                callback(event);
            }
        });
        let mut chain: Vec<Registration> = registry
            .chains
            .get(&type_id)
            .map(|chain| chain.to_vec())
            .unwrap_or_default();
        chain.push(Registration { handle, callback });
        registry.chains.insert(type_id, chain.into());

        tracing::debug!(event = type_name::<E>(), handle = handle.raw(), "listener subscribed");
        true
    }

    /// Subscribes under a freshly minted handle and returns a guard that
    /// unsubscribes when dropped.
    pub fn subscribe_scoped<E, F>(&self, callback: F) -> Subscription
    where
        E: GameEvent,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let handle = ListenerHandle::new();
        self.subscribe(handle, callback);
        Subscription::new(self.clone(), TypeId::of::<E>(), handle)
    }

    /// Removes the registration of `handle` for `E`, if present.
    ///
    /// # Returns
    ///
    /// `true` if a registration was removed.
    pub fn unsubscribe<E: GameEvent>(&self, handle: ListenerHandle) -> bool {
        let removed = self.unsubscribe_erased(TypeId::of::<E>(), handle);
        if removed {
            tracing::debug!(event = type_name::<E>(), handle = handle.raw(), "listener unsubscribed");
        }
        removed
    }

    pub(crate) fn unsubscribe_erased(&self, type_id: TypeId, handle: ListenerHandle) -> bool {
        let mut registry = self.registry.write();

        if !registry.active.remove(&(type_id, handle)) {
            return false;
        }

        let retired = registry.chains.remove(&type_id);
        if let Some(chain) = &retired {
            let kept: Vec<Registration> = chain
                .iter()
                .filter(|registration| registration.handle != handle)
                .cloned()
                .collect();
            if !kept.is_empty() {
                registry.chains.insert(type_id, kept.into());
            }
        }

        // The removed callback may own guards that unsubscribe on drop.
        drop(registry);
        drop(retired);
        true
    }

    /// Invokes every listener registered for `E`, in registration order.
    ///
    /// Publishing a type nobody listens to does nothing. Listeners added or
    /// removed by a callback take effect from the next publish.
    pub fn publish<E: GameEvent>(&self, event: E) {
        let chain = {
            let registry = self.registry.read();
            match registry.chains.get(&TypeId::of::<E>()) {
                Some(chain) => Arc::clone(chain),
                None => return,
            }
        };

        tracing::trace!(event = type_name::<E>(), listeners = chain.len(), "dispatching");

        for registration in chain.iter() {
            (registration.callback)(&event as &dyn Any);
        }
    }

    /// Returns the number of listeners registered for `E`.
    #[must_use]
    pub fn listener_count<E: GameEvent>(&self) -> usize {
        self.registry
            .read()
            .chains
            .get(&TypeId::of::<E>())
            .map_or(0, |chain| chain.len())
    }

    /// Returns `true` if `handle` is registered for `E`.
    #[must_use]
    pub fn is_subscribed<E: GameEvent>(&self, handle: ListenerHandle) -> bool {
        self.registry
            .read()
            .active
            .contains(&(TypeId::of::<E>(), handle))
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("EventBus")
            .field("event_types", &registry.chains.len())
            .field("listeners", &registry.active.len())
            .finish()
    }
}
