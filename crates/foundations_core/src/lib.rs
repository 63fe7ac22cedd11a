//! # Foundations Core
//!
//! Reusable infrastructure primitives for a tick-driven interactive
//! application:
//! - [`RingBuffer`]: fixed-capacity circular container with random access
//! - [`EventBus`]: type-keyed, synchronous publish/subscribe
//! - [`ResourcePool`]: prefab-backed instance pool
//!
//! ## Architecture Rules
//!
//! 1. **Single logical thread** - Everything advances in discrete ticks
//! 2. **Bounded memory** - Capacities are fixed at construction
//! 3. **Typed outcomes** - Every failure is returned, nothing is swallowed
//!
//! ## Example
//!
//! ```rust,ignore
//! use foundations_core::{EventBus, RingBuffer};
//!
//! let pending = Arc::new(Mutex::new(RingBuffer::new(30)?));
//! let sink = Arc::clone(&pending);
//! let _guard = EventBus::global().subscribe_scoped(move |e: &AudioEvent2D| {
//!     sink.lock().push(e.clone());
//! });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collections;
pub mod error;
pub mod events;
pub mod memory;

pub use collections::RingBuffer;
pub use error::{FoundationError, FoundationResult, Rejected};
pub use events::{EventBus, GameEvent, ListenerHandle, Subscription};
pub use memory::{
    AcquireMode, InstanceFactory, PoolDescriptor, Poolable, ResourcePool, DEFAULT_PREALLOCATE,
};
