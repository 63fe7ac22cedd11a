//! # Events
//!
//! Synchronous, type-keyed publish/subscribe.
//!
//! ## Design Philosophy
//!
//! - One dispatch chain per event type, so unrelated event kinds never
//!   share a conditional.
//! - Registration is keyed by handle identity and is idempotent.
//! - No queuing inside the bus. Consumers that need deferred processing
//!   buffer payloads themselves.

mod bus;
mod subscription;

pub use bus::{EventBus, GameEvent, ListenerHandle};
pub use subscription::Subscription;
