//! # Component Lifecycle
//!
//! The contract between the tick driver and the components it drives.

use foundations_core::EventBus;

/// Shared state handed to every component.
///
/// Components receive the bus through the context instead of reaching for a
/// global, so tests can run each scene against its own bus.
#[derive(Clone, Debug, Default)]
pub struct FoundationContext {
    events: EventBus,
}

impl FoundationContext {
    /// Creates a context around a fresh, private bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context around the process-wide bus.
    #[must_use]
    pub fn global() -> Self {
        Self::with_bus(EventBus::global().clone())
    }

    /// Creates a context around an existing bus.
    #[must_use]
    pub fn with_bus(events: EventBus) -> Self {
        Self { events }
    }

    /// Returns the event bus.
    #[inline]
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

/// A component driven once per tick.
///
/// `activate` and `deactivate` are always paired by the driver: every
/// subscription made in `activate` must be released by `deactivate`.
pub trait Lifecycle {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The component is entering the scene.
    fn activate(&mut self, ctx: &FoundationContext);

    /// Advances one discrete step.
    fn tick(&mut self, ctx: &FoundationContext);

    /// The component is leaving the scene.
    fn deactivate(&mut self);
}
