//! # Tick Driver
//!
//! Discrete-step orchestration for lifecycle components:
//! ```text
//! start()     activate every component, in registration order
//!   │
//!   ├─ step() ─┬─ tick component 0
//!   │          ├─ tick component 1
//!   │          └─ ... record TickStats, warn when over budget
//!   │
//! shutdown()  deactivate every component, in reverse order
//! ```

use std::time::{Duration, Instant};

use crate::config::TickConfig;
use crate::lifecycle::{FoundationContext, Lifecycle};

/// Timing for a single step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// Wall time spent ticking components, in microseconds.
    pub elapsed_us: u64,
    /// Components ticked.
    pub components: usize,
}

/// Running totals over every recorded step.
#[derive(Clone, Debug)]
pub struct TickStatsAccumulator {
    /// Steps recorded.
    pub ticks_recorded: u64,
    /// Sum of step times.
    pub total_us_sum: u64,
    /// Fastest step.
    pub min_tick_us: u64,
    /// Slowest step.
    pub max_tick_us: u64,
    /// Steps that exceeded the budget.
    pub ticks_over_budget: u64,
}

impl TickStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticks_recorded: 0,
            total_us_sum: 0,
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            ticks_over_budget: 0,
        }
    }

    /// Records one step.
    pub fn record(&mut self, stats: TickStats, over_budget: bool) {
        self.ticks_recorded += 1;
        self.total_us_sum += stats.elapsed_us;
        self.min_tick_us = self.min_tick_us.min(stats.elapsed_us);
        self.max_tick_us = self.max_tick_us.max(stats.elapsed_us);
        if over_budget {
            self.ticks_over_budget += 1;
        }
    }

    /// Returns the mean step time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_tick_ms(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.ticks_recorded as f64) / 1000.0
    }
}

impl Default for TickStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives registered components one step at a time.
///
/// Dropping an active driver shuts it down, so components are always
/// deactivated.
pub struct TickDriver {
    ctx: FoundationContext,
    config: TickConfig,
    components: Vec<Box<dyn Lifecycle>>,
    active: bool,
    tick: u64,
    stats: TickStatsAccumulator,
}

impl TickDriver {
    /// Creates an idle driver.
    #[must_use]
    pub fn new(ctx: FoundationContext, config: TickConfig) -> Self {
        Self {
            ctx,
            config,
            components: Vec::new(),
            active: false,
            tick: 0,
            stats: TickStatsAccumulator::new(),
        }
    }

    /// Adds a component. If the driver is already running the component is
    /// activated immediately.
    pub fn register(&mut self, mut component: Box<dyn Lifecycle>) {
        if self.active {
            component.activate(&self.ctx);
        }
        tracing::debug!(component = component.name(), "component registered");
        self.components.push(component);
    }

    /// Activates every component.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        for component in &mut self.components {
            component.activate(&self.ctx);
        }
        self.active = true;
        tracing::debug!(components = self.components.len(), "tick driver started");
    }

    /// Ticks every component once.
    ///
    /// Does nothing and returns `None` if the driver is not started.
    pub fn step(&mut self) -> Option<TickStats> {
        if !self.active {
            return None;
        }

        let started = Instant::now();
        for component in &mut self.components {
            component.tick(&self.ctx);
        }
        let elapsed = started.elapsed();

        let stats = TickStats {
            tick: self.tick,
            elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            components: self.components.len(),
        };
        let over_budget = elapsed > self.budget();
        if over_budget {
            tracing::warn!(
                tick = self.tick,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.config.budget_ms,
                "tick exceeded budget"
            );
        }

        self.stats.record(stats, over_budget);
        self.tick += 1;
        Some(stats)
    }

    /// Runs `ticks` steps, sleeping between them when pacing is enabled.
    pub fn run_for(&mut self, ticks: u64) {
        let period = self.period();
        for _ in 0..ticks {
            let started = Instant::now();
            if self.step().is_none() {
                return;
            }
            if self.config.paced {
                if let Some(remaining) = period.checked_sub(started.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }
    }

    /// Deactivates every component, newest first.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        for component in self.components.iter_mut().rev() {
            component.deactivate();
        }
        self.active = false;
        tracing::debug!(ticks = self.tick, "tick driver shut down");
    }

    /// Returns the number of completed steps.
    #[inline]
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Returns `true` between `start` and `shutdown`.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the shared context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &FoundationContext {
        &self.ctx
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &TickStatsAccumulator {
        &self.stats
    }

    fn period(&self) -> Duration {
        Duration::from_secs(1) / self.config.target_hz.max(1)
    }

    fn budget(&self) -> Duration {
        Duration::from_millis(self.config.budget_ms)
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
