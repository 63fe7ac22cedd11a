//! # Foundations
//!
//! Host-side composition of the core primitives.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TickDriver                            │
//! │  start ─► step ─► step ─► ... ─► shutdown                    │
//! │             │                                                │
//! │   ┌─────────┴─────────┬───────────────────────┐              │
//! │   ▼                   ▼                       ▼              │
//! │ PlaybackQueue<2D>   PlaybackQueue<3D>    host components     │
//! │   ▲                   ▲                       │              │
//! │   └──── EventBus ◄────┴──────── publish ──────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML startup configuration
//! - `lifecycle`: component contract and shared context
//! - `logging`: `tracing` subscriber bootstrap
//! - `playback`: bounded audio request queues
//! - `tick`: discrete-step driver

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod playback;
pub mod tick;

pub use foundations_core as core;

pub use config::{ConfigError, ConfigResult, FoundationsConfig};
pub use lifecycle::{FoundationContext, Lifecycle};
pub use playback::{AudioEvent2D, AudioEvent3D, AudioSink, ClipId, PlaybackQueue, Playable};
pub use tick::{TickDriver, TickStats, TickStatsAccumulator};
