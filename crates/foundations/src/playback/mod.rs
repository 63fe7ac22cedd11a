//! # Playback Queues
//!
//! Bounded consumers of audio request events. Each queue listens on the bus
//! while active, keeps at most `max_pending` distinct clips, and plays one
//! per tick:
//! ```text
//! publish(AudioEvent2D) ──► [dedup] ──► RingBuffer ──tick()──► AudioSink
//! ```

mod events;
mod queue;
mod sink;

pub use events::{AudioEvent2D, AudioEvent3D, ClipId, Playable};
pub use queue::PlaybackQueue;
pub use sink::{AudioSink, LoggingSink};
