//! Output side of the playback queues.

use super::events::ClipId;

/// Host audio backend.
pub trait AudioSink {
    /// Plays a non-positional clip.
    fn play_2d(&mut self, clip: &ClipId);

    /// Plays a clip at a world position.
    fn play_3d(&mut self, clip: &ClipId, position: [f32; 3]);
}

/// Sink that only logs what it would play. Used by the headless demo.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSink;

impl AudioSink for LoggingSink {
    fn play_2d(&mut self, clip: &ClipId) {
        tracing::info!(%clip, "play 2d");
    }

    fn play_3d(&mut self, clip: &ClipId, position: [f32; 3]) {
        tracing::info!(%clip, ?position, "play 3d");
    }
}
