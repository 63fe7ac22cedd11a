//! Audio request events.

use std::fmt;

use foundations_core::GameEvent;

use super::sink::AudioSink;

/// Identifier of an audio clip. Pending requests are deduplicated by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(String);

impl ClipId {
    /// Creates a clip identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the clip name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClipId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// An event a [`PlaybackQueue`](super::PlaybackQueue) can buffer and play.
pub trait Playable: GameEvent + Clone {
    /// Clip this request plays.
    fn clip(&self) -> &ClipId;

    /// Hands the request to the sink.
    fn play(&self, sink: &mut dyn AudioSink);
}

/// Request to play a non-positional clip.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioEvent2D {
    /// Clip to play.
    pub clip: ClipId,
}

impl AudioEvent2D {
    /// Creates a request for `clip`.
    #[must_use]
    pub fn new(clip: impl Into<ClipId>) -> Self {
        Self { clip: clip.into() }
    }
}

impl Playable for AudioEvent2D {
    fn clip(&self) -> &ClipId {
        &self.clip
    }

    fn play(&self, sink: &mut dyn AudioSink) {
        sink.play_2d(&self.clip);
    }
}

/// Request to play a clip at a world position.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioEvent3D {
    /// Clip to play.
    pub clip: ClipId,
    /// World position of the emitter.
    pub position: [f32; 3],
}

impl AudioEvent3D {
    /// Creates a request for `clip` at `position`.
    #[must_use]
    pub fn new(clip: impl Into<ClipId>, position: [f32; 3]) -> Self {
        Self {
            clip: clip.into(),
            position,
        }
    }
}

impl Playable for AudioEvent3D {
    fn clip(&self) -> &ClipId {
        &self.clip
    }

    fn play(&self, sink: &mut dyn AudioSink) {
        sink.play_3d(&self.clip, self.position);
    }
}
