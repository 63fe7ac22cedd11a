//! Bounded, deduplicating playback queue.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use foundations_core::{EventBus, FoundationResult, RingBuffer, Subscription};
use parking_lot::Mutex;

use super::events::Playable;
use super::sink::AudioSink;
use crate::lifecycle::{FoundationContext, Lifecycle};

/// Buffers `E` requests from the bus and plays at most one per tick.
///
/// While attached, every published `E` whose clip is not already pending is
/// appended. When `max_pending` requests are queued the oldest is
/// overwritten.
///
/// # Example
///
/// ```
/// use foundations::core::EventBus;
/// use foundations::playback::{AudioEvent2D, LoggingSink, PlaybackQueue};
///
/// let bus = EventBus::new();
/// let mut queue = PlaybackQueue::<AudioEvent2D, _>::new(4, LoggingSink).unwrap();
/// queue.attach(&bus);
///
/// bus.publish(AudioEvent2D::new("click"));
/// bus.publish(AudioEvent2D::new("click"));
/// assert_eq!(queue.pending_len(), 1);
///
/// assert!(queue.play_next());
/// assert!(!queue.play_next());
/// ```
pub struct PlaybackQueue<E, S> {
    pending: Arc<Mutex<RingBuffer<E>>>,
    subscription: Option<Subscription>,
    sink: S,
}

impl<E, S> PlaybackQueue<E, S>
where
    E: Playable,
    S: AudioSink,
{
    /// Creates a detached queue holding at most `max_pending` requests.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](foundations_core::FoundationError::InvalidConfig)
    /// if `max_pending` is zero.
    pub fn new(max_pending: usize, sink: S) -> FoundationResult<Self> {
        Ok(Self {
            pending: Arc::new(Mutex::new(RingBuffer::new(max_pending)?)),
            subscription: None,
            sink,
        })
    }

    /// Discards anything pending and starts listening on `bus`.
    ///
    /// Attaching an attached queue moves it to `bus`.
    pub fn attach(&mut self, bus: &EventBus) {
        self.subscription = None;
        self.pending.lock().clear();

        let pending = Arc::clone(&self.pending);
        self.subscription = Some(bus.subscribe_scoped(move |event: &E| {
            let mut pending = pending.lock();
            if pending.iter().any(|queued| queued.clip() == event.clip()) {
                tracing::trace!(clip = %event.clip(), "duplicate request ignored");
                return;
            }
            if let Some(evicted) = pending.push(event.clone()) {
                tracing::trace!(clip = %evicted.clip(), "pending request overwritten");
            }
        }));
        tracing::debug!(event = type_name::<E>(), "playback queue attached");
    }

    /// Stops listening. Pending requests are kept until the next attach.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!(event = type_name::<E>(), "playback queue detached");
        }
    }

    /// Plays the oldest pending request.
    ///
    /// # Returns
    ///
    /// `false` if the queue is detached or nothing is pending.
    pub fn play_next(&mut self) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        // released before playing so the sink may publish
        let next = self.pending.lock().pop();
        match next {
            Ok(event) => {
                tracing::debug!(clip = %event.clip(), "playing");
                event.play(&mut self.sink);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns the maximum number of pending requests.
    #[must_use]
    pub fn max_pending(&self) -> usize {
        self.pending.lock().capacity()
    }

    /// Returns `true` while listening on a bus.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns the sink.
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<E, S> Lifecycle for PlaybackQueue<E, S>
where
    E: Playable,
    S: AudioSink,
{
    fn activate(&mut self, ctx: &FoundationContext) {
        self.attach(ctx.events());
    }

    fn tick(&mut self, _ctx: &FoundationContext) {
        self.play_next();
    }

    fn deactivate(&mut self) {
        self.detach();
    }
}

impl<E, S> fmt::Debug for PlaybackQueue<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.pending.lock();
        f.debug_struct("PlaybackQueue")
            .field("event", &type_name::<E>())
            .field("pending", &pending.len())
            .field("max_pending", &pending.capacity())
            .field("attached", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{AudioEvent2D, AudioEvent3D, ClipId};

    #[derive(Default)]
    struct Recorder {
        played: Vec<String>,
    }

    impl AudioSink for Recorder {
        fn play_2d(&mut self, clip: &ClipId) {
            self.played.push(clip.to_string());
        }

        fn play_3d(&mut self, clip: &ClipId, position: [f32; 3]) {
            self.played.push(format!("{clip}@{position:?}"));
        }
    }

    fn attached_2d(bus: &EventBus, max_pending: usize) -> PlaybackQueue<AudioEvent2D, Recorder> {
        let mut queue = PlaybackQueue::new(max_pending, Recorder::default()).unwrap();
        queue.attach(bus);
        queue
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = PlaybackQueue::<AudioEvent2D, _>::new(0, Recorder::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicates_ignored() {
        let bus = EventBus::new();
        let queue = attached_2d(&bus, 8);

        for clip in ["hit", "hit", "jump", "hit"] {
            bus.publish(AudioEvent2D::new(clip));
        }

        assert_eq!(queue.pending_len(), 2);
    }

    #[test]
    fn test_one_per_tick_in_order() {
        let bus = EventBus::new();
        let mut queue = attached_2d(&bus, 8);

        for clip in ["a", "b", "c"] {
            bus.publish(AudioEvent2D::new(clip));
        }

        assert!(queue.play_next());
        assert_eq!(queue.sink().played, vec!["a"]);
        assert!(queue.play_next());
        assert!(queue.play_next());
        assert!(!queue.play_next());
        assert_eq!(queue.sink().played, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_overflow_overwrites_oldest() {
        let bus = EventBus::new();
        let mut queue = attached_2d(&bus, 2);

        for clip in ["a", "b", "c"] {
            bus.publish(AudioEvent2D::new(clip));
        }
        while queue.play_next() {}

        assert_eq!(queue.sink().played, vec!["b", "c"]);
    }

    #[test]
    fn test_replayed_clip_accepted_after_drain() {
        let bus = EventBus::new();
        let mut queue = attached_2d(&bus, 4);

        bus.publish(AudioEvent2D::new("a"));
        queue.play_next();
        bus.publish(AudioEvent2D::new("a"));

        assert_eq!(queue.pending_len(), 1);
    }

    #[test]
    fn test_detach_stops_delivery_and_attach_resets() {
        let bus = EventBus::new();
        let mut queue = attached_2d(&bus, 4);

        bus.publish(AudioEvent2D::new("kept"));
        queue.detach();
        bus.publish(AudioEvent2D::new("missed"));

        assert_eq!(queue.pending_len(), 1);
        assert!(!queue.play_next());
        assert_eq!(bus.listener_count::<AudioEvent2D>(), 0);

        queue.attach(&bus);
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn test_3d_queue_ignores_2d_events() {
        let bus = EventBus::new();
        let mut queue = PlaybackQueue::<AudioEvent3D, _>::new(4, Recorder::default()).unwrap();
        queue.attach(&bus);

        bus.publish(AudioEvent2D::new("flat"));
        bus.publish(AudioEvent3D::new("boom", [1.0, 2.0, 3.0]));
        queue.play_next();

        assert_eq!(queue.sink().played, vec!["boom@[1.0, 2.0, 3.0]"]);
    }
}
