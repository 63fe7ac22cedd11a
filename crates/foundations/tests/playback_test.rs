//! Integration tests for playback queues driven by the tick driver.

use std::sync::Arc;

use foundations::config::TickConfig;
use foundations::{
    AudioEvent2D, AudioEvent3D, AudioSink, ClipId, FoundationContext, Lifecycle, PlaybackQueue,
    TickDriver,
};
use parking_lot::Mutex;

/// Sink writing into a shared journal so tests can read it after the queue
/// has been boxed into the driver.
#[derive(Clone, Default)]
struct SharedSink {
    played: Arc<Mutex<Vec<String>>>,
}

impl AudioSink for SharedSink {
    fn play_2d(&mut self, clip: &ClipId) {
        self.played.lock().push(format!("2d:{clip}"));
    }

    fn play_3d(&mut self, clip: &ClipId, _position: [f32; 3]) {
        self.played.lock().push(format!("3d:{clip}"));
    }
}

/// Publishes a fixed burst of requests on its first tick.
struct Burst {
    fired: bool,
}

impl Lifecycle for Burst {
    fn activate(&mut self, _ctx: &FoundationContext) {}

    fn tick(&mut self, ctx: &FoundationContext) {
        if self.fired {
            return;
        }
        self.fired = true;
        for clip in ["step", "step", "jump"] {
            ctx.events().publish(AudioEvent2D::new(clip));
        }
        ctx.events().publish(AudioEvent3D::new("boom", [0.0, 1.0, 0.0]));
    }

    fn deactivate(&mut self) {}
}

fn driver() -> TickDriver {
    TickDriver::new(
        FoundationContext::new(),
        TickConfig {
            paced: false,
            ..TickConfig::default()
        },
    )
}

#[test]
fn test_queues_drain_one_per_tick() {
    let sink = SharedSink::default();
    let mut driver = driver();
    driver.register(Box::new(Burst { fired: false }));
    driver.register(Box::new(
        PlaybackQueue::<AudioEvent2D, _>::new(30, sink.clone()).unwrap(),
    ));
    driver.register(Box::new(
        PlaybackQueue::<AudioEvent3D, _>::new(30, sink.clone()).unwrap(),
    ));
    driver.start();

    driver.step();
    assert_eq!(*sink.played.lock(), vec!["2d:step", "3d:boom"]);

    driver.step();
    assert_eq!(*sink.played.lock(), vec!["2d:step", "3d:boom", "2d:jump"]);

    driver.run_for(5);
    assert_eq!(sink.played.lock().len(), 3);
}

#[test]
fn test_shutdown_releases_subscriptions() {
    let ctx = FoundationContext::new();
    let mut driver = TickDriver::new(ctx.clone(), TickConfig::default());
    driver.register(Box::new(
        PlaybackQueue::<AudioEvent2D, _>::new(4, SharedSink::default()).unwrap(),
    ));

    driver.start();
    assert_eq!(ctx.events().listener_count::<AudioEvent2D>(), 1);

    driver.shutdown();
    assert_eq!(ctx.events().listener_count::<AudioEvent2D>(), 0);
}

#[test]
fn test_restart_discards_stale_requests() {
    let bus = foundations::core::EventBus::new();
    let sink = SharedSink::default();
    let mut queue = PlaybackQueue::<AudioEvent2D, _>::new(4, sink.clone()).unwrap();

    queue.attach(&bus);
    bus.publish(AudioEvent2D::new("stale"));
    queue.detach();

    queue.attach(&bus);
    bus.publish(AudioEvent2D::new("fresh"));
    while queue.play_next() {}

    assert_eq!(*sink.played.lock(), vec!["2d:fresh"]);
}
