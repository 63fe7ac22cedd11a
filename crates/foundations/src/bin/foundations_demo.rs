//! # Foundations Demo
//!
//! Headless scene exercising every primitive:
//! - a scripted director publishes selections and explosions
//! - the shape spawner recycles shapes through a `ResourcePool`
//! - two `PlaybackQueue`s play the resulting audio requests, one per tick
//!
//! ```bash
//! # Built-in scene
//! ./foundations_demo
//!
//! # Custom configuration, verbose core logs
//! RUST_LOG=info,foundations_core=trace ./foundations_demo config/foundations.toml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use foundations::core::{
    AcquireMode, EventBus, PoolDescriptor, Poolable, ResourcePool, Subscription,
};
use foundations::playback::LoggingSink;
use foundations::{
    logging, AudioEvent2D, AudioEvent3D, FoundationContext, FoundationsConfig, Lifecycle,
    PlaybackQueue, TickDriver,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Shapes spawned per selection.
const NUMBER_TO_SPAWN: usize = 2;
/// Ticks between scripted selections.
const SELECT_EVERY: u64 = 10;
/// Ticks between scripted explosions.
const EXPLODE_EVERY: u64 = 45;
/// Ticks simulated.
const DEMO_TICKS: u64 = 240;
/// Fixed seed so runs are reproducible.
const SEED: u64 = 0x00F0_0D5E_ED00;

const DEFAULT_CONFIG: &str = r#"
[pool]
default_preallocate = 3

[[pool.items]]
id = "cube"
template = { scale = 1.0 }

[[pool.items]]
id = "sphere"
preallocate = 6
template = { scale = 0.5 }

[tick]
paced = false
"#;

/// Per-prefab template read from `[[pool.items]]`.
#[derive(Clone, Debug, Deserialize)]
struct ShapeTemplate {
    scale: f32,
}

#[derive(Debug)]
struct Shape {
    prefab: String,
    scale: f32,
    position: [f32; 3],
    active: bool,
}

impl Poolable for Shape {
    fn pool_id(&self) -> &str {
        &self.prefab
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.position = [0.0; 3];
    }
}

fn build_shape(descriptor: &PoolDescriptor<ShapeTemplate>) -> Shape {
    Shape {
        prefab: descriptor.id.clone(),
        scale: descriptor.template.scale,
        position: [0.0; 3],
        active: false,
    }
}

type ShapePool = ResourcePool<Shape, ShapeTemplate, fn(&PoolDescriptor<ShapeTemplate>) -> Shape>;

/// A live shape was clicked.
#[derive(Clone, Debug)]
struct ShapeSelected {
    slot: usize,
}

/// Blast that removes every shape inside its radius.
#[derive(Clone, Debug)]
struct Explosion {
    position: [f32; 3],
    radius: f32,
    force: f32,
}

impl Explosion {
    fn in_radius(&self, point: [f32; 3]) -> bool {
        let distance_sq: f32 = self
            .position
            .iter()
            .zip(point)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        distance_sq <= self.radius * self.radius
    }
}

enum SceneInput {
    Selected(ShapeSelected),
    Exploded(Explosion),
}

/// Publishes scripted input in place of a player.
struct Director {
    rng: ChaCha8Rng,
    tick: u64,
}

impl Lifecycle for Director {
    fn name(&self) -> &str {
        "director"
    }

    fn activate(&mut self, _ctx: &FoundationContext) {
        self.tick = 0;
    }

    fn tick(&mut self, ctx: &FoundationContext) {
        self.tick += 1;
        if self.tick % SELECT_EVERY == 0 {
            ctx.events().publish(ShapeSelected {
                slot: self.rng.gen_range(0..64),
            });
        }
        if self.tick % EXPLODE_EVERY == 0 {
            ctx.events().publish(Explosion {
                position: [self.rng.gen_range(-4.0..4.0), 0.0, self.rng.gen_range(-4.0..4.0)],
                radius: 3.0,
                force: 10.0,
            });
        }
    }

    fn deactivate(&mut self) {}
}

/// Recycles shapes through the pool in response to scene input.
struct ShapeSpawner {
    pool: ShapePool,
    live: Vec<Shape>,
    inbox: Arc<Mutex<Vec<SceneInput>>>,
    subscriptions: Vec<Subscription>,
    rng: ChaCha8Rng,
}

impl ShapeSpawner {
    fn spawn(&mut self, prefab: &str, origin: [f32; 3]) {
        match self.pool.acquire(prefab, AcquireMode::MayCreate) {
            Ok(mut shape) => {
                shape.position = [
                    origin[0] + self.rng.gen_range(-0.5..0.5),
                    origin[1],
                    origin[2] + self.rng.gen_range(-0.5..0.5),
                ];
                shape.active = true;
                self.live.push(shape);
            }
            Err(error) => tracing::error!(%error, "spawn failed"),
        }
    }

    fn recycle(&mut self, shape: Shape) {
        if let Err(rejected) = self.pool.release(shape) {
            tracing::warn!(error = %rejected, "destroying unpooled shape");
        }
    }

    fn on_selected(&mut self, events: &EventBus, selected: &ShapeSelected) {
        if self.live.is_empty() {
            return;
        }
        let shape = self.live.swap_remove(selected.slot % self.live.len());
        debug_assert!(shape.active, "live shape was deactivated");
        let origin = shape.position;
        let prefab = shape.prefab.clone();
        tracing::info!(prefab = %prefab, scale = shape.scale, "shape selected");

        for _ in 0..NUMBER_TO_SPAWN {
            self.spawn(&prefab, origin);
        }
        events.publish(AudioEvent2D::new("select"));
        self.recycle(shape);
    }

    fn on_exploded(&mut self, events: &EventBus, explosion: &Explosion) {
        let (caught, spared): (Vec<Shape>, Vec<Shape>) = self
            .live
            .drain(..)
            .partition(|shape| explosion.in_radius(shape.position));
        self.live = spared;

        tracing::info!(caught = caught.len(), force = explosion.force, "explosion");
        for shape in caught {
            self.recycle(shape);
        }
        events.publish(AudioEvent3D::new("explosion", explosion.position));
    }
}

impl Lifecycle for ShapeSpawner {
    fn name(&self) -> &str {
        "shape_spawner"
    }

    fn activate(&mut self, ctx: &FoundationContext) {
        let inbox = Arc::clone(&self.inbox);
        self.subscriptions.push(ctx.events().subscribe_scoped(move |e: &ShapeSelected| {
            inbox.lock().push(SceneInput::Selected(e.clone()));
        }));
        let inbox = Arc::clone(&self.inbox);
        self.subscriptions.push(ctx.events().subscribe_scoped(move |e: &Explosion| {
            inbox.lock().push(SceneInput::Exploded(e.clone()));
        }));

        let prefabs: Vec<String> = self.pool.descriptors().iter().map(|d| d.id.clone()).collect();
        for prefab in &prefabs {
            self.spawn(prefab, [0.0; 3]);
        }
    }

    fn tick(&mut self, ctx: &FoundationContext) {
        let inputs = std::mem::take(&mut *self.inbox.lock());
        for input in inputs {
            match input {
                SceneInput::Selected(selected) => self.on_selected(ctx.events(), &selected),
                SceneInput::Exploded(explosion) => self.on_exploded(ctx.events(), &explosion),
            }
        }
    }

    fn deactivate(&mut self) {
        self.subscriptions.clear();
        let live = std::mem::take(&mut self.live);
        for shape in live {
            self.recycle(shape);
        }
        tracing::info!(pooled = self.pool.total_available(), "spawner deactivated");
    }
}

fn load_config() -> Result<FoundationsConfig, foundations::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => FoundationsConfig::load(path),
        None => FoundationsConfig::from_toml_str(DEFAULT_CONFIG),
    }
}

fn run(config: &FoundationsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let descriptors = config.pool_descriptors::<ShapeTemplate>()?;
    let pool = ShapePool::with_descriptors(build_shape, descriptors)?;

    let mut driver = TickDriver::new(FoundationContext::global(), config.tick.clone());
    driver.register(Box::new(Director {
        rng: ChaCha8Rng::seed_from_u64(SEED),
        tick: 0,
    }));
    driver.register(Box::new(ShapeSpawner {
        pool,
        live: Vec::new(),
        inbox: Arc::new(Mutex::new(Vec::new())),
        subscriptions: Vec::new(),
        rng: ChaCha8Rng::seed_from_u64(SEED.rotate_left(17)),
    }));
    driver.register(Box::new(PlaybackQueue::<AudioEvent2D, _>::new(
        config.playback.max_pending,
        LoggingSink,
    )?));
    driver.register(Box::new(PlaybackQueue::<AudioEvent3D, _>::new(
        config.playback.max_pending,
        LoggingSink,
    )?));

    driver.start();
    driver.run_for(DEMO_TICKS);
    driver.shutdown();

    let stats = driver.stats();
    tracing::info!(
        ticks = stats.ticks_recorded,
        avg_ms = stats.avg_tick_ms(),
        max_us = stats.max_tick_us,
        over_budget = stats.ticks_over_budget,
        "demo finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("foundations_demo: {error}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "demo failed");
            ExitCode::FAILURE
        }
    }
}
