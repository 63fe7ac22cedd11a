//! # Resource Pool
//!
//! Prefab-backed instance pool for entities that are frequently spawned and
//! despawned.
//!
//! ## Instance Lifecycle
//!
//! ```text
//!  Unallocated ──configure──> Available ──acquire──> Active
//!                                 ▲                    │
//!                                 └──────release───────┘
//! ```
//!
//! Only [`ResourcePool::acquire`] moves an instance out of the pool and only
//! [`ResourcePool::release`] moves it back. Active instances are owned by the
//! caller; the pool never touches them.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::error::{FoundationError, FoundationResult, Rejected};

/// Default number of instances pre-created per descriptor.
pub const DEFAULT_PREALLOCATE: usize = 3;

/// An instance that can live in a [`ResourcePool`].
pub trait Poolable {
    /// Identifier of the descriptor this instance was created from.
    fn pool_id(&self) -> &str;

    /// Called when the instance enters the pool, either freshly created or
    /// released by its user.
    fn deactivate(&mut self) {}
}

/// Host hook that materializes a new instance from a descriptor.
///
/// Implemented for every `FnMut(&PoolDescriptor<Tpl>) -> T` closure.
pub trait InstanceFactory<Tpl, T> {
    /// Creates an instance tagged with `descriptor.id`.
    fn create(&mut self, descriptor: &PoolDescriptor<Tpl>) -> T;
}

impl<Tpl, T, F> InstanceFactory<Tpl, T> for F
where
    F: FnMut(&PoolDescriptor<Tpl>) -> T,
{
    fn create(&mut self, descriptor: &PoolDescriptor<Tpl>) -> T {
        self(descriptor)
    }
}

/// Static configuration for one group of pooled instances.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolDescriptor<Tpl> {
    /// Pool identifier, matched against [`Poolable::pool_id`].
    pub id: String,
    /// Template handed to the factory.
    pub template: Tpl,
    /// Instances created up front.
    pub preallocate: usize,
}

impl<Tpl> PoolDescriptor<Tpl> {
    /// Creates a descriptor with the default pre-allocation count.
    #[must_use]
    pub fn new(id: impl Into<String>, template: Tpl) -> Self {
        Self {
            id: id.into(),
            template,
            preallocate: DEFAULT_PREALLOCATE,
        }
    }

    /// Sets the pre-allocation count.
    #[must_use]
    pub fn preallocate(mut self, count: usize) -> Self {
        self.preallocate = count;
        self
    }
}

/// What [`ResourcePool::acquire`] does when a configured pool is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AcquireMode {
    /// Create a fresh instance through the factory.
    #[default]
    MayCreate,
    /// Fail with [`FoundationError::NotAvailable`].
    PoolOnly,
}

/// A pool of reusable instances grouped by descriptor identifier.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust
/// use foundations_core::{AcquireMode, PoolDescriptor, Poolable, ResourcePool};
///
/// struct Particle { kind: String }
///
/// impl Poolable for Particle {
///     fn pool_id(&self) -> &str { &self.kind }
/// }
///
/// let mut pool =
///     ResourcePool::<Particle, (), _>::new(|d: &PoolDescriptor<()>| Particle { kind: d.id.clone() });
/// pool.configure([PoolDescriptor::new("spark", ()).preallocate(2)])?;
///
/// let spark = pool.acquire("spark", AcquireMode::PoolOnly)?;
/// pool.release(spark).ok();
/// assert_eq!(pool.available("spark"), Some(2));
/// # Ok::<(), foundations_core::FoundationError>(())
/// ```
pub struct ResourcePool<T, Tpl, F> {
    /// Descriptors in configuration order.
    descriptors: Vec<PoolDescriptor<Tpl>>,
    /// Identifier to descriptor slot.
    index: HashMap<String, usize>,
    /// Available instances per descriptor slot, oldest first.
    available: Vec<VecDeque<T>>,
    /// Host factory.
    factory: F,
    /// Set once `configure` has succeeded.
    configured: bool,
}

impl<T, Tpl, F> ResourcePool<T, Tpl, F>
where
    T: Poolable,
    F: InstanceFactory<Tpl, T>,
{
    /// Creates an unconfigured pool around a factory.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            descriptors: Vec::new(),
            index: HashMap::new(),
            available: Vec::new(),
            factory,
            configured: false,
        }
    }

    /// Creates a pool and configures it in one step.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn with_descriptors<I>(factory: F, descriptors: I) -> FoundationResult<Self>
    where
        I: IntoIterator<Item = PoolDescriptor<Tpl>>,
    {
        let mut pool = Self::new(factory);
        pool.configure(descriptors)?;
        Ok(pool)
    }

    /// One-time setup: registers descriptors and pre-creates their instances.
    ///
    /// The descriptor list is validated as a whole before any instance is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::InvalidConfig`] when the pool is already
    /// configured, a descriptor identifier is empty or repeated, or the
    /// factory tags an instance with the wrong identifier.
    pub fn configure<I>(&mut self, descriptors: I) -> FoundationResult<()>
    where
        I: IntoIterator<Item = PoolDescriptor<Tpl>>,
    {
        if self.configured {
            return Err(FoundationError::InvalidConfig(
                "resource pool is already configured".into(),
            ));
        }

        let descriptors: Vec<PoolDescriptor<Tpl>> = descriptors.into_iter().collect();
        let mut index = HashMap::with_capacity(descriptors.len());
        for (slot, descriptor) in descriptors.iter().enumerate() {
            if descriptor.id.is_empty() {
                return Err(FoundationError::InvalidConfig(format!(
                    "pool descriptor #{slot} has an empty identifier"
                )));
            }
            if index.insert(descriptor.id.clone(), slot).is_some() {
                return Err(FoundationError::InvalidConfig(format!(
                    "duplicate pool identifier '{}'",
                    descriptor.id
                )));
            }
        }

        let mut available = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let mut instances = VecDeque::with_capacity(descriptor.preallocate);
            for _ in 0..descriptor.preallocate {
                let mut instance = Self::create_tagged(&mut self.factory, descriptor)?;
                instance.deactivate();
                instances.push_back(instance);
            }
            tracing::debug!(
                pool = %descriptor.id,
                preallocated = descriptor.preallocate,
                "pool descriptor configured"
            );
            available.push(instances);
        }

        self.descriptors = descriptors;
        self.index = index;
        self.available = available;
        self.configured = true;
        Ok(())
    }

    /// Takes an instance out of the pool.
    ///
    /// The oldest pooled instance is handed out first. Activating it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// - [`FoundationError::NotConfigured`] if no descriptor matches `id`,
    ///   whatever the mode.
    /// - [`FoundationError::NotAvailable`] if the pool for `id` is empty and
    ///   `mode` is [`AcquireMode::PoolOnly`].
    /// - [`FoundationError::InvalidConfig`] if an instance created on demand
    ///   is tagged with an identifier other than `id`.
    pub fn acquire(&mut self, id: &str, mode: AcquireMode) -> FoundationResult<T> {
        let slot = self.slot(id)?;

        if let Some(instance) = self.available[slot].pop_front() {
            tracing::trace!(pool = id, remaining = self.available[slot].len(), "acquired pooled instance");
            return Ok(instance);
        }

        match mode {
            AcquireMode::MayCreate => {
                tracing::trace!(pool = id, "pool empty, creating instance");
                Self::create_tagged(&mut self.factory, &self.descriptors[slot])
            }
            AcquireMode::PoolOnly => Err(FoundationError::NotAvailable(id.to_owned())),
        }
    }

    /// Returns an instance to the pool it was created from.
    ///
    /// The instance is deactivated and queued behind the instances already
    /// available.
    ///
    /// # Errors
    ///
    /// Returns the instance inside [`Rejected`] with
    /// [`FoundationError::NotConfigured`] when its identifier matches no
    /// descriptor. The caller should destroy it.
    pub fn release(&mut self, mut instance: T) -> Result<(), Rejected<T>> {
        let Some(slot) = self.index.get(instance.pool_id()).copied() else {
            let error = FoundationError::NotConfigured(instance.pool_id().to_owned());
            tracing::warn!(pool = instance.pool_id(), "released instance has no pool");
            return Err(Rejected { instance, error });
        };

        instance.deactivate();
        self.available[slot].push_back(instance);
        Ok(())
    }

    /// Returns the number of available instances for `id`, or `None` if `id`
    /// is not configured.
    #[must_use]
    pub fn available(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&slot| self.available[slot].len())
    }

    /// Returns the total number of pooled instances across all descriptors.
    #[must_use]
    pub fn total_available(&self) -> usize {
        self.available.iter().map(VecDeque::len).sum()
    }

    /// Returns `true` if a descriptor matches `id`.
    #[inline]
    #[must_use]
    pub fn is_configured(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the descriptors in configuration order.
    #[inline]
    #[must_use]
    pub fn descriptors(&self) -> &[PoolDescriptor<Tpl>] {
        &self.descriptors
    }

    /// Destroys every available instance, keeping the descriptors.
    ///
    /// # Returns
    ///
    /// The number of instances destroyed.
    pub fn drain(&mut self) -> usize {
        let destroyed = self.total_available();
        for instances in &mut self.available {
            instances.clear();
        }
        tracing::debug!(destroyed, "pool drained");
        destroyed
    }

    fn create_tagged(factory: &mut F, descriptor: &PoolDescriptor<Tpl>) -> FoundationResult<T> {
        let instance = factory.create(descriptor);
        if instance.pool_id() != descriptor.id {
            return Err(FoundationError::InvalidConfig(format!(
                "factory tagged an instance of '{}' as '{}'",
                descriptor.id,
                instance.pool_id()
            )));
        }
        Ok(instance)
    }

    fn slot(&self, id: &str) -> FoundationResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FoundationError::NotConfigured(id.to_owned()))
    }
}

impl<T, Tpl, F> fmt::Debug for ResourcePool<T, Tpl, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for descriptor in &self.descriptors {
            let available = self
                .index
                .get(&descriptor.id)
                .map_or(0, |&slot| self.available[slot].len());
            map.entry(&descriptor.id, &available);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Shape {
        kind: String,
        serial: u32,
        active: bool,
    }

    impl Poolable for Shape {
        fn pool_id(&self) -> &str {
            &self.kind
        }

        fn deactivate(&mut self) {
            self.active = false;
        }
    }

    fn shape_factory() -> impl FnMut(&PoolDescriptor<()>) -> Shape {
        let mut serial = 0;
        move |descriptor: &PoolDescriptor<()>| {
            serial += 1;
            Shape {
                kind: descriptor.id.clone(),
                serial,
                active: true,
            }
        }
    }

    fn cube_pool(preallocate: usize) -> ResourcePool<Shape, (), impl FnMut(&PoolDescriptor<()>) -> Shape> {
        ResourcePool::with_descriptors(
            shape_factory(),
            [PoolDescriptor::new("cube", ()).preallocate(preallocate)],
        )
        .unwrap()
    }

    #[test]
    fn test_pool_round_trip() {
        let mut pool = cube_pool(2);

        let first = pool.acquire("cube", AcquireMode::PoolOnly).unwrap();
        let second = pool.acquire("cube", AcquireMode::PoolOnly).unwrap();
        assert_ne!(first.serial, second.serial);
        assert_eq!(
            pool.acquire("cube", AcquireMode::PoolOnly),
            Err(FoundationError::NotAvailable("cube".into()))
        );

        pool.release(first).unwrap();
        let again = pool.acquire("cube", AcquireMode::PoolOnly).unwrap();
        assert_eq!(again.serial, 1);
    }

    #[test]
    fn test_preallocated_instances_inactive() {
        let mut pool = cube_pool(1);
        let shape = pool.acquire("cube", AcquireMode::PoolOnly).unwrap();
        assert!(!shape.active);
    }

    #[test]
    fn test_may_create_when_empty() {
        let mut pool = cube_pool(0);

        let shape = pool.acquire("cube", AcquireMode::MayCreate).unwrap();
        assert_eq!(shape.kind, "cube");
        assert_eq!(pool.available("cube"), Some(0));

        pool.release(shape).unwrap();
        assert_eq!(pool.available("cube"), Some(1));
    }

    #[test]
    fn test_unknown_identifier() {
        let mut pool = cube_pool(1);

        for mode in [AcquireMode::MayCreate, AcquireMode::PoolOnly] {
            assert_eq!(
                pool.acquire("sphere", mode),
                Err(FoundationError::NotConfigured("sphere".into()))
            );
        }
    }

    #[test]
    fn test_release_unknown_hands_back() {
        let mut pool = cube_pool(0);
        let stray = Shape {
            kind: "sphere".into(),
            serial: 99,
            active: true,
        };

        let rejected = pool.release(stray).unwrap_err();
        assert_eq!(rejected.error, FoundationError::NotConfigured("sphere".into()));
        assert_eq!(rejected.into_instance().serial, 99);
        assert_eq!(pool.total_available(), 0);
    }

    #[test]
    fn test_malformed_descriptors() {
        let duplicate = ResourcePool::<Shape, _, _>::with_descriptors(
            shape_factory(),
            [PoolDescriptor::new("cube", ()), PoolDescriptor::new("cube", ())],
        );
        assert!(matches!(duplicate, Err(FoundationError::InvalidConfig(_))));

        let empty =
            ResourcePool::<Shape, _, _>::with_descriptors(shape_factory(), [PoolDescriptor::new("", ())]);
        assert!(matches!(empty, Err(FoundationError::InvalidConfig(_))));
    }

    #[test]
    fn test_configure_once() {
        let mut pool = cube_pool(1);
        let again = pool.configure([PoolDescriptor::new("sphere", ())]);
        assert!(matches!(again, Err(FoundationError::InvalidConfig(_))));
        assert!(!pool.is_configured("sphere"));
    }

    #[test]
    fn test_mislabelled_factory_rejected() {
        let result = ResourcePool::<Shape, _, _>::with_descriptors(
            |_: &PoolDescriptor<()>| Shape {
                kind: "wrong".into(),
                serial: 0,
                active: true,
            },
            [PoolDescriptor::new("cube", ()).preallocate(1)],
        );
        assert!(matches!(result, Err(FoundationError::InvalidConfig(_))));
    }

    #[test]
    fn test_mislabelled_creation_on_demand() {
        let mut calls = 0;
        let mut pool = ResourcePool::<Shape, _, _>::with_descriptors(
            move |descriptor: &PoolDescriptor<()>| {
                calls += 1;
                Shape {
                    kind: if calls > 1 { "wrong".into() } else { descriptor.id.clone() },
                    serial: calls,
                    active: true,
                }
            },
            [PoolDescriptor::new("cube", ()).preallocate(1)],
        )
        .unwrap();

        assert_eq!(pool.acquire("cube", AcquireMode::MayCreate).unwrap().serial, 1);
        assert!(matches!(
            pool.acquire("cube", AcquireMode::MayCreate),
            Err(FoundationError::InvalidConfig(_))
        ));
        assert_eq!(pool.available("cube"), Some(0));
    }

    #[test]
    fn test_drain() {
        let mut pool = ResourcePool::<Shape, _, _>::with_descriptors(
            shape_factory(),
            [
                PoolDescriptor::new("cube", ()).preallocate(2),
                PoolDescriptor::new("sphere", ()),
            ],
        )
        .unwrap();

        assert_eq!(pool.total_available(), 2 + DEFAULT_PREALLOCATE);
        assert_eq!(pool.drain(), 2 + DEFAULT_PREALLOCATE);
        assert_eq!(pool.available("sphere"), Some(0));
        assert!(pool.is_configured("sphere"));
    }
}
