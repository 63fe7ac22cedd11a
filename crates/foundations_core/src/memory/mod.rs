//! # Memory Management
//!
//! Pre-allocated instance pools for churn-heavy gameplay entities.
//!
//! ## Design Philosophy
//!
//! Instances are created once at startup. During gameplay:
//! - Spawning takes a pooled instance instead of constructing one
//! - Despawning returns it instead of destroying it
//! - Pools never shrink on their own

mod pool;

pub use pool::{
    AcquireMode, InstanceFactory, PoolDescriptor, Poolable, ResourcePool, DEFAULT_PREALLOCATE,
};
