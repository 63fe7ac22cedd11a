//! # Collections
//!
//! Bounded containers that never reallocate after construction.

mod ring_buffer;

pub use ring_buffer::{Iter, RingBuffer};
