//! # Ring Buffer
//!
//! Fixed-capacity circular container for bounded pending-work queues.

use std::fmt;
use std::iter::FusedIterator;

use crate::error::{FoundationError, FoundationResult};

/// A fixed-capacity circular buffer with random-access mutation.
///
/// Pushing onto a full buffer evicts the oldest element. Logical index `0`
/// is always the oldest element, whatever the physical rotation of the
/// backing storage.
///
/// # Layout
///
/// ```text
///  physical:  [ C ][ D ][ _ ][ A ][ B ]
///                    ▲         ▲
///                   head      tail
///  logical:   A=0, B=1, C=2, D=3
/// ```
///
/// # Thread Safety
///
/// This buffer is NOT thread-safe. Wrap it in a mutex to share it.
///
/// # Example
///
/// ```rust
/// use foundations_core::RingBuffer;
///
/// let mut ring = RingBuffer::new(3)?;
/// for value in 1..=4 {
///     ring.push(value);
/// }
/// assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(ring.pop()?, 2);
/// # Ok::<(), foundations_core::FoundationError>(())
/// ```
#[derive(Clone)]
pub struct RingBuffer<T> {
    /// Backing storage. Slots outside the logical range are always `None`.
    slots: Box<[Option<T>]>,
    /// Physical slot of the most recent push.
    head: usize,
    /// Physical slot of logical index 0.
    tail: usize,
    /// Number of live elements.
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer with a fixed capacity.
    ///
    /// All storage is allocated upfront and never grows.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of elements, must be at least 1
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::InvalidConfig`] when `capacity` is zero.
    pub fn new(capacity: usize) -> FoundationResult<Self> {
        if capacity == 0 {
            return Err(FoundationError::InvalidConfig(
                "ring buffer capacity must be positive".into(),
            ));
        }

        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();

        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: capacity - 1,
            tail: 0,
            len: 0,
        })
    }

    /// Returns the fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of elements currently held.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next push will evict the oldest element.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends an element after the newest one.
    ///
    /// This is a **O(1)** operation. When the buffer is full the oldest
    /// element is evicted and returned.
    ///
    /// # Returns
    ///
    /// The value previously stored in the written slot, which is `Some`
    /// only when the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.head = self.wrap(self.head + 1);
        let overwritten = self.slots[self.head].replace(item);

        if self.is_full() {
            self.tail = self.wrap(self.tail + 1);
        } else {
            self.len += 1;
        }

        overwritten
    }

    /// Removes and returns the oldest element.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::Empty`] when the buffer holds nothing.
    pub fn pop(&mut self) -> FoundationResult<T> {
        if self.len == 0 {
            return Err(FoundationError::Empty);
        }

        let popped = self.slots[self.tail].take();
        self.tail = self.wrap(self.tail + 1);
        self.len -= 1;

        popped.ok_or(FoundationError::Empty)
    }

    /// Returns a reference to the element at a logical index.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::IndexOutOfRange`] unless `index < len()`.
    pub fn get(&self, index: usize) -> FoundationResult<&T> {
        let slot = self.checked_slot(index)?;
        self.slots[slot]
            .as_ref()
            .ok_or(FoundationError::IndexOutOfRange { index, len: self.len })
    }

    /// Returns a mutable reference to the element at a logical index.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::IndexOutOfRange`] unless `index < len()`.
    pub fn get_mut(&mut self, index: usize) -> FoundationResult<&mut T> {
        let len = self.len;
        let slot = self.checked_slot(index)?;
        self.slots[slot]
            .as_mut()
            .ok_or(FoundationError::IndexOutOfRange { index, len })
    }

    /// Replaces the element at a logical index, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::IndexOutOfRange`] unless `index < len()`.
    pub fn set(&mut self, index: usize, item: T) -> FoundationResult<T> {
        let len = self.len;
        let slot = self.checked_slot(index)?;
        self.slots[slot]
            .replace(item)
            .ok_or(FoundationError::IndexOutOfRange { index, len })
    }

    /// Returns the oldest element, if any.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.get(0).ok()
    }

    /// Returns the newest element, if any.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last).ok())
    }

    /// Inserts an element at a logical index in `0..=len()`.
    ///
    /// Elements from `index` onwards move one position toward the head. The
    /// displaced newest element is then re-pushed, so a full buffer evicts
    /// its oldest element exactly as [`push`](Self::push) would. Inserting
    /// at `len()` is a plain push.
    ///
    /// This is a **O(n)** operation.
    ///
    /// # Returns
    ///
    /// The evicted element when the buffer was full.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::IndexOutOfRange`] when `index > len()`.
    pub fn insert_at(&mut self, item: T, index: usize) -> FoundationResult<Option<T>> {
        if index > self.len {
            return Err(FoundationError::IndexOutOfRange { index, len: self.len });
        }
        if index == self.len {
            return Ok(self.push(item));
        }

        let last_slot = self.physical(self.len - 1);
        let last = self.slots[last_slot].take();

        // Walk the hole left by `last` down to `index`.
        for i in (index + 1..self.len).rev() {
            let (to, from) = (self.physical(i), self.physical(i - 1));
            self.slots.swap(to, from);
        }
        let slot = self.physical(index);
        self.slots[slot] = Some(item);

        Ok(last.and_then(|last| self.push(last)))
    }

    /// Removes and returns the element at a logical index in `0..len()`.
    ///
    /// Elements before `index` move one position toward the tail, then the
    /// oldest slot is popped. This is a **O(n)** operation.
    ///
    /// # Errors
    ///
    /// Returns [`FoundationError::IndexOutOfRange`] unless `index < len()`.
    pub fn remove_at(&mut self, index: usize) -> FoundationResult<T> {
        self.checked_slot(index)?;

        for i in (1..=index).rev() {
            let (to, from) = (self.physical(i), self.physical(i - 1));
            self.slots.swap(to, from);
        }

        self.pop()
    }

    /// Drops every element and resets head and tail to their initial slots.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = self.capacity() - 1;
        self.tail = 0;
        self.len = 0;
    }

    /// Iterates over elements from oldest to newest.
    ///
    /// Each call starts a fresh pass over the current contents.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            front: 0,
            back: self.len,
        }
    }

    #[inline]
    fn wrap(&self, slot: usize) -> usize {
        slot % self.capacity()
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        self.wrap(self.tail + index)
    }

    fn checked_slot(&self, index: usize) -> FoundationResult<usize> {
        if index < self.len {
            Ok(self.physical(index))
        } else {
            Err(FoundationError::IndexOutOfRange { index, len: self.len })
        }
    }
}

impl<T: PartialEq> RingBuffer<T> {
    /// Returns the logical index of the first element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|candidate| candidate == item)
    }

    /// Returns `true` if any element equals `item`.
    #[inline]
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`RingBuffer`] in logical order.
#[derive(Clone)]
pub struct Iter<'a, T> {
    ring: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.ring.slots[self.ring.physical(self.front)].as_ref();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.ring.slots[self.ring.physical(self.back)].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
