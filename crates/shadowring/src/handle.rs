//! Safe producer and consumer endpoints.
//!
//! [`Ring::split`] hands out exactly one [`Producer`] and one [`Consumer`].
//! Every acquire borrows its handle mutably and returns a slot guard, so the
//! borrow checker enforces what the raw API leaves to the caller:
//!
//! - one producer and one consumer per ring
//! - at most one outstanding slot per side
//! - a commit always matches a successful acquire
//!
//! ```
//! use shadowring::Ring;
//!
//! let mut ring = Ring::<u64>::new(4);
//! let (mut producer, mut consumer) = ring.split();
//!
//! let mut slot = producer.acquire_write().unwrap();
//! *slot = 42;
//! slot.commit();
//!
//! let slot = consumer.acquire_read().unwrap();
//! assert_eq!(*slot, 42);
//! slot.commit();
//! ```

use crate::{PushError, Ring, RingError};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Producer endpoint of a split [`Ring`].
pub struct Producer<'a, T> {
    ring: &'a Ring<T>,
}

impl<'a, T: Default> Producer<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>) -> Self {
        Self { ring }
    }

    /// Probes for a free slot. The slot is published by [`WriteSlot::commit`];
    /// dropping the guard instead publishes nothing.
    #[inline]
    pub fn acquire_write(&mut self) -> Result<WriteSlot<'_, T>, RingError> {
        // SAFETY: this handle is the ring's only producer, and `&mut self`
        // rules out a second outstanding slot.
        let pos = unsafe { self.ring.reserve_write()? };
        Ok(WriteSlot {
            ring: self.ring,
            pos,
            _marker: PhantomData,
        })
    }

    /// Writes `value` into the next free slot and publishes it.
    ///
    /// Returns the value inside [`PushError`] if the ring is full.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        match self.acquire_write() {
            Ok(slot) => {
                slot.write(value);
                Ok(())
            }
            Err(_) => Err(PushError(value)),
        }
    }
}

impl<T> Producer<'_, T> {
    /// Returns the ring's slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Approximate number of published elements, see [`Ring::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Approximate emptiness, see [`Ring::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<T> fmt::Debug for Producer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("ring", self.ring).finish()
    }
}

/// Consumer endpoint of a split [`Ring`].
pub struct Consumer<'a, T> {
    ring: &'a Ring<T>,
}

impl<'a, T: Default> Consumer<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>) -> Self {
        Self { ring }
    }

    /// Probes for the oldest published element. The slot is released by
    /// [`ReadSlot::commit`] or [`ReadSlot::take`]; dropping the guard instead
    /// leaves the element in place for the next acquire.
    #[inline]
    pub fn acquire_read(&mut self) -> Result<ReadSlot<'_, T>, RingError> {
        // SAFETY: this handle is the ring's only consumer, and `&mut self`
        // rules out a second outstanding slot.
        let pos = unsafe { self.ring.reserve_read()? };
        Ok(ReadSlot {
            ring: self.ring,
            pos,
            _marker: PhantomData,
        })
    }

    /// Moves the oldest element out of the ring, if any.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.acquire_read().ok().map(ReadSlot::take)
    }
}

impl<T> Consumer<'_, T> {
    /// Returns the ring's slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Approximate number of published elements, see [`Ring::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Approximate emptiness, see [`Ring::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<T> fmt::Debug for Consumer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("ring", self.ring).finish()
    }
}

/// A free slot held by the producer. Derefs to the slot's current value
/// (`T::default()` unless a previous guard was dropped uncommitted).
///
/// The guard behaves like `&mut T`: sharing it between threads needs
/// `T: Sync`.
///
/// ```compile_fail
/// use shadowring::{Ring, WriteSlot};
/// use std::cell::Cell;
///
/// fn assert_sync<S: Sync>(_: &S) {}
///
/// let mut ring = Ring::<Cell<u64>>::new(2);
/// let (mut producer, _consumer) = ring.split();
/// let slot: WriteSlot<'_, Cell<u64>> = producer.acquire_write().unwrap();
/// assert_sync(&slot);
/// ```
#[must_use = "dropping a WriteSlot without commit publishes nothing"]
pub struct WriteSlot<'p, T> {
    ring: &'p Ring<T>,
    pos: u64,
    _marker: PhantomData<&'p mut T>,
}

impl<T: Default> WriteSlot<'_, T> {
    /// Publishes the slot to the consumer.
    #[inline]
    pub fn commit(self) {
        // SAFETY: the slot came from a successful reserve on the only
        // producer, and no reference into it outlives `self`.
        unsafe { self.ring.commit_write() }
    }

    /// Stores `value` and publishes the slot.
    #[inline]
    pub fn write(mut self, value: T) {
        *self.deref_mut() = value;
        self.commit();
    }
}

impl<T> Deref for WriteSlot<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the producer owns the slot at `pos` until commit.
        unsafe { &*self.ring.slot_ptr(self.pos) }
    }
}

impl<T> DerefMut for WriteSlot<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the producer owns the slot at `pos` until commit.
        unsafe { &mut *self.ring.slot_ptr(self.pos) }
    }
}

/// A published slot held by the consumer. Derefs to the element.
///
/// Owns the slot exclusively until commit, so it carries the auto traits of
/// `&mut T`.
///
/// ```compile_fail
/// use shadowring::{ReadSlot, Ring};
/// use std::cell::Cell;
///
/// fn assert_sync<S: Sync>(_: &S) {}
///
/// let mut ring = Ring::<Cell<u64>>::new(2);
/// let (mut producer, mut consumer) = ring.split();
/// producer.push(Cell::new(1)).unwrap();
/// let slot: ReadSlot<'_, Cell<u64>> = consumer.acquire_read().unwrap();
/// assert_sync(&slot);
/// ```
#[must_use = "dropping a ReadSlot without commit leaves the element in the ring"]
pub struct ReadSlot<'c, T> {
    ring: &'c Ring<T>,
    pos: u64,
    _marker: PhantomData<&'c mut T>,
}

impl<T: Default> ReadSlot<'_, T> {
    /// Drops the element (the slot is reset to `T::default()`) and hands the
    /// slot back to the producer.
    #[inline]
    pub fn commit(self) {
        // SAFETY: the slot came from a successful reserve on the only
        // consumer, and no reference into it outlives `self`.
        unsafe { self.ring.commit_read() }
    }

    /// Moves the element out, leaving `T::default()` in the slot, and hands
    /// the slot back to the producer.
    #[inline]
    pub fn take(self) -> T {
        // SAFETY: as for `commit`.
        unsafe { self.ring.take_read() }
    }
}

impl<T> Deref for ReadSlot<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the slot at `pos` is published and owned by the consumer
        // until commit.
        unsafe { &*self.ring.slot_ptr(self.pos) }
    }
}
