use crate::invariants::{
    debug_assert_bounded_count, debug_assert_monotonic, debug_assert_read_not_past_write,
};
use crate::metrics::{self, SideMetrics};
use crate::{Config, Consumer, MetricsSnapshot, Producer, RingError};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Cursors
//
// `write` and `read` are unbounded u64 counters. The slot index is
// `cursor & mask`; the counters themselves never wrap in practice (at 10
// billion items/second a u64 lasts ~58 years), so `write - read` is always
// the occupied count.
//
// ## Memory Ordering Protocol
//
// **Producer (acquire_write / commit_write):**
// 1. Load `write` with Relaxed (only the producer stores it)
// 2. Read `shadow_read` with no ordering (UnsafeCell, producer-private)
// 3. If the shadow cannot prove a free slot: load `read` with Acquire
//    (synchronizes with the consumer's Release in commit_read, so the
//    consumer's clearing of the slot happens-before our write into it)
// 4. Caller writes the slot (no ordering needed, protected by protocol)
// 5. Store `write + 1` with Release (publishes the slot to the consumer)
//
// **Consumer (acquire_read / commit_read):**
// 1. Load `read` with Relaxed (only the consumer stores it)
// 2. Read `shadow_write` with no ordering (UnsafeCell, consumer-private)
// 3. If the shadow cannot prove a published slot: load `write` with Acquire
//    (synchronizes with the producer's Release in commit_write)
// 4. Caller reads the slot, then commit_read resets it to `T::default()`
// 5. Store `read + 1` with Release (hands the slot back to the producer)
//
// A shadow value was itself obtained through an Acquire load, so the fast
// path inherits the happens-before edge established when it was refreshed.
//
// ## Single-Writer Fields
//
// - `write`, `shadow_read`: mutated only by the producer
// - `read`, `shadow_write`: mutated only by the consumer
// - `slots[i]`: owned by the producer while `i` is outside `[read, write)`,
//   by the consumer while inside. Ownership flips only at the Release/Acquire
//   pairs above.
//
// =============================================================================

/// Producer cache-line group.
#[repr(C)]
struct ProducerSide {
    /// Write cursor (stored by producer, loaded by consumer)
    write: AtomicU64,
    /// Producer's cached view of `read` (avoids cross-core loads)
    shadow_read: UnsafeCell<u64>,
    metrics: SideMetrics,
}

/// Consumer cache-line group.
#[repr(C)]
struct ConsumerSide {
    /// Read cursor (stored by consumer, loaded by producer)
    read: AtomicU64,
    /// Consumer's cached view of `write` (avoids cross-core loads)
    shadow_write: UnsafeCell<u64>,
    metrics: SideMetrics,
}

/// Lock-free single-producer single-consumer ring buffer.
///
/// Fixed capacity (rounded up to a power of two), no per-element allocation.
/// Optimized with:
/// - Producer and consumer state in separate cache lines (no false sharing)
/// - Shadow cursors so the hot path rarely touches the other side's line
/// - Slots reset to `T::default()` on consumption, so consumed values are
///   dropped promptly instead of lingering until overwritten
///
/// Use [`split`](Ring::split) for safe [`Producer`]/[`Consumer`] handles, or
/// the `unsafe` two-phase methods when the ring is shared some other way
/// (e.g. behind an `Arc`) and the caller upholds the SPSC discipline.
#[repr(C)]
pub struct Ring<T> {
    // === PRODUCER HOT ===
    producer: CachePadded<ProducerSide>,

    // === CONSUMER HOT ===
    consumer: CachePadded<ConsumerSide>,

    // === READ-ONLY AFTER CONSTRUCTION ===
    config: Config,
    capacity: u64,
    mask: u64,
    slots: Box<[UnsafeCell<T>]>,
}

// Safety: values of T move from the producer thread to the consumer thread,
// so T: Send is required. Each slot is touched by one thread at a time as
// described in the protocol above.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T: Default> Ring<T> {
    /// Creates a ring with at least `requested_capacity` slots.
    ///
    /// The capacity is rounded up to the next power of two; `0` yields a
    /// single-slot ring.
    pub fn new(requested_capacity: usize) -> Self {
        Self::with_config(Config::new(requested_capacity, false))
    }

    /// Creates a ring from a full configuration.
    pub fn with_config(config: Config) -> Self {
        let capacity = config.capacity();
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Box<[_]>>();

        tracing::debug!(
            requested = config.requested_capacity,
            capacity,
            metrics = config.enable_metrics,
            "ring created"
        );

        Self {
            producer: CachePadded::new(ProducerSide {
                write: AtomicU64::new(0),
                shadow_read: UnsafeCell::new(0),
                metrics: SideMetrics::new(),
            }),
            consumer: CachePadded::new(ConsumerSide {
                read: AtomicU64::new(0),
                shadow_write: UnsafeCell::new(0),
                metrics: SideMetrics::new(),
            }),
            config,
            capacity: capacity as u64,
            mask: config.mask() as u64,
            slots,
        }
    }

    // ---------------------------------------------------------------------
    // RAW PRODUCER API
    // ---------------------------------------------------------------------

    /// Probes for a writable slot.
    ///
    /// On success returns the slot at the current write position; the caller
    /// overwrites it and then calls [`commit_write`](Ring::commit_write).
    /// Nothing is published until then.
    ///
    /// # Safety
    ///
    /// - Only one thread may act as producer for the ring's lifetime.
    /// - The returned reference must not be used after `commit_write`.
    /// - No second `acquire_write` before the matching `commit_write`.
    #[allow(clippy::mut_from_ref)]
    #[inline]
    pub unsafe fn acquire_write(&self) -> Result<&mut T, RingError> {
        let pos = self.reserve_write()?;
        Ok(&mut *self.slot_ptr(pos))
    }

    /// Publishes the slot obtained from the last successful `acquire_write`.
    ///
    /// # Safety
    ///
    /// Must be called by the producer thread, exactly once per successful
    /// `acquire_write`.
    #[inline]
    pub unsafe fn commit_write(&self) {
        let write = self.producer.write.load(Ordering::Relaxed);
        let new_write = write.wrapping_add(1);

        debug_assert_bounded_count!(
            new_write.wrapping_sub(self.consumer.read.load(Ordering::Relaxed)),
            self.capacity
        );
        debug_assert_monotonic!("write", write, new_write);

        self.producer.write.store(new_write, Ordering::Release);

        if self.config.enable_metrics {
            self.producer.metrics.add_committed();
        }
    }

    /// Returns the write position of a free slot, refreshing `shadow_read`
    /// only when the cached value cannot prove one exists.
    ///
    /// # Safety
    ///
    /// Producer thread only.
    #[inline]
    pub(crate) unsafe fn reserve_write(&self) -> Result<u64, RingError> {
        let write = self.producer.write.load(Ordering::Relaxed);

        // Fast path: check shadow
        // SAFETY: shadow_read is only touched by the producer.
        let shadow = *self.producer.shadow_read.get();
        if write.wrapping_sub(shadow) < self.capacity {
            return Ok(write);
        }

        // Slow path: refresh shadow
        let read = self.consumer.read.load(Ordering::Acquire);
        *self.producer.shadow_read.get() = read;

        if self.config.enable_metrics {
            self.producer.metrics.add_refresh();
        }

        if write.wrapping_sub(read) >= self.capacity {
            if self.config.enable_metrics {
                self.producer.metrics.add_rejected();
            }
            return Err(RingError::Full);
        }

        Ok(write)
    }

    // ---------------------------------------------------------------------
    // RAW CONSUMER API
    // ---------------------------------------------------------------------

    /// Probes for a readable slot.
    ///
    /// On success returns the oldest published element; the caller reads it
    /// and then calls [`commit_read`](Ring::commit_read).
    ///
    /// # Safety
    ///
    /// - Only one thread may act as consumer for the ring's lifetime.
    /// - The returned reference must not be used after `commit_read`.
    /// - No second `acquire_read` before the matching `commit_read`.
    #[inline]
    pub unsafe fn acquire_read(&self) -> Result<&T, RingError> {
        let pos = self.reserve_read()?;
        Ok(&*self.slot_ptr(pos))
    }

    /// Releases the slot obtained from the last successful `acquire_read`.
    ///
    /// The slot is reset to `T::default()` first, dropping the consumed value,
    /// then handed back to the producer.
    ///
    /// # Safety
    ///
    /// Must be called by the consumer thread, exactly once per successful
    /// `acquire_read`, after all references into the slot are gone.
    #[inline]
    pub unsafe fn commit_read(&self) {
        let read = self.consumer.read.load(Ordering::Relaxed);
        *self.slot_ptr(read) = T::default();
        self.advance_read(read);
    }

    /// Moves the value out of the slot at `read`, leaving `T::default()`
    /// behind, and releases the slot.
    ///
    /// # Safety
    ///
    /// Same contract as `commit_read`.
    #[inline]
    pub(crate) unsafe fn take_read(&self) -> T {
        let read = self.consumer.read.load(Ordering::Relaxed);
        let value = std::mem::take(&mut *self.slot_ptr(read));
        self.advance_read(read);
        value
    }

    /// Returns the read position of a published slot, refreshing
    /// `shadow_write` only when the cached value cannot prove one exists.
    ///
    /// # Safety
    ///
    /// Consumer thread only.
    #[inline]
    pub(crate) unsafe fn reserve_read(&self) -> Result<u64, RingError> {
        let read = self.consumer.read.load(Ordering::Relaxed);

        // Fast path: check shadow
        // SAFETY: shadow_write is only touched by the consumer.
        let shadow = *self.consumer.shadow_write.get();
        if shadow > read {
            return Ok(read);
        }

        // Slow path: refresh shadow
        let write = self.producer.write.load(Ordering::Acquire);
        *self.consumer.shadow_write.get() = write;

        if self.config.enable_metrics {
            self.consumer.metrics.add_refresh();
        }

        if write == read {
            if self.config.enable_metrics {
                self.consumer.metrics.add_rejected();
            }
            return Err(RingError::Empty);
        }

        Ok(read)
    }

    #[inline]
    unsafe fn advance_read(&self, read: u64) {
        let new_read = read.wrapping_add(1);

        debug_assert_read_not_past_write!(new_read, self.producer.write.load(Ordering::Relaxed));
        debug_assert_monotonic!("read", read, new_read);

        self.consumer.read.store(new_read, Ordering::Release);

        if self.config.enable_metrics {
            self.consumer.metrics.add_committed();
        }
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Splits the ring into its producer and consumer endpoints.
    ///
    /// The handles borrow the ring mutably, so nothing else (including
    /// [`reset`](Ring::reset)) can touch it while they exist. Use
    /// `std::thread::scope` to move them onto two threads.
    pub fn split(&mut self) -> (Producer<'_, T>, Consumer<'_, T>) {
        tracing::debug!(capacity = self.capacity, len = self.len(), "ring split");
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    /// Empties the ring and resets both cursors and shadows to zero.
    ///
    /// Every slot is overwritten with `T::default()`, dropping any values
    /// still held. The exclusive borrow guarantees neither side is active.
    pub fn reset(&mut self) {
        let dropped = self.len();

        *self.producer.write.get_mut() = 0;
        *self.producer.shadow_read.get_mut() = 0;
        self.producer.metrics.clear();

        *self.consumer.read.get_mut() = 0;
        *self.consumer.shadow_write.get_mut() = 0;
        self.consumer.metrics.clear();

        for slot in self.slots.iter_mut() {
            *slot.get_mut() = T::default();
        }

        tracing::debug!(capacity = self.capacity, dropped, "ring reset");
    }
}

impl<T> Ring<T> {
    // ---------------------------------------------------------------------
    // DIAGNOSTICS
    // ---------------------------------------------------------------------

    /// Returns the fixed slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Returns the number of published, unconsumed elements.
    ///
    /// The two cursors are loaded independently, so while both sides are
    /// running the result is a best-effort snapshot that may not match any
    /// single instant. It is always within `0..=capacity`.
    #[inline]
    pub fn len(&self) -> usize {
        // read first: a later load of write can only be larger
        let read = self.consumer.read.load(Ordering::Acquire);
        let write = self.producer.write.load(Ordering::Acquire);
        write.saturating_sub(read).min(self.capacity) as usize
    }

    /// Returns true if no element is published. Approximate like [`len`](Ring::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if every slot is occupied. Approximate like [`len`](Ring::len).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Byte distance between the producer's and the consumer's cursor.
    ///
    /// Exists to verify the cache-line isolation: the value is at least the
    /// platform cache-line size.
    pub fn cursor_distance(&self) -> usize {
        let write = &self.producer.write as *const AtomicU64 as usize;
        let read = &self.consumer.read as *const AtomicU64 as usize;
        write.abs_diff(read)
    }

    /// Returns the configuration this ring was built with.
    #[inline]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            metrics::snapshot(&self.producer.metrics, &self.consumer.metrics)
        } else {
            MetricsSnapshot::default()
        }
    }

    /// Raw pointer to the slot at logical position `pos`.
    #[inline]
    pub(crate) fn slot_ptr(&self, pos: u64) -> *mut T {
        self.slots[(pos & self.mask) as usize].get()
    }
}

impl<T> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity)
            .field("write", &self.producer.write.load(Ordering::Relaxed))
            .field("read", &self.consumer.read.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
