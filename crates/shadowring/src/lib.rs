//! shadowring - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity ring for exactly one producer thread and one consumer
//! thread. Elements are written and read in place through a two-phase
//! acquire/commit protocol; the only synchronization is a pair of monotonic
//! `u64` cursors published with Release stores and observed with Acquire
//! loads.
//!
//! # Key Features
//!
//! - Producer and consumer state in separate cache lines
//! - Shadow cursors: each side caches the other's cursor and reloads it only
//!   when the cached value cannot prove the operation is safe
//! - Consumed slots are reset to `T::default()`, releasing whatever the value
//!   owned (an `Arc`, a `String`, a file handle) right away
//! - No locks, no blocking, no allocation after construction
//!
//! # Example
//!
//! ```
//! use shadowring::{Ring, RingError};
//!
//! let mut ring = Ring::<String>::new(100); // rounded up to 128 slots
//! assert_eq!(ring.capacity(), 128);
//!
//! let (mut producer, mut consumer) = ring.split();
//!
//! // Two-phase write: fill the slot in place, then publish it.
//! let mut slot = producer.acquire_write().unwrap();
//! slot.push_str("hello");
//! slot.commit();
//!
//! // Two-phase read: inspect in place, then release (the slot is cleared).
//! let slot = consumer.acquire_read().unwrap();
//! assert_eq!(&*slot, "hello");
//! slot.commit();
//!
//! assert_eq!(consumer.acquire_read().err(), Some(RingError::Empty));
//! ```
//!
//! Full and Empty are expected conditions: callers retry, optionally with a
//! [`Backoff`].

mod config;
mod error;
mod handle;
mod invariants;
mod metrics;
mod ring;

pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::{PushError, RingError};
pub use handle::{Consumer, Producer, ReadSlot, WriteSlot};
pub use metrics::MetricsSnapshot;
pub use ring::Ring;

/// Spin-then-yield helper for retry loops around `Full`/`Empty`. The ring
/// itself never waits.
pub use crossbeam_utils::Backoff;
