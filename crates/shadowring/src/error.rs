//! Error types for ring operations.
//!
//! Neither condition is a fault: `Full` and `Empty` are ordinary control-flow
//! signals and callers are expected to retry.

use thiserror::Error;

/// Returned by the acquire operations when no slot is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// No free slot for the producer.
    #[error("ring buffer full")]
    Full,

    /// No published slot for the consumer.
    #[error("ring buffer empty")]
    Empty,
}

impl RingError {
    /// Returns `true` if this is the `Full` condition.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Returns `true` if this is the `Empty` condition.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if retrying the operation may succeed. Both conditions
    /// clear as soon as the other side makes progress.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        true
    }
}

/// Returned by [`Producer::push`](crate::Producer::push) when the ring is full.
///
/// Carries the rejected value so ownership goes back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("ring buffer full")]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    /// Recovers the value that could not be pushed.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PushError(..)")
    }
}

impl<T> From<PushError<T>> for RingError {
    fn from(_: PushError<T>) -> Self {
        Self::Full
    }
}
