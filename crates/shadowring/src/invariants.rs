//! Debug assertion macros for ring cursor invariants.
//!
//! Only active in debug builds (`#[cfg(debug_assertions)]`), so the release
//! hot path pays nothing. They catch most contract misuse, such as committing
//! without a matching acquire.

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the occupied count does not exceed capacity.
///
/// **Invariant**: `0 ≤ (write - read) ≤ capacity`
///
/// Used in: `commit_write()` after computing the new write cursor
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded count violated: {} occupied exceeds capacity {} (commit_write without acquire_write?)",
            $count,
            $capacity
        )
    };
}

/// Assert that the read cursor does not advance past the write cursor.
///
/// **Invariant**: `read ≤ write` (after commit)
///
/// Used in: `commit_read()` before publishing the new read cursor
macro_rules! debug_assert_read_not_past_write {
    ($new_read:expr, $write:expr) => {
        debug_assert!(
            $new_read <= $write,
            "read cursor {} advanced beyond write cursor {} (commit_read without acquire_read?)",
            $new_read,
            $write
        )
    };
}

// =============================================================================
// Monotonic Progress
// =============================================================================

/// Assert that a cursor only increases.
///
/// Used in: `commit_write()` and `commit_read()`
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new > $old,
            "{} cursor did not advance: {} -> {}",
            $name,
            $old,
            $new
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_read_not_past_write;
