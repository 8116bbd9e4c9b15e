//! Property-based tests for the ring's cursor invariants.
//!
//! A `VecDeque` bounded to the same capacity serves as the reference model;
//! every operation sequence must produce identical observations on both.

use proptest::prelude::*;
use shadowring::{Config, Ring, RingError};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Write(u32),
    Read,
    /// Acquire a write slot, fill it, then drop the guard without committing.
    AbandonWrite(u32),
    /// Acquire a read slot and drop the guard without committing.
    PeekRead,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Write),
        Just(Op::Read),
        any::<u32>().prop_map(Op::AbandonWrite),
        Just(Op::PeekRead),
    ]
}

// =============================================================================
// Capacity rounding
// "capacity is the smallest power of two >= requested, and 0 maps to 1"
// =============================================================================

proptest! {
    #[test]
    fn prop_capacity_is_smallest_power_of_two(requested in 0usize..1 << 20) {
        let capacity = Config::new(requested, false).capacity();
        prop_assert!(capacity.is_power_of_two());
        prop_assert!(capacity >= requested.max(1));
        prop_assert!(capacity / 2 < requested.max(1));
    }

    #[test]
    fn prop_ring_capacity_matches_config(requested in 0usize..5000) {
        let ring = Ring::<u8>::new(requested);
        prop_assert_eq!(ring.capacity(), Config::new(requested, false).capacity());
    }
}

// =============================================================================
// Occupied count and FIFO
// "0 <= len <= capacity after every commit; values come out in commit order"
// =============================================================================

proptest! {
    #[test]
    fn prop_matches_bounded_queue_model(
        requested in 0usize..16,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut ring = Ring::<u32>::new(requested);
        let capacity = ring.capacity();
        let (mut producer, mut consumer) = ring.split();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(v) => {
                    let result = producer.push(v);
                    if model.len() < capacity {
                        prop_assert!(result.is_ok());
                        model.push_back(v);
                    } else {
                        prop_assert_eq!(result.map_err(|e| e.into_inner()), Err(v));
                    }
                }
                Op::Read => {
                    prop_assert_eq!(consumer.pop(), model.pop_front());
                }
                Op::AbandonWrite(v) => match producer.acquire_write() {
                    Ok(mut slot) => {
                        prop_assert!(model.len() < capacity);
                        *slot = v;
                    }
                    Err(e) => {
                        prop_assert_eq!(e, RingError::Full);
                        prop_assert_eq!(model.len(), capacity);
                    }
                },
                Op::PeekRead => match consumer.acquire_read() {
                    Ok(slot) => {
                        prop_assert_eq!(Some(&*slot), model.front());
                    }
                    Err(e) => {
                        prop_assert_eq!(e, RingError::Empty);
                        prop_assert!(model.is_empty());
                    }
                },
            }

            prop_assert_eq!(producer.len(), model.len());
            prop_assert!(consumer.len() <= capacity);
        }
    }

    #[test]
    fn prop_len_tracks_commits(writes in 0usize..64, reads in 0usize..64) {
        let mut ring = Ring::<u64>::new(32);
        let capacity = ring.capacity();
        let (mut producer, mut consumer) = ring.split();

        let mut written = 0;
        for i in 0..writes {
            if producer.push(i as u64).is_ok() {
                written += 1;
            }
        }
        prop_assert_eq!(written, writes.min(capacity));
        prop_assert_eq!(producer.len(), written);

        let mut read = 0;
        for _ in 0..reads {
            if consumer.pop().is_some() {
                read += 1;
            }
        }
        prop_assert_eq!(read, reads.min(written));
        prop_assert_eq!(consumer.len(), written - read);
    }
}

// =============================================================================
// Reset
// "reset returns the ring to its freshly created state"
// =============================================================================

proptest! {
    #[test]
    fn prop_reset_restores_fresh_state(fill in 0usize..20, drain in 0usize..20) {
        let mut ring = Ring::<String>::new(8);
        {
            let (mut producer, mut consumer) = ring.split();
            for i in 0..fill {
                let _ = producer.push(i.to_string());
            }
            for _ in 0..drain {
                consumer.pop();
            }
        }

        ring.reset();
        prop_assert!(ring.is_empty());

        let (mut producer, mut consumer) = ring.split();
        prop_assert_eq!(consumer.acquire_read().err(), Some(RingError::Empty));
        for i in 0..8 {
            prop_assert!(producer.push(i.to_string()).is_ok());
        }
        prop_assert!(producer.push(String::new()).is_err());
        let popped = consumer.pop();
        prop_assert_eq!(popped.as_deref(), Some("0"));
    }
}
