//! Miri-compatible tests for detecting undefined behavior.
//!
//! Run with: `cargo +nightly miri test --test miri_tests`
//!
//! These exercise the `UnsafeCell` slot accesses behind both the raw and the
//! handle API with small rings and heap-owning element types, so Miri can
//! catch aliasing violations, leaks and use-after-free.

use shadowring::{Ring, RingError};
use std::sync::Arc;

/// Basic raw two-phase operations.
#[test]
fn miri_raw_acquire_commit() {
    let ring = Ring::<Box<u64>>::new(4);

    unsafe {
        *ring.acquire_write().unwrap() = Box::new(100);
        ring.commit_write();
        *ring.acquire_write().unwrap() = Box::new(200);
        ring.commit_write();

        assert_eq!(**ring.acquire_read().unwrap(), 100);
        ring.commit_read();
        assert_eq!(**ring.acquire_read().unwrap(), 200);
        ring.commit_read();
    }
    assert!(ring.is_empty());
}

/// Fill and drain several times so every slot is reused across wrap-around.
#[test]
fn miri_wrap_around_with_strings() {
    let mut ring = Ring::<String>::new(4);
    let (mut producer, mut consumer) = ring.split();

    for round in 0..3 {
        for i in 0..4 {
            producer.push(format!("{}-{}", round, i)).unwrap();
        }
        assert!(producer.push(String::new()).is_err());

        for i in 0..4 {
            assert_eq!(consumer.pop().unwrap(), format!("{}-{}", round, i));
        }
        assert_eq!(consumer.acquire_read().err(), Some(RingError::Empty));
    }
}

/// Guards dropped without commit leave the ring consistent.
#[test]
fn miri_abandoned_guards() {
    let mut ring = Ring::<Vec<u8>>::new(2);
    let (mut producer, mut consumer) = ring.split();

    {
        let mut slot = producer.acquire_write().unwrap();
        slot.extend_from_slice(b"draft");
    }
    // The abandoned draft is still in the slot and gets replaced.
    producer.push(b"final".to_vec()).unwrap();

    {
        let slot = consumer.acquire_read().unwrap();
        assert_eq!(&slot[..], b"final");
    }
    assert_eq!(consumer.pop().unwrap(), b"final");
}

/// Dropping a ring with unconsumed items releases them.
#[test]
fn miri_drop_with_items() {
    let tracker = Arc::new(());
    {
        let mut ring = Ring::<Option<Arc<()>>>::new(4);
        let (mut producer, mut consumer) = ring.split();
        for _ in 0..3 {
            producer.push(Some(Arc::clone(&tracker))).unwrap();
        }
        consumer.acquire_read().unwrap().commit();
        assert_eq!(Arc::strong_count(&tracker), 3);
    }
    assert_eq!(Arc::strong_count(&tracker), 1);
}

/// Reset drops everything and the ring is usable afterwards.
#[test]
fn miri_reset() {
    let mut ring = Ring::<Box<u32>>::new(2);
    {
        let (mut producer, _consumer) = ring.split();
        producer.push(Box::new(1)).unwrap();
        producer.push(Box::new(2)).unwrap();
    }
    ring.reset();

    let (mut producer, mut consumer) = ring.split();
    producer.push(Box::new(3)).unwrap();
    assert_eq!(consumer.pop().as_deref(), Some(&3));
    assert_eq!(*consumer.pop().unwrap_or_default(), 0);
}

/// Small two-thread exchange for Miri's data race detector.
#[test]
fn miri_two_threads() {
    const N: u32 = 50;
    let mut ring = Ring::<Box<u32>>::new(2);
    let (mut producer, mut consumer) = ring.split();

    std::thread::scope(|s| {
        s.spawn(move || {
            for i in 0..N {
                let mut value = Box::new(i);
                while let Err(err) = producer.push(value) {
                    value = err.into_inner();
                    std::thread::yield_now();
                }
            }
        });

        let mut next = 0;
        while next < N {
            match consumer.pop() {
                Some(v) => {
                    assert_eq!(*v, next);
                    next += 1;
                }
                None => std::thread::yield_now(),
            }
        }
    });
}
