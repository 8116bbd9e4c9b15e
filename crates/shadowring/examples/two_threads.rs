//! One producer thread streams log lines to one consumer thread.
//!
//! Run with: `RUST_LOG=debug cargo run --example two_threads`

use shadowring::{Backoff, Config, PushError, Ring};
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const LINES: usize = 1_000_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("shadowring Two-Thread Example");
    println!("=============================\n");

    let config = Config::new(1000, true); // rounded up to 1024 slots
    let mut ring = Ring::<String>::with_config(config);

    println!("Configuration:");
    println!("  Requested capacity: {}", config.requested_capacity);
    println!("  Ring capacity: {} slots", ring.capacity());
    println!("  Cursor distance: {} bytes", ring.cursor_distance());
    println!("  Lines: {}\n", LINES);

    let start = Instant::now();
    let (mut producer, mut consumer) = ring.split();

    let total_bytes = thread::scope(|s| {
        s.spawn(move || {
            let backoff = Backoff::new();
            for i in 0..LINES {
                let mut line = format!("line {}", i);
                while let Err(PushError(rejected)) = producer.push(line) {
                    line = rejected;
                    backoff.snooze();
                }
                backoff.reset();
            }
        });

        let backoff = Backoff::new();
        let mut received = 0;
        let mut bytes = 0;
        while received < LINES {
            match consumer.acquire_read() {
                Ok(slot) => {
                    bytes += slot.len();
                    slot.commit();
                    received += 1;
                    backoff.reset();
                }
                Err(_) => backoff.snooze(),
            }
        }
        bytes
    });

    let elapsed = start.elapsed();
    let metrics = ring.metrics();

    println!("Results:");
    println!("  Elapsed: {:?}", elapsed);
    println!(
        "  Throughput: {:.2} M lines/sec",
        LINES as f64 / elapsed.as_secs_f64() / 1e6
    );
    println!("  Bytes received: {}", total_bytes);
    println!("  Full rejections: {}", metrics.full_rejections);
    println!("  Empty rejections: {}", metrics.empty_rejections);
    println!("  Producer shadow refreshes: {}", metrics.producer_refreshes);
    println!("  Consumer shadow refreshes: {}", metrics.consumer_refreshes);

    ring.reset();
    assert!(ring.is_empty());
}
