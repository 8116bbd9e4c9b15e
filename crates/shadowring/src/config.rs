/// Configuration for [`Ring`](crate::Ring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Requested number of slots. Rounded up to a power of two (minimum 1).
    pub requested_capacity: usize,
    /// Enable metrics collection (one extra branch per commit)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(requested_capacity: usize, enable_metrics: bool) -> Self {
        Self {
            requested_capacity,
            enable_metrics,
        }
    }

    /// Returns the actual slot count: the smallest power of two that is
    /// `>= requested_capacity`. A request of `0` yields `1`.
    ///
    /// Requests above the largest representable power of two saturate to it.
    #[inline]
    pub const fn capacity(&self) -> usize {
        round_up_power_of_two(self.requested_capacity)
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity() - 1
    }

    /// Sets whether metrics are collected.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requested_capacity: 1024,
            enable_metrics: false,
        }
    }
}

const MAX_CAPACITY: usize = 1 << (usize::BITS - 1);

const fn round_up_power_of_two(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    if n > MAX_CAPACITY {
        return MAX_CAPACITY;
    }
    n.next_power_of_two()
}

/// Low latency configuration (256 slots, stays resident in L1 for small `T`)
pub const LOW_LATENCY_CONFIG: Config = Config::new(256, false);

/// High throughput configuration (64K slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 16, false);
