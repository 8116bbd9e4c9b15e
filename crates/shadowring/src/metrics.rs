use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of a ring's counters.
///
/// All zeros when the ring was built with `enable_metrics = false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub writes_committed: u64,
    pub reads_committed: u64,
    pub full_rejections: u64,
    pub empty_rejections: u64,
    /// Times the producer had to reload the consumer's cursor.
    pub producer_refreshes: u64,
    /// Times the consumer had to reload the producer's cursor.
    pub consumer_refreshes: u64,
}

/// Counters owned by one side of the ring.
///
/// Each side keeps its own instance inside its cache-line group so counting
/// never writes to a line the other side is polling.
#[derive(Debug, Default)]
pub(crate) struct SideMetrics {
    committed: AtomicU64,
    rejected: AtomicU64,
    refreshes: AtomicU64,
}

impl SideMetrics {
    pub(crate) const fn new() -> Self {
        Self {
            committed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn add_committed(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    pub(crate) fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub(crate) fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub(crate) fn clear(&mut self) {
        *self.committed.get_mut() = 0;
        *self.rejected.get_mut() = 0;
        *self.refreshes.get_mut() = 0;
    }
}

/// Combines both sides' counters into one snapshot.
pub(crate) fn snapshot(producer: &SideMetrics, consumer: &SideMetrics) -> MetricsSnapshot {
    MetricsSnapshot {
        writes_committed: producer.committed(),
        reads_committed: consumer.committed(),
        full_rejections: producer.rejected(),
        empty_rejections: consumer.rejected(),
        producer_refreshes: producer.refreshes(),
        consumer_refreshes: consumer.refreshes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_metrics_counts_and_clears() {
        let mut producer = SideMetrics::new();
        let consumer = SideMetrics::new();

        producer.add_committed();
        producer.add_committed();
        producer.add_rejected();
        producer.add_refresh();
        consumer.add_committed();

        let snap = snapshot(&producer, &consumer);
        assert_eq!(snap.writes_committed, 2);
        assert_eq!(snap.full_rejections, 1);
        assert_eq!(snap.producer_refreshes, 1);
        assert_eq!(snap.reads_committed, 1);
        assert_eq!(snap.empty_rejections, 0);

        producer.clear();
        assert_eq!(snapshot(&producer, &consumer).writes_committed, 0);
    }
}
