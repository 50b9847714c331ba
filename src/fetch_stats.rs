use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct FetchStats {
    price_requests: AtomicU64,
    price_failures: AtomicU64,
    stats_computations: AtomicU64,
    stats_failures: AtomicU64,
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStats {
    pub const fn new() -> Self {
        Self {
            price_requests: AtomicU64::new(0),
            price_failures: AtomicU64::new(0),
            stats_computations: AtomicU64::new(0),
            stats_failures: AtomicU64::new(0),
        }
    }

    pub fn inc_price_requests(&self) {
        self.price_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_price_failures(&self) {
        self.price_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stats_computations(&self) {
        self.stats_computations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stats_failures(&self) {
        self.stats_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchSnapshot {
        FetchSnapshot {
            price_requests: self.price_requests.load(Ordering::Relaxed),
            price_failures: self.price_failures.load(Ordering::Relaxed),
            stats_computations: self.stats_computations.load(Ordering::Relaxed),
            stats_failures: self.stats_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FetchSnapshot {
    pub price_requests: u64,
    pub price_failures: u64,
    pub stats_computations: u64,
    pub stats_failures: u64,
}

pub static FETCH_STATS: FetchStats = FetchStats::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_counters_snapshot() {
        let stats = FetchStats::new();
        stats.inc_price_requests();
        stats.inc_price_requests();
        stats.inc_price_failures();
        stats.inc_stats_computations();

        let snap = stats.snapshot();
        assert_eq!(snap.price_requests, 2);
        assert_eq!(snap.price_failures, 1);
        assert_eq!(snap.stats_computations, 1);
        assert_eq!(snap.stats_failures, 0);
    }
}
