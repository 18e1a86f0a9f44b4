//! Sleep abstraction for the scheduler.
//!
//! The inter-cycle pause is the daemon's only idle time; abstracting it
//! lets loop tests run thousands of simulated cycles instantly. The
//! scheduler sleeps in one-second slices so an interrupt lands within a
//! second rather than at the end of a five-minute interval.

use std::time::Duration;

/// Trait for sleeping between cycles.
pub trait Sleeper: Send + Sync {
    /// Sleep for the specified number of seconds.
    fn sleep_sec(&self, seconds: u64);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSleeper;

impl Sleeper for RealSleeper {
    fn sleep_sec(&self, seconds: u64) {
        std::thread::sleep(Duration::from_secs(seconds));
    }
}

/// Mock sleeper that returns immediately and counts requested seconds.
#[derive(Debug, Default, Clone)]
pub struct MockSleeper {
    slept: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total seconds of sleep requested so far.
    pub fn total_slept_sec(&self) -> u64 {
        self.slept.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Sleeper for MockSleeper {
    fn sleep_sec(&self, seconds: u64) {
        self.slept
            .fetch_add(seconds, std::sync::atomic::Ordering::SeqCst);
    }
}
