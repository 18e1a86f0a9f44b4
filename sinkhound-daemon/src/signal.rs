//! Interrupt handling for the daemon loop.
//!
//! The scheduler has exactly two states, running and stopped, and the only
//! transition is an external interrupt. `ShutdownFlag` registers a SIGINT
//! handler that flips an atomic; the loop polls it between cycles and
//! between sleep slices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for checking whether the loop should stop.
pub trait ShutdownCheck: Send + Sync {
    fn should_stop(&self) -> bool;
}

/// Interrupt flag backed by a SIGINT handler.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownFlag {
    /// Create the flag and register the SIGINT handler. Registration
    /// failure (a handler already installed) leaves a flag that can still
    /// be triggered programmatically.
    pub fn new() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        let _ = ctrlc::set_handler(move || {
            flag_clone.store(true, Ordering::SeqCst);
        });

        Self { flag }
    }

    /// Create a flag without registering a handler, for tests.
    pub fn manual() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request shutdown programmatically.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl ShutdownCheck for ShutdownFlag {
    fn should_stop(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Checker that never requests shutdown.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverShutdown;

impl ShutdownCheck for NeverShutdown {
    fn should_stop(&self) -> bool {
        false
    }
}

/// Checker that requests shutdown immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysShutdown;

impl ShutdownCheck for AlwaysShutdown {
    fn should_stop(&self) -> bool {
        true
    }
}

/// Checker that allows a fixed number of polls before stopping, so loop
/// tests can run an exact number of cycles.
#[derive(Debug, Clone)]
pub struct CountdownShutdown {
    remaining: Arc<std::sync::atomic::AtomicU64>,
}

impl CountdownShutdown {
    pub fn after(polls: u64) -> Self {
        Self {
            remaining: Arc::new(std::sync::atomic::AtomicU64::new(polls)),
        }
    }
}

impl ShutdownCheck for CountdownShutdown {
    fn should_stop(&self) -> bool {
        let prev = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some(v.saturating_sub(1))
            })
            .unwrap_or(0);
        prev == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_flag_starts_clear() {
        let flag = ShutdownFlag::manual();
        assert!(!flag.should_stop());
    }

    #[test]
    fn test_trigger_sets_flag() {
        let flag = ShutdownFlag::manual();
        flag.trigger();
        assert!(flag.should_stop());
    }

    #[test]
    fn test_clone_shares_state() {
        let flag1 = ShutdownFlag::manual();
        let flag2 = flag1.clone();
        flag1.trigger();
        assert!(flag2.should_stop());
    }

    #[test]
    fn test_never_shutdown() {
        let checker = NeverShutdown;
        assert!(!checker.should_stop());
        assert!(!checker.should_stop());
    }

    #[test]
    fn test_always_shutdown() {
        let checker = AlwaysShutdown;
        assert!(checker.should_stop());
    }

    #[test]
    fn test_countdown_shutdown() {
        let checker = CountdownShutdown::after(2);
        assert!(!checker.should_stop());
        assert!(!checker.should_stop());
        assert!(checker.should_stop());
        assert!(checker.should_stop());
    }

    #[test]
    fn test_shutdown_check_trait_object() {
        let checker: Box<dyn ShutdownCheck> = Box::new(NeverShutdown);
        assert!(!checker.should_stop());
    }
}
