//! Pacing policy between remote mutation groups.
//!
//! Back-to-back mutations compete with interactive users of the service, so
//! the orchestrator paces itself once before each deletion, creation chain,
//! and update chain. The policy is injected: production sleeps, tests and
//! dry-run don't.

use std::time::Duration;

/// Injectable delay invoked once before each mutation group.
pub trait Pacer {
    fn pace(&self);
}

/// Sleeps a fixed delay on every [`Pacer::pace`] call.
#[derive(Debug, Clone)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        FixedDelayPacer { delay }
    }
}

impl Default for FixedDelayPacer {
    /// One second between mutation groups.
    fn default() -> Self {
        FixedDelayPacer {
            delay: Duration::from_secs(1),
        }
    }
}

impl Pacer for FixedDelayPacer {
    fn pace(&self) {
        std::thread::sleep(self.delay);
    }
}

/// No delay at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pace(&self) {}
}
