use std::cell::Cell;
use std::rc::Rc;

use instant::Instant;

/// Absolute time source used for the flip transition.
///
/// Progress is always derived from absolute timestamps, so a host that stops
/// ticking for a while resumes with the correct progress.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin.
    fn now_sec(&self) -> f64;
}

/// Monotonic wall clock; `instant` keeps this working under wasm.
#[derive(Clone, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_sec(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually driven clock. Clones share the same time, so a test can keep a
/// handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_sec: f64) {
        self.now.set(now_sec);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now_sec(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        assert_eq!(clock.now_sec(), 0.0);
        handle.set(10.0);
        assert_eq!(clock.now_sec(), 10.0);
        clock.advance(0.5);
        assert_eq!(handle.now_sec(), 10.5);
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let first = clock.now_sec();
        assert!(first >= 0.0);
        assert!(clock.now_sec() >= first);
    }
}
