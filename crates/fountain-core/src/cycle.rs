//! Flip/reset state machine.
//!
//! `Running -> Flipping` when the reservoir is full or the basin is empty.
//! `Flipping -> Running` once the transition window has elapsed on the clock.
//! `reset()` parks the controller in `Idle`, which the next tick leaves for
//! `Running` before doing anything else.

use crate::config::CycleConfig;
use crate::vessel::{Vessel, VesselLevels};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePhase {
    Running,
    Flipping,
    Idle,
}

/// Outcome of polling the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleEvent {
    None,
    FlipCompleted,
}

#[derive(Clone, Debug)]
pub struct CycleController {
    config: CycleConfig,
    phase: CyclePhase,
    flip_started_at: f64,
    active: bool,
    flip_count: u32,
}

impl CycleController {
    pub fn new(config: CycleConfig) -> Self {
        Self {
            config,
            phase: CyclePhase::Running,
            flip_started_at: 0.0,
            active: true,
            flip_count: 0,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn is_flipping(&self) -> bool {
        self.phase == CyclePhase::Flipping
    }

    /// False only while a flip is in progress.
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn flip_count(&self) -> u32 {
        self.flip_count
    }

    pub fn flip_duration(&self) -> f64 {
        self.config.flip_duration_sec
    }

    /// Reservoir full or basin empty.
    pub fn is_terminal(&self, levels: &VesselLevels) -> bool {
        levels.get(Vessel::Reservoir) >= self.config.full_threshold
            || levels.get(Vessel::Basin) <= self.config.empty_threshold
    }

    /// Start the transition at absolute time `now`. No-op while flipping.
    pub fn begin_flip(&mut self, now: f64) -> bool {
        if self.is_flipping() {
            return false;
        }
        self.phase = CyclePhase::Flipping;
        self.flip_started_at = now;
        self.active = false;
        true
    }

    /// Transition progress in [0, 1]; 0 outside a flip.
    pub fn progress(&self, now: f64) -> f32 {
        if !self.is_flipping() {
            return 0.0;
        }
        let elapsed = (now - self.flip_started_at).max(0.0);
        (elapsed / self.config.flip_duration_sec).min(1.0) as f32
    }

    /// Complete the flip once the window has elapsed. The caller swaps the
    /// levels and clears pressure on `FlipCompleted`.
    pub fn poll(&mut self, now: f64) -> CycleEvent {
        if self.is_flipping() && self.progress(now) >= 1.0 {
            self.phase = CyclePhase::Running;
            self.active = true;
            self.flip_count += 1;
            CycleEvent::FlipCompleted
        } else {
            CycleEvent::None
        }
    }

    /// Leave `Idle`; called at the start of each tick.
    pub fn resume(&mut self) {
        if self.phase == CyclePhase::Idle {
            self.phase = CyclePhase::Running;
        }
    }

    /// Abandon any flip in progress.
    pub fn reset(&mut self) {
        self.phase = CyclePhase::Idle;
        self.flip_started_at = 0.0;
        self.active = true;
        self.flip_count = 0;
    }
}
