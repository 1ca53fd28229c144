use crate::clock::{Clock, WallClock};
use crate::config::{BasinGeometry, ConfigError, EngineConfig};
use crate::cycle::{CycleController, CycleEvent, CyclePhase};
use crate::jet::{JetSystem, Particle, ParticleSnapshot};
use crate::pressure::compute_pressure;
use crate::ripple::RippleEvent;
use crate::status::{percent, Status};
use crate::topology::{FlowPath, FlowTopology, PathHandle, PathKind, PickupMode};
use crate::transfer::TransferEngine;
use crate::vessel::{clamp01, Vessel, VesselLevels};

/// Three-vessel fountain simulation driven one frame at a time.
///
/// Each `advance(dt)` runs, in order: water transfer, pressure, jet emission,
/// particle integration with splash/ripple recording, and the flip check.
/// While a flip is in progress only particles keep moving.
///
/// No per-frame operation fails: out-of-range inputs are clamped and levels
/// are re-clamped after every mutation.
///
/// Typical usage:
/// - Construct with `FountainEngine::new(EngineConfig::default())`
/// - Call `advance(dt)` once per animation frame
/// - Read `status()`, `particle_snapshots()` and `ripple_events()` to render
/// - Use `connect`, `disconnect_paths_for`, `flip` and `reset` from the UI
pub struct FountainEngine<C: Clock = WallClock> {
    config: EngineConfig,
    clock: C,
    levels: VesselLevels,
    topology: FlowTopology,
    transfer: TransferEngine,
    jet: JetSystem,
    cycle: CycleController,
    geometry: BasinGeometry,
    pressure: f32,
    flow_intensity: f32,
    sim_time: f64,
}

impl FountainEngine<WallClock> {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, WallClock::new())
    }
}

impl<C: Clock> FountainEngine<C> {
    /// Construct with an explicit time source for the flip transition.
    pub fn with_clock(config: EngineConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = Self {
            levels: config.initial_levels(),
            topology: FlowTopology::canonical(),
            transfer: TransferEngine::new(config.transfer.clone()),
            jet: JetSystem::new(config.jet.clone(), config.seed),
            cycle: CycleController::new(config.cycle.clone()),
            geometry: config.geometry,
            pressure: 0.0,
            flow_intensity: clamp01(config.initial_flow_intensity),
            sim_time: 0.0,
            clock,
            config,
        };
        log::info!(
            "[engine] top={:.2} basin={:.2} reservoir={:.2} pool={} seed={}",
            engine.levels.get(Vessel::Top),
            engine.levels.get(Vessel::Basin),
            engine.levels.get(Vessel::Reservoir),
            engine.config.jet.pool_size,
            engine.config.seed
        );
        Ok(engine)
    }

    /// Clamp a frame delta into `[0, max_dt]`; NaN counts as no time.
    fn sanitize_dt(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, self.config.max_dt_sec)
        }
    }

    /// Advance the simulation by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = self.sanitize_dt(dt);
        self.sim_time += dt as f64;
        let now = self.clock.now_sec();
        self.cycle.resume();

        let flipping = self.cycle.is_flipping();
        if !flipping {
            self.transfer
                .advance(&mut self.levels, &self.topology, dt, self.flow_intensity);
            self.pressure = self.compute_pressure();
            if dt > 0.0 {
                self.jet.spawn_jet(
                    &self.topology,
                    self.pressure,
                    self.flow_intensity,
                    &self.geometry,
                );
            }
        }
        self.jet
            .advance_particles(dt, &self.geometry, self.sim_time);

        if flipping {
            if self.cycle.poll(now) == CycleEvent::FlipCompleted {
                self.complete_flip();
            }
        } else if self.cycle.is_terminal(&self.levels) {
            log::info!(
                "[cycle] terminal state reached (basin={:.3} reservoir={:.3})",
                self.levels.get(Vessel::Basin),
                self.levels.get(Vessel::Reservoir)
            );
            self.start_flip(now);
        }
    }

    /// Pressure for the current levels and topology, without storing it.
    pub fn compute_pressure(&self) -> f32 {
        compute_pressure(
            &self.levels,
            self.topology.is_connected(PathKind::AirLine),
            &self.config.pressure,
        )
    }

    fn start_flip(&mut self, now: f64) {
        if self.cycle.begin_flip(now) {
            log::info!(
                "[cycle] flip started ({:.2}s transition)",
                self.cycle.flip_duration()
            );
        }
    }

    fn complete_flip(&mut self) {
        self.levels.swap(Vessel::Basin, Vessel::Reservoir);
        self.pressure = 0.0;
        log::info!(
            "[cycle] flip #{} complete (basin={:.3} reservoir={:.3})",
            self.cycle.flip_count(),
            self.levels.get(Vessel::Basin),
            self.levels.get(Vessel::Reservoir)
        );
    }

    /// Begin a flip now. No-op while one is already running.
    pub fn flip(&mut self) {
        let now = self.clock.now_sec();
        self.start_flip(now);
    }

    /// Restore the configured start state, abandoning any flip in progress.
    pub fn reset(&mut self) {
        self.levels = self.config.initial_levels();
        self.pressure = 0.0;
        self.sim_time = 0.0;
        self.cycle.reset();
        let removed = self.topology.clear_user_paths();
        if self.config.cycle.reseed_canonical_on_reset {
            self.topology.seed_canonical();
        }
        self.jet.reset(self.config.seed);
        log::info!("[cycle] reset (removed {removed} user paths)");
    }

    /// Set the flow slider; clamped into [0, 1], NaN becomes 0.
    pub fn set_flow_intensity(&mut self, value: f32) {
        self.flow_intensity = clamp01(value);
    }

    pub fn flow_intensity(&self) -> f32 {
        self.flow_intensity
    }

    /// Place a vessel level directly (clamped). Used for scenario setup.
    pub fn set_level(&mut self, vessel: Vessel, fraction: f32) {
        self.levels.set(vessel, fraction);
    }

    pub fn level(&self, vessel: Vessel) -> f32 {
        self.levels.get(vessel)
    }

    pub fn levels(&self) -> &VesselLevels {
        &self.levels
    }

    pub fn total_water(&self) -> f32 {
        self.levels.total()
    }

    /// Pressure as of the last tick.
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn connect(&mut self, from: Vessel, to: Vessel, pickup: PickupMode) -> Option<PathHandle> {
        self.topology.connect(from, to, pickup)
    }

    pub fn disconnect(&mut self, handle: PathHandle) -> bool {
        self.topology.disconnect(handle)
    }

    pub fn disconnect_paths_for(&mut self, vessel: Vessel) {
        let removed = self.topology.disconnect_paths_for(vessel);
        log::debug!("[topology] removed {removed} paths touching {vessel}");
    }

    pub fn is_connected(&self, kind: PathKind) -> bool {
        self.topology.is_connected(kind)
    }

    /// Registered paths in evaluation order.
    pub fn paths(&self) -> impl Iterator<Item = &FlowPath> {
        self.topology.iter()
    }

    /// Replace the basin contract. Non-finite fields keep their previous
    /// value and the radius is held above `MIN_BASIN_RADIUS`.
    pub fn set_basin_geometry(&mut self, geometry: BasinGeometry) {
        self.geometry = geometry.sanitized(&self.geometry);
    }

    pub fn basin_geometry(&self) -> &BasinGeometry {
        &self.geometry
    }

    pub fn cycle_phase(&self) -> CyclePhase {
        self.cycle.phase()
    }

    pub fn is_flipping(&self) -> bool {
        self.cycle.is_flipping()
    }

    /// Flip transition progress in [0, 1], recomputed from the clock.
    pub fn flip_progress(&self) -> f32 {
        self.cycle.progress(self.clock.now_sec())
    }

    pub fn flip_duration(&self) -> f64 {
        self.cycle.flip_duration()
    }

    pub fn flip_count(&self) -> u32 {
        self.cycle.flip_count()
    }

    /// Simulated seconds since construction or the last reset.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn status(&self) -> Status {
        Status {
            level_top: percent(self.levels.get(Vessel::Top)),
            level_basin: percent(self.levels.get(Vessel::Basin)),
            level_reservoir: percent(self.levels.get(Vessel::Reservoir)),
            pressure: percent(self.pressure),
            active: self.cycle.active(),
        }
    }

    /// Ripple events, most recent first. Reading does not consume them.
    pub fn ripple_events(&self) -> Vec<RippleEvent> {
        self.jet.ripples().iter().copied().collect()
    }

    /// One snapshot per pool slot, dead slots included.
    pub fn particle_snapshots(&self) -> Vec<ParticleSnapshot> {
        self.jet.snapshots()
    }

    pub fn particles(&self) -> &[Particle] {
        self.jet.particles()
    }

    pub fn alive_particles(&self) -> usize {
        self.jet.alive_count()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
