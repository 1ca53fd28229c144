//! Construction-time configuration for the engine.
//!
//! Every tuning value the engine uses lives on [`EngineConfig`]; the defaults
//! come from `constants.rs` and describe the canonical device. Validation runs
//! once in `FountainEngine::new`, which is the only fallible entry point.

use glam::Vec3;
use thiserror::Error;

use crate::constants::*;
use crate::vessel::{Vessel, VesselLevels};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial level for {vessel} must be within [0, 1], got {value}")]
    InitialLevelOutOfRange { vessel: Vessel, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite and strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("particle pool size must be at least 1")]
    EmptyParticlePool,
    #[error("ripple buffer capacity must be at least 1")]
    EmptyRippleBuffer,
    #[error("splash count range {min}..={max} is empty")]
    EmptySplashRange { min: usize, max: usize },
    #[error("flip thresholds out of order: empty ({empty}) must be below full ({full})")]
    ThresholdOrder { empty: f32, full: f32 },
    #[error("basin geometry has non-finite or out-of-range fields: {0:?}")]
    InvalidGeometry(BasinGeometry),
}

/// Rate constants for the transfer engine.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferConfig {
    pub rate_per_sec: f32,
    pub bottom_pickup_boost: f32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: TRANSFER_RATE_PER_SEC,
            bottom_pickup_boost: BOTTOM_PICKUP_BOOST,
        }
    }
}

/// Coefficients of the pressure model.
#[derive(Clone, Debug, PartialEq)]
pub struct PressureConfig {
    pub sealed_factor: f32,
    pub leak_factor: f32,
    pub head_gain: f32,
    pub inflow_gain: f32,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            sealed_factor: PRESSURE_SEALED_FACTOR,
            leak_factor: PRESSURE_LEAK_FACTOR,
            head_gain: PRESSURE_HEAD_GAIN,
            inflow_gain: PRESSURE_INFLOW_GAIN,
        }
    }
}

/// Particle pool, jet emission, splash and ripple parameters.
///
/// Ranges are `[min, max]` pairs sampled uniformly.
#[derive(Clone, Debug, PartialEq)]
pub struct JetConfig {
    pub pool_size: usize,
    pub gate_pressure: f32,
    pub min_spawn: usize,
    pub spawn_flow_bias: f32,
    pub spawn_gain: f32,
    pub speed_base: f32,
    pub speed_pressure_gain: f32,
    pub speed_jitter: f32,
    pub lateral_jitter: f32,
    pub center_bias: f32,
    pub lifetime_sec: f32,
    pub lifetime_jitter_sec: f32,
    pub gravity: f32,
    pub splash_min: usize,
    pub splash_max: usize,
    pub splash_radial_speed: [f32; 2],
    pub splash_up_speed: [f32; 2],
    pub splash_lifetime_sec: [f32; 2],
    pub ripple_capacity: usize,
    pub ripple_max_age_sec: f64,
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            pool_size: PARTICLE_POOL_SIZE,
            gate_pressure: JET_GATE_PRESSURE,
            min_spawn: JET_MIN_SPAWN,
            spawn_flow_bias: JET_SPAWN_FLOW_BIAS,
            spawn_gain: JET_SPAWN_GAIN,
            speed_base: JET_SPEED_BASE,
            speed_pressure_gain: JET_SPEED_PRESSURE_GAIN,
            speed_jitter: JET_SPEED_JITTER,
            lateral_jitter: JET_LATERAL_JITTER,
            center_bias: JET_CENTER_BIAS,
            lifetime_sec: JET_LIFETIME_SEC,
            lifetime_jitter_sec: JET_LIFETIME_JITTER_SEC,
            gravity: GRAVITY,
            splash_min: SPLASH_MIN_COUNT,
            splash_max: SPLASH_MAX_COUNT,
            splash_radial_speed: SPLASH_RADIAL_SPEED,
            splash_up_speed: SPLASH_UP_SPEED,
            splash_lifetime_sec: SPLASH_LIFETIME_SEC,
            ripple_capacity: RIPPLE_CAPACITY,
            ripple_max_age_sec: RIPPLE_MAX_AGE_SEC,
        }
    }
}

/// Terminal thresholds and flip timing.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleConfig {
    pub full_threshold: f32,
    pub empty_threshold: f32,
    pub flip_duration_sec: f64,
    /// Put missing canonical paths back on `reset()`.
    pub reseed_canonical_on_reset: bool,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            full_threshold: FLIP_FULL_THRESHOLD,
            empty_threshold: FLIP_EMPTY_THRESHOLD,
            flip_duration_sec: FLIP_DURATION_SEC,
            reseed_canonical_on_reset: true,
        }
    }
}

/// Basin contract supplied by the renderer: where droplets start, land and
/// get culled. Only `x`/`z` of `center` matter for radial tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasinGeometry {
    pub center: Vec3,
    pub radius: f32,
    pub floor_y: f32,
    pub surface_y: f32,
    pub nozzle: Vec3,
    pub cull_radius_scale: f32,
    pub near_surface_margin: f32,
}

impl BasinGeometry {
    /// Copy of `self` with every non-finite field taken from `fallback`,
    /// the radius raised to `MIN_BASIN_RADIUS` and the cull scale and
    /// surface margin kept non-negative.
    pub fn sanitized(self, fallback: &BasinGeometry) -> Self {
        let scalar = |value: f32, prev: f32| if value.is_finite() { value } else { prev };
        let point = |value: Vec3, prev: Vec3| if value.is_finite() { value } else { prev };
        Self {
            center: point(self.center, fallback.center),
            radius: scalar(self.radius, fallback.radius).max(MIN_BASIN_RADIUS),
            floor_y: scalar(self.floor_y, fallback.floor_y),
            surface_y: scalar(self.surface_y, fallback.surface_y),
            nozzle: point(self.nozzle, fallback.nozzle),
            cull_radius_scale: scalar(self.cull_radius_scale, fallback.cull_radius_scale).max(0.0),
            near_surface_margin: scalar(self.near_surface_margin, fallback.near_surface_margin)
                .max(0.0),
        }
    }
}

impl Default for BasinGeometry {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: BASIN_RADIUS,
            floor_y: BASIN_FLOOR_Y,
            surface_y: BASIN_SURFACE_Y,
            nozzle: Vec3::from(NOZZLE_POSITION),
            cull_radius_scale: CULL_RADIUS_SCALE,
            near_surface_margin: NEAR_SURFACE_MARGIN,
        }
    }
}

/// Full engine configuration record.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub initial_top: f32,
    pub initial_basin: f32,
    pub initial_reservoir: f32,
    pub initial_flow_intensity: f32,
    pub max_dt_sec: f32,
    pub transfer: TransferConfig,
    pub pressure: PressureConfig,
    pub jet: JetConfig,
    pub cycle: CycleConfig,
    pub geometry: BasinGeometry,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_top: INITIAL_LEVEL_TOP,
            initial_basin: INITIAL_LEVEL_BASIN,
            initial_reservoir: INITIAL_LEVEL_RESERVOIR,
            initial_flow_intensity: DEFAULT_FLOW_INTENSITY,
            max_dt_sec: MAX_TICK_DT_SEC,
            transfer: TransferConfig::default(),
            pressure: PressureConfig::default(),
            jet: JetConfig::default(),
            cycle: CycleConfig::default(),
            geometry: BasinGeometry::default(),
            seed: DEFAULT_SEED,
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl EngineConfig {
    /// Levels the engine starts from and returns to on `reset()`.
    pub fn initial_levels(&self) -> VesselLevels {
        VesselLevels::new(self.initial_top, self.initial_basin, self.initial_reservoir)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (vessel, value) in [
            (Vessel::Top, self.initial_top),
            (Vessel::Basin, self.initial_basin),
            (Vessel::Reservoir, self.initial_reservoir),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InitialLevelOutOfRange { vessel, value });
            }
        }
        positive("max_dt_sec", self.max_dt_sec as f64)?;

        non_negative("transfer.rate_per_sec", self.transfer.rate_per_sec)?;
        non_negative("transfer.bottom_pickup_boost", self.transfer.bottom_pickup_boost)?;

        non_negative("pressure.sealed_factor", self.pressure.sealed_factor)?;
        non_negative("pressure.leak_factor", self.pressure.leak_factor)?;
        non_negative("pressure.head_gain", self.pressure.head_gain)?;
        non_negative("pressure.inflow_gain", self.pressure.inflow_gain)?;

        let jet = &self.jet;
        if jet.pool_size == 0 {
            return Err(ConfigError::EmptyParticlePool);
        }
        if jet.ripple_capacity == 0 {
            return Err(ConfigError::EmptyRippleBuffer);
        }
        if jet.splash_min > jet.splash_max {
            return Err(ConfigError::EmptySplashRange {
                min: jet.splash_min,
                max: jet.splash_max,
            });
        }
        non_negative("jet.gate_pressure", jet.gate_pressure)?;
        non_negative("jet.spawn_flow_bias", jet.spawn_flow_bias)?;
        non_negative("jet.spawn_gain", jet.spawn_gain)?;
        non_negative("jet.speed_pressure_gain", jet.speed_pressure_gain)?;
        non_negative("jet.speed_base", jet.speed_base)?;
        non_negative("jet.speed_jitter", jet.speed_jitter)?;
        non_negative("jet.lateral_jitter", jet.lateral_jitter)?;
        non_negative("jet.center_bias", jet.center_bias)?;
        non_negative("jet.gravity", jet.gravity)?;
        non_negative("jet.lifetime_jitter_sec", jet.lifetime_jitter_sec)?;
        positive("jet.lifetime_sec", jet.lifetime_sec as f64)?;
        positive("jet.ripple_max_age_sec", jet.ripple_max_age_sec)?;
        for (name, [lo, hi]) in [
            ("jet.splash_radial_speed", jet.splash_radial_speed),
            ("jet.splash_up_speed", jet.splash_up_speed),
            ("jet.splash_lifetime_sec", jet.splash_lifetime_sec),
        ] {
            non_negative(name, lo)?;
            if !(hi.is_finite() && hi >= lo) {
                return Err(ConfigError::Negative { name, value: hi });
            }
        }

        let cycle = &self.cycle;
        if !cycle.empty_threshold.is_finite()
            || !cycle.full_threshold.is_finite()
            || cycle.empty_threshold >= cycle.full_threshold
        {
            return Err(ConfigError::ThresholdOrder {
                empty: cycle.empty_threshold,
                full: cycle.full_threshold,
            });
        }
        positive("cycle.flip_duration_sec", cycle.flip_duration_sec)?;
        positive("geometry.radius", self.geometry.radius as f64)?;
        if self.geometry.sanitized(&BasinGeometry::default()) != self.geometry {
            return Err(ConfigError::InvalidGeometry(self.geometry));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_initial_level() {
        let cfg = EngineConfig {
            initial_basin: 1.2,
            ..EngineConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InitialLevelOutOfRange {
                vessel: Vessel::Basin,
                value: 1.2
            })
        );
    }

    #[test]
    fn rejects_empty_pools_and_bad_thresholds() {
        let mut cfg = EngineConfig::default();
        cfg.jet.pool_size = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyParticlePool));

        let mut cfg = EngineConfig::default();
        cfg.jet.ripple_capacity = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyRippleBuffer));

        let mut cfg = EngineConfig::default();
        cfg.cycle.empty_threshold = 0.99;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_nan_jet_gains() {
        for field in ["spawn_gain", "spawn_flow_bias", "speed_pressure_gain"] {
            let mut cfg = EngineConfig::default();
            match field {
                "spawn_gain" => cfg.jet.spawn_gain = f32::NAN,
                "spawn_flow_bias" => cfg.jet.spawn_flow_bias = -1.0,
                _ => cfg.jet.speed_pressure_gain = f32::NAN,
            }
            assert!(
                matches!(cfg.validate(), Err(ConfigError::Negative { name, .. }) if name.ends_with(field)),
                "{field} accepted"
            );
        }
    }

    #[test]
    fn rejects_non_finite_geometry() {
        let mut cfg = EngineConfig::default();
        cfg.geometry.surface_y = f32::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGeometry(_))));

        let mut cfg = EngineConfig::default();
        cfg.geometry.nozzle = Vec3::new(0.0, f32::INFINITY, 0.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGeometry(_))));

        let mut cfg = EngineConfig::default();
        cfg.geometry.cull_radius_scale = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_nan_thresholds() {
        let mut cfg = EngineConfig::default();
        cfg.cycle.full_threshold = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn sanitized_geometry_keeps_previous_finite_values() {
        let previous = BasinGeometry::default();
        let fixed = BasinGeometry {
            radius: 0.0,
            floor_y: f32::NAN,
            nozzle: Vec3::splat(f32::NAN),
            surface_y: 0.2,
            ..previous
        }
        .sanitized(&previous);
        assert_eq!(fixed.radius, MIN_BASIN_RADIUS);
        assert_eq!(fixed.floor_y, previous.floor_y);
        assert_eq!(fixed.nozzle, previous.nozzle);
        assert_eq!(fixed.surface_y, 0.2);
        assert_eq!(previous.sanitized(&previous), previous);
    }

    #[test]
    fn rejects_nan_rate() {
        let mut cfg = EngineConfig::default();
        cfg.transfer.rate_per_sec = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Negative {
                name: "transfer.rate_per_sec",
                ..
            })
        ));
    }
}
