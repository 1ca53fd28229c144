// Default tuning constants for the fountain engine.
//
// `EngineConfig::default()` assembles these; hosts override fields on the
// config record instead of touching the constants.

// Canonical device fill (asymmetric to match the physical reference device)
pub const INITIAL_LEVEL_TOP: f32 = 0.75;
pub const INITIAL_LEVEL_BASIN: f32 = 1.0;
pub const INITIAL_LEVEL_RESERVOIR: f32 = 0.26;

// Tick handling
pub const DEFAULT_FLOW_INTENSITY: f32 = 0.5;
pub const MAX_TICK_DT_SEC: f32 = 0.1; // longer frames are treated as this long

// Transfer engine
pub const TRANSFER_RATE_PER_SEC: f32 = 0.12; // fraction of capacity per second at full intensity
pub const BOTTOM_PICKUP_BOOST: f32 = 1.6; // submerged intake multiplier

// Pressure model
pub const PRESSURE_SEALED_FACTOR: f32 = 1.0; // air line connected
pub const PRESSURE_LEAK_FACTOR: f32 = 0.2; // air line missing, weak coupling only
pub const PRESSURE_HEAD_GAIN: f32 = 2.0;
pub const PRESSURE_INFLOW_GAIN: f32 = 0.5;

// Particle pool and jet emission
pub const PARTICLE_POOL_SIZE: usize = 400;
pub const JET_GATE_PRESSURE: f32 = 0.05; // no jet at or below this pressure
pub const JET_MIN_SPAWN: usize = 25;
pub const JET_SPAWN_FLOW_BIAS: f32 = 0.5;
pub const JET_SPAWN_GAIN: f32 = 120.0;
pub const JET_SPEED_BASE: f32 = 1.6;
pub const JET_SPEED_PRESSURE_GAIN: f32 = 4.2;
pub const JET_SPEED_JITTER: f32 = 0.3; // +-30%
pub const JET_LATERAL_JITTER: f32 = 0.06;
pub const JET_CENTER_BIAS: f32 = 0.22; // pull toward basin center
pub const JET_LIFETIME_SEC: f32 = 2.2;
pub const JET_LIFETIME_JITTER_SEC: f32 = 0.4;
pub const GRAVITY: f32 = 9.8;

// Splash bursts
pub const SPLASH_MIN_COUNT: usize = 6;
pub const SPLASH_MAX_COUNT: usize = 11;
pub const SPLASH_RADIAL_SPEED: [f32; 2] = [0.4, 1.1];
pub const SPLASH_UP_SPEED: [f32; 2] = [0.8, 1.6];
pub const SPLASH_LIFETIME_SEC: [f32; 2] = [0.25, 0.55];

// Ripple ring buffer
pub const RIPPLE_CAPACITY: usize = 6;
pub const RIPPLE_MAX_AGE_SEC: f64 = 4.0;

// Flip cycle
pub const FLIP_FULL_THRESHOLD: f32 = 0.98; // reservoir considered full
pub const FLIP_EMPTY_THRESHOLD: f32 = 0.02; // basin considered empty
pub const FLIP_DURATION_SEC: f64 = 1.6;

// Basin geometry defaults (world units, y up)
pub const BASIN_RADIUS: f32 = 1.0;
pub const MIN_BASIN_RADIUS: f32 = 1e-3; // smaller radii are raised to this
pub const BASIN_FLOOR_Y: f32 = -0.45;
pub const BASIN_SURFACE_Y: f32 = 0.0;
pub const NOZZLE_POSITION: [f32; 3] = [0.0, 1.1, 0.0];
pub const CULL_RADIUS_SCALE: f32 = 1.15; // droplets beyond radius * scale are culled
pub const NEAR_SURFACE_MARGIN: f32 = 0.05;

pub const DEFAULT_SEED: u64 = 42;
