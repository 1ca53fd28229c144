//! Headless tick driver: runs the fountain at a fixed frame rate and logs the
//! status readout once per second. Useful for watching full flip cycles
//! without a renderer.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use fountain_core::{CyclePhase, EngineConfig, FountainEngine};

const FRAME_RATE_HZ: f64 = 60.0;
const DEFAULT_RUN_SECS: u64 = 45;
const REPORT_INTERVAL: Duration = Duration::from_secs(1);
// Host-side cap so a stalled process doesn't hand the engine a huge step
const MAX_FRAME_DT_SEC: f32 = 0.1;

fn run_duration() -> anyhow::Result<Duration> {
    match std::env::var("FOUNTAIN_RUN_SECS") {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("FOUNTAIN_RUN_SECS must be whole seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(DEFAULT_RUN_SECS)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let run_for = run_duration()?;
    let mut engine =
        FountainEngine::new(EngineConfig::default()).context("building fountain engine")?;

    let frame = Duration::from_secs_f64(1.0 / FRAME_RATE_HZ);
    let start = Instant::now();
    let mut last = start;
    let mut last_report = start;
    let mut last_phase = engine.cycle_phase();
    log::info!("[native] running for {}s at {FRAME_RATE_HZ} Hz", run_for.as_secs());

    while start.elapsed() < run_for {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(MAX_FRAME_DT_SEC);
        last = now;
        engine.advance(dt);

        let phase = engine.cycle_phase();
        if phase != last_phase {
            if phase == CyclePhase::Flipping {
                log::info!("[native] flipping...");
            }
            last_phase = phase;
        }
        if now - last_report >= REPORT_INTERVAL {
            last_report = now;
            log::info!(
                "[status] {} particles={} ripples={}",
                engine.status(),
                engine.alive_particles(),
                engine.ripple_events().len()
            );
        }

        thread::sleep(frame.saturating_sub(now.elapsed()));
    }

    log::info!(
        "[native] done after {:.1}s simulated, {} flips",
        engine.sim_time(),
        engine.flip_count()
    );
    Ok(())
}
