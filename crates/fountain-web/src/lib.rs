#![cfg(target_arch = "wasm32")]
//! JavaScript-facing wrapper around the fountain engine.
//!
//! The renderer owns the scene, camera, shaders and input; it calls
//! `advance` once per animation frame and reads status, particles and
//! ripples back out of a `FountainSim`.

use fountain_core::{
    BasinGeometry, EngineConfig, FountainEngine, PathHandle, PickupMode, Vessel,
};
use glam::vec3;
use js_sys::{Array, Float32Array, Uint8Array};
use wasm_bindgen::prelude::*;

mod convert;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fountain-web starting");
    Ok(())
}

#[wasm_bindgen]
pub struct FountainSim {
    engine: FountainEngine,
}

#[wasm_bindgen]
impl FountainSim {
    /// Create a simulation with the canonical device configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<FountainSim, JsValue> {
        let mut config = EngineConfig::default();
        if let Some(seed) = seed {
            config = config.with_seed(seed as u64);
        }
        let engine = FountainEngine::new(config).map_err(convert::js_error)?;
        Ok(FountainSim { engine })
    }

    pub fn advance(&mut self, dt: f32) {
        self.engine.advance(dt);
    }

    #[wasm_bindgen(js_name = setFlowIntensity)]
    pub fn set_flow_intensity(&mut self, value: f32) {
        self.engine.set_flow_intensity(value);
    }

    #[wasm_bindgen(js_name = flowIntensity)]
    pub fn flow_intensity(&self) -> f32 {
        self.engine.flow_intensity()
    }

    /// Plug a hose. Returns the path handle, or `undefined` for a self-loop.
    pub fn connect(&mut self, from: &str, to: &str, pickup: &str) -> Result<Option<u32>, JsValue> {
        let from: Vessel = from.parse().map_err(convert::js_error)?;
        let to: Vessel = to.parse().map_err(convert::js_error)?;
        let pickup: PickupMode = pickup.parse().map_err(convert::js_error)?;
        Ok(self.engine.connect(from, to, pickup).map(PathHandle::raw))
    }

    pub fn disconnect(&mut self, handle: u32) -> bool {
        self.engine.disconnect(PathHandle::from_raw(handle))
    }

    #[wasm_bindgen(js_name = disconnectPathsFor)]
    pub fn disconnect_paths_for(&mut self, vessel: &str) -> Result<(), JsValue> {
        let vessel: Vessel = vessel.parse().map_err(convert::js_error)?;
        self.engine.disconnect_paths_for(vessel);
        Ok(())
    }

    pub fn flip(&mut self) {
        self.engine.flip();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// `{levelTop, levelBasin, levelReservoir, pressure, active, display}`
    /// with levels and pressure as 0..100 integers.
    #[wasm_bindgen(js_name = getStatus)]
    pub fn status(&self) -> Result<JsValue, JsValue> {
        convert::status_to_js(&self.engine.status())
            .map(JsValue::from)
            .map_err(convert::js_error)
    }

    /// Registered hoses in evaluation order.
    pub fn paths(&self) -> Result<Array, JsValue> {
        let out = Array::new();
        for path in self.engine.paths() {
            out.push(&convert::path_to_js(path).map_err(convert::js_error)?);
        }
        Ok(out)
    }

    /// Ripples, most recent first, packed as `[x, y, startTime, 0]` each.
    #[wasm_bindgen(js_name = rippleEvents)]
    pub fn ripple_events(&self) -> Float32Array {
        let packed: Vec<f32> = self
            .engine
            .ripple_events()
            .iter()
            .flat_map(|e| e.packed())
            .collect();
        Float32Array::from(packed.as_slice())
    }

    /// Raw particle pool, 32 bytes per slot:
    /// `position: f32x3, ageFraction: f32, velocity: f32x3, alive: u32`.
    #[wasm_bindgen(js_name = particleBytes)]
    pub fn particle_bytes(&self) -> Uint8Array {
        let snaps = self.engine.particle_snapshots();
        Uint8Array::from(bytemuck::cast_slice::<_, u8>(&snaps))
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.engine.alive_particles()
    }

    #[wasm_bindgen(js_name = flipProgress)]
    pub fn flip_progress(&self) -> f32 {
        self.engine.flip_progress()
    }

    #[wasm_bindgen(js_name = flipDuration)]
    pub fn flip_duration(&self) -> f64 {
        self.engine.flip_duration()
    }

    #[wasm_bindgen(js_name = isFlipping)]
    pub fn is_flipping(&self) -> bool {
        self.engine.is_flipping()
    }

    #[wasm_bindgen(js_name = simTime)]
    pub fn sim_time(&self) -> f64 {
        self.engine.sim_time()
    }

    /// Update the basin contract after the scene is (re)built. Non-finite
    /// values keep the previous setting.
    #[wasm_bindgen(js_name = setBasinGeometry)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_basin_geometry(
        &mut self,
        center_x: f32,
        center_z: f32,
        radius: f32,
        floor_y: f32,
        surface_y: f32,
        nozzle_x: f32,
        nozzle_y: f32,
        nozzle_z: f32,
    ) {
        let current = *self.engine.basin_geometry();
        self.engine.set_basin_geometry(BasinGeometry {
            center: vec3(center_x, 0.0, center_z),
            radius,
            floor_y,
            surface_y,
            nozzle: vec3(nozzle_x, nozzle_y, nozzle_z),
            ..current
        });
    }
}
