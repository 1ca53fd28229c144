//! Per-tick water movement between vessels.
//!
//! The riser feeds the jet, and jet water lands back in the open top vessel
//! whose level is held by configuration. The net effect of riser plus jet
//! plus top overflow is accounted entirely by the drain, which debits the
//! basin and credits the reservoir. The riser and air line therefore move no
//! water themselves.
//!
//! Paths are evaluated in registration order and each transfer is clamped
//! against the levels left by the previous one, so two paths sharing a
//! vessel can see different headroom depending on order.

use crate::config::TransferConfig;
use crate::topology::{FlowPath, FlowTopology, PathKind, PickupMode};
use crate::vessel::{clamp01, VesselLevels};

#[derive(Clone, Debug)]
pub struct TransferEngine {
    config: TransferConfig,
}

impl TransferEngine {
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    /// Volume a path may move this tick before availability/capacity clamps.
    #[inline]
    fn base_rate(&self, path: &FlowPath, dt: f32, flow_intensity: f32) -> f32 {
        let rate = self.config.rate_per_sec * flow_intensity * dt;
        match path.pickup {
            PickupMode::BottomPickup => rate * self.config.bottom_pickup_boost,
            PickupMode::Normal => rate,
        }
    }

    /// Move water along every water-carrying path. `dt` and `flow_intensity`
    /// are expected pre-sanitised but are clamped again here. Returns the
    /// total volume moved.
    pub fn advance(
        &self,
        levels: &mut VesselLevels,
        topology: &FlowTopology,
        dt: f32,
        flow_intensity: f32,
    ) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let flow_intensity = clamp01(flow_intensity);
        let mut total = 0.0;
        for path in topology.iter() {
            match path.kind {
                PathKind::AirLine | PathKind::Riser => continue,
                PathKind::Drain | PathKind::User => {}
            }
            let available = levels.get(path.from);
            let capacity = levels.headroom(path.to);
            let moved = self
                .base_rate(path, dt, flow_intensity)
                .min(available)
                .min(capacity)
                .max(0.0);
            if moved > 0.0 {
                levels.add(path.from, -moved);
                levels.add(path.to, moved);
                total += moved;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::Vessel;

    fn engine() -> TransferEngine {
        TransferEngine::new(TransferConfig {
            rate_per_sec: 0.5,
            bottom_pickup_boost: 1.6,
        })
    }

    #[test]
    fn drain_moves_basin_into_reservoir() {
        let mut levels = VesselLevels::new(0.75, 1.0, 0.26);
        let moved = engine().advance(&mut levels, &FlowTopology::canonical(), 0.1, 1.0);
        assert!((moved - 0.05).abs() < 1e-5);
        assert!((levels.get(Vessel::Basin) - 0.95).abs() < 1e-5);
        assert!((levels.get(Vessel::Reservoir) - 0.31).abs() < 1e-5);
        assert_eq!(levels.get(Vessel::Top), 0.75);
    }

    #[test]
    fn bottom_pickup_is_boosted() {
        let mut t = FlowTopology::new();
        t.connect(Vessel::Top, Vessel::Basin, PickupMode::BottomPickup);
        let mut levels = VesselLevels::new(1.0, 0.0, 0.0);
        engine().advance(&mut levels, &t, 0.1, 1.0);
        assert!((levels.get(Vessel::Basin) - 0.08).abs() < 1e-5);
    }

    #[test]
    fn transfer_never_exceeds_available_or_capacity() {
        let mut t = FlowTopology::new();
        t.connect(Vessel::Top, Vessel::Basin, PickupMode::Normal);
        let mut levels = VesselLevels::new(0.01, 0.5, 0.0);
        engine().advance(&mut levels, &t, 10.0, 1.0);
        assert_eq!(levels.get(Vessel::Top), 0.0);
        assert!((levels.get(Vessel::Basin) - 0.51).abs() < 1e-5);

        let mut levels = VesselLevels::new(1.0, 0.97, 0.0);
        engine().advance(&mut levels, &t, 10.0, 1.0);
        assert_eq!(levels.get(Vessel::Basin), 1.0);
        assert!((levels.get(Vessel::Top) - 0.97).abs() < 1e-5);
    }

    #[test]
    fn first_registered_path_drains_a_shared_source_first() {
        // both hoses ask for more than the basin holds
        let mut t = FlowTopology::new();
        t.connect(Vessel::Basin, Vessel::Top, PickupMode::Normal);
        t.connect(Vessel::Basin, Vessel::Reservoir, PickupMode::BottomPickup);
        let mut levels = VesselLevels::new(0.5, 0.005, 0.2);
        engine().advance(&mut levels, &t, 0.1, 1.0);
        assert_eq!(levels.get(Vessel::Basin), 0.0);
        assert!((levels.get(Vessel::Top) - 0.505).abs() < 1e-5);
        assert!((levels.get(Vessel::Reservoir) - 0.2).abs() < 1e-5);

        let mut t = FlowTopology::new();
        t.connect(Vessel::Basin, Vessel::Reservoir, PickupMode::BottomPickup);
        t.connect(Vessel::Basin, Vessel::Top, PickupMode::Normal);
        let mut levels = VesselLevels::new(0.5, 0.005, 0.2);
        engine().advance(&mut levels, &t, 0.1, 1.0);
        assert_eq!(levels.get(Vessel::Basin), 0.0);
        assert!((levels.get(Vessel::Top) - 0.5).abs() < 1e-5);
        assert!((levels.get(Vessel::Reservoir) - 0.205).abs() < 1e-5);
    }

    #[test]
    fn air_line_and_riser_carry_no_water() {
        let mut t = FlowTopology::canonical();
        t.disconnect_paths_for(Vessel::Reservoir);
        let mut levels = VesselLevels::new(0.2, 0.9, 0.1);
        let before = levels;
        let moved = engine().advance(&mut levels, &t, 0.5, 1.0);
        assert_eq!(moved, 0.0);
        assert_eq!(levels, before);
    }
}
