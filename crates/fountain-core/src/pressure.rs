use crate::config::PressureConfig;
use crate::vessel::{clamp01, Vessel, VesselLevels};

/// Air pressure in [0, 1] from vessel heads and whether the air line is sealed.
///
/// Pressure rises as the reservoir fills relative to the basin. The inflow
/// term anticipates the drain so the jet doesn't visibly lag behind it.
pub fn compute_pressure(
    levels: &VesselLevels,
    air_line_connected: bool,
    config: &PressureConfig,
) -> f32 {
    let seal = if air_line_connected {
        config.sealed_factor
    } else {
        config.leak_factor
    };
    let head = (levels.get(Vessel::Reservoir) - levels.get(Vessel::Basin)).max(0.0);
    let inflow = clamp01(levels.headroom(Vessel::Top) + levels.get(Vessel::Reservoir));
    clamp01(seal * (head * config.head_gain + config.inflow_gain * inflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_start_pressure() {
        let levels = VesselLevels::new(0.75, 1.0, 0.26);
        let p = compute_pressure(&levels, true, &PressureConfig::default());
        // head 0, inflow 0.51
        assert!((p - 0.255).abs() < 1e-5);
    }

    #[test]
    fn leak_scales_pressure_down() {
        let levels = VesselLevels::new(0.75, 0.4, 0.5);
        let cfg = PressureConfig::default();
        let sealed = compute_pressure(&levels, true, &cfg);
        let leaky = compute_pressure(&levels, false, &cfg);
        // head 0.1 * 2.0 + 0.5 * inflow 0.75
        assert!((sealed - 0.575).abs() < 1e-5);
        assert!((leaky - 0.115).abs() < 1e-5);
    }

    #[test]
    fn pressure_saturates_at_one() {
        let levels = VesselLevels::new(0.0, 0.0, 1.0);
        assert_eq!(
            compute_pressure(&levels, true, &PressureConfig::default()),
            1.0
        );
    }
}
