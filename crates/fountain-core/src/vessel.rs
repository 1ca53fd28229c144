use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Internal vessel roles. Display labels are mapped separately in `status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vessel {
    /// Open vessel the jet falls back into; its level is configuration-driven.
    Top,
    /// Sealed middle vessel feeding the riser.
    Basin,
    /// Sealed bottom vessel filled by the drain.
    Reservoir,
}

impl Vessel {
    pub const ALL: [Vessel; 3] = [Vessel::Top, Vessel::Basin, Vessel::Reservoir];

    #[inline]
    fn index(self) -> usize {
        match self {
            Vessel::Top => 0,
            Vessel::Basin => 1,
            Vessel::Reservoir => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vessel::Top => "top",
            Vessel::Basin => "basin",
            Vessel::Reservoir => "reservoir",
        }
    }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown vessel name `{0}` (expected top, basin or reservoir)")]
pub struct ParseVesselError(pub String);

impl FromStr for Vessel {
    type Err = ParseVesselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Vessel::Top),
            "basin" => Ok(Vessel::Basin),
            "reservoir" => Ok(Vessel::Reservoir),
            _ => Err(ParseVesselError(s.to_string())),
        }
    }
}

/// Clamp into [0, 1]. NaN collapses to 0 so it can never leak into state.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Fill fractions of the three vessels. Every mutation re-clamps into [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VesselLevels {
    levels: [f32; 3],
}

impl VesselLevels {
    pub fn new(top: f32, basin: f32, reservoir: f32) -> Self {
        Self {
            levels: [clamp01(top), clamp01(basin), clamp01(reservoir)],
        }
    }

    #[inline]
    pub fn get(&self, vessel: Vessel) -> f32 {
        self.levels[vessel.index()]
    }

    #[inline]
    pub fn set(&mut self, vessel: Vessel, value: f32) {
        self.levels[vessel.index()] = clamp01(value);
    }

    #[inline]
    pub fn add(&mut self, vessel: Vessel, delta: f32) {
        let i = vessel.index();
        self.levels[i] = clamp01(self.levels[i] + delta);
    }

    /// Remaining capacity of `vessel`.
    #[inline]
    pub fn headroom(&self, vessel: Vessel) -> f32 {
        1.0 - self.get(vessel)
    }

    pub fn swap(&mut self, a: Vessel, b: Vessel) {
        self.levels.swap(a.index(), b.index());
    }

    pub fn total(&self) -> f32 {
        self.levels.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_handles_non_finite() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(f32::INFINITY), 1.0);
        assert_eq!(clamp01(f32::NEG_INFINITY), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
    }

    #[test]
    fn levels_stay_in_range_after_mutation() {
        let mut levels = VesselLevels::new(1.5, -0.2, 0.5);
        assert_eq!(levels.get(Vessel::Top), 1.0);
        assert_eq!(levels.get(Vessel::Basin), 0.0);
        levels.add(Vessel::Reservoir, 0.8);
        assert_eq!(levels.get(Vessel::Reservoir), 1.0);
        levels.add(Vessel::Reservoir, f32::NAN);
        assert_eq!(levels.get(Vessel::Reservoir), 0.0);
    }

    #[test]
    fn swap_exchanges_two_levels() {
        let mut levels = VesselLevels::new(0.75, 0.3, 0.9);
        levels.swap(Vessel::Basin, Vessel::Reservoir);
        assert_eq!(levels.get(Vessel::Basin), 0.9);
        assert_eq!(levels.get(Vessel::Reservoir), 0.3);
        assert_eq!(levels.get(Vessel::Top), 0.75);
    }

    #[test]
    fn vessel_names_parse_case_insensitively() {
        assert_eq!("Reservoir".parse::<Vessel>(), Ok(Vessel::Reservoir));
        assert_eq!(" top ".parse::<Vessel>(), Ok(Vessel::Top));
        assert!("bucket".parse::<Vessel>().is_err());
    }
}
