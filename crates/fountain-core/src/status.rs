//! Display-facing status types shared with the web and native frontends.
//!
//! The UI labels vessels `A`, `B` and `C` after the historical terminology of
//! the physical device. Those labels map onto the internal roles through
//! [`DISPLAY_MAPPING`] only; nothing inside the engine looks at labels.

use std::fmt;

use crate::vessel::{clamp01, Vessel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayLabel {
    A,
    B,
    C,
}

/// Presentation boundary: display label -> internal vessel.
pub const DISPLAY_MAPPING: [(DisplayLabel, Vessel); 3] = [
    (DisplayLabel::A, Vessel::Basin),
    (DisplayLabel::B, Vessel::Reservoir),
    (DisplayLabel::C, Vessel::Top),
];

impl DisplayLabel {
    pub fn vessel(self) -> Vessel {
        match self {
            DisplayLabel::A => Vessel::Basin,
            DisplayLabel::B => Vessel::Reservoir,
            DisplayLabel::C => Vessel::Top,
        }
    }

    pub fn for_vessel(vessel: Vessel) -> DisplayLabel {
        match vessel {
            Vessel::Basin => DisplayLabel::A,
            Vessel::Reservoir => DisplayLabel::B,
            Vessel::Top => DisplayLabel::C,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayLabel::A => "A",
            DisplayLabel::B => "B",
            DisplayLabel::C => "C",
        }
    }
}

/// Convert a [0, 1] fraction to a rounded display percentage.
#[inline]
pub fn percent(fraction: f32) -> u8 {
    (clamp01(fraction) * 100.0).round() as u8
}

/// Snapshot for status readouts. Levels and pressure are 0..=100.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub level_top: u8,
    pub level_basin: u8,
    pub level_reservoir: u8,
    pub pressure: u8,
    pub active: bool,
}

impl Status {
    pub fn level(&self, vessel: Vessel) -> u8 {
        match vessel {
            Vessel::Top => self.level_top,
            Vessel::Basin => self.level_basin,
            Vessel::Reservoir => self.level_reservoir,
        }
    }

    pub fn display_level(&self, label: DisplayLabel) -> u8 {
        self.level(label.vessel())
    }

    /// Levels in display order `A, B, C`.
    pub fn display(&self) -> [(DisplayLabel, u8); 3] {
        DISPLAY_MAPPING.map(|(label, vessel)| (label, self.level(vessel)))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, level) in self.display() {
            write!(f, "{}={:>3}% ", label.as_str(), level)?;
        }
        write!(
            f,
            "pressure={:>3}% {}",
            self.pressure,
            if self.active { "active" } else { "flipping" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_round_trips_every_vessel() {
        for (label, vessel) in DISPLAY_MAPPING {
            assert_eq!(label.vessel(), vessel);
            assert_eq!(DisplayLabel::for_vessel(vessel), label);
        }
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(percent(0.757), 76);
        assert_eq!(percent(0.264), 26);
        assert_eq!(percent(1.7), 100);
        assert_eq!(percent(f32::NAN), 0);
    }

    #[test]
    fn display_order_follows_labels() {
        let s = Status {
            level_top: 75,
            level_basin: 100,
            level_reservoir: 26,
            pressure: 25,
            active: true,
        };
        assert_eq!(
            s.display(),
            [(DisplayLabel::A, 100), (DisplayLabel::B, 26), (DisplayLabel::C, 75)]
        );
        assert_eq!(s.to_string(), "A=100% B= 26% C= 75% pressure= 25% active");
        assert_eq!(s.display_level(DisplayLabel::A), 100);
        assert_eq!(s.display_level(DisplayLabel::B), 26);
        assert_eq!(s.display_level(DisplayLabel::C), 75);
    }
}
