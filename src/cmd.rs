use core::fmt::Display;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::ABSOLUTE_MIN_PULSE_WIDTH_US;

/// A position command for one servo.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Degrees, mapped through the servo's calibration.
    Angle(f32),
    /// Absolute pulse width in microseconds.
    PulseWidth(f32),
}

impl Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.kind_str(), self.value())
    }
}

impl Command {
    /// Classifies an untagged value by magnitude: anything at or above
    /// [`ABSOLUTE_MIN_PULSE_WIDTH_US`] is a pulse width, the rest are angles.
    /// Angles never exceed 180 degrees so the two ranges cannot overlap.
    pub fn from_raw(value: f32) -> Self {
        if value >= ABSOLUTE_MIN_PULSE_WIDTH_US {
            Command::PulseWidth(value)
        } else {
            Command::Angle(value)
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Command::Angle(v) | Command::PulseWidth(v) => *v,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Command::Angle(_) => "angle",
            Command::PulseWidth(_) => "pulse",
        }
    }

    /// Accepts `a45`, `angle 45`, `p1500`, `pulse 1500` or a bare number,
    /// which goes through [`Command::from_raw`].
    pub fn from_str(cmdstr: &str) -> Option<Self> {
        let s = cmdstr.trim();
        if s.is_empty() {
            return None;
        }

        let (prefix, rest) = match s.find(|c: char| !c.is_ascii_alphabetic()) {
            Some(idx) => s.split_at(idx),
            None => (s, ""),
        };
        let number = || rest.trim().parse::<f32>().ok();

        match prefix {
            "" => number().map(Command::from_raw),
            "a" | "angle" => number().map(Command::Angle),
            "p" | "pulse" => number().map(Command::PulseWidth),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_boundary() {
        assert_eq!(Command::from_raw(500.0), Command::PulseWidth(500.0));
        assert_eq!(Command::from_raw(499.9), Command::Angle(499.9));
        assert_eq!(Command::from_raw(90.0), Command::Angle(90.0));
        assert_eq!(Command::from_raw(-10.0), Command::Angle(-10.0));
        assert_eq!(Command::from_raw(2600.0), Command::PulseWidth(2600.0));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Command::from_str("a45"), Some(Command::Angle(45.0)));
        assert_eq!(Command::from_str("angle 12.5"), Some(Command::Angle(12.5)));
        assert_eq!(Command::from_str("p1500"), Some(Command::PulseWidth(1500.0)));
        assert_eq!(Command::from_str(" pulse 900 "), Some(Command::PulseWidth(900.0)));
        assert_eq!(Command::from_str("1200"), Some(Command::PulseWidth(1200.0)));
        assert_eq!(Command::from_str("30"), Some(Command::Angle(30.0)));
        // explicit tag wins over magnitude
        assert_eq!(Command::from_str("p300"), Some(Command::PulseWidth(300.0)));
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(Command::from_str(""), None);
        assert_eq!(Command::from_str("angle"), None);
        assert_eq!(Command::from_str("x45"), None);
        assert_eq!(Command::from_str("a4x5"), None);
    }

    #[test]
    fn test_display_parses_back() {
        for cmd in [Command::Angle(45.5), Command::PulseWidth(1500.0)] {
            let s = cmd.to_string();
            assert!(s.starts_with(cmd.kind_str()));
            assert_eq!(Command::from_str(&s), Some(cmd));
        }
    }
}
